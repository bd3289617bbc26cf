use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;

use tims_targeted::aggregate::AggregationMode;
use tims_targeted::feature::FeatureWindow;
use tims_targeted::output::OutputPaths;
use tims_targeted::pipeline::{run_pipeline, write_outputs, PipelineOptions};
use tims_targeted::tdf::memory::{PLATE_DENOMINATOR, PLATE_INTERNAL_STANDARD, PLATE_NUMERATOR};
use tims_targeted::tdf::InMemoryRawData;

/// Run the full pipeline on a synthetic MALDI plate
pub fn run(outdir: PathBuf, rows: usize, columns: usize, parallel: bool) -> Result<()> {
    if rows == 0 || columns == 0 {
        bail!("The demo plate needs at least one row and one column");
    }
    info!("Targeted extraction demo: synthetic {} x {} plate", rows, columns);

    let source = InMemoryRawData::synthetic_plate(rows, columns);
    let windows = [PLATE_NUMERATOR, PLATE_DENOMINATOR, PLATE_INTERNAL_STANDARD]
        .iter()
        .map(|&(mz, ook0)| FeatureWindow::new(mz, 0.05, ook0, 0.01))
        .collect::<Result<Vec<_>, _>>()?;
    let options = PipelineOptions {
        mode: AggregationMode::NormalizedRatio {
            numerator_ook0: PLATE_NUMERATOR.1,
            denominator_ook0: PLATE_DENOMINATOR.1,
            internal_standard_mz: PLATE_INTERNAL_STANDARD.0,
        },
        parallel,
        cancel: None,
    };

    let result = run_pipeline(&source, "synthetic plate", &windows, &options)
        .context("Demo extraction failed")?;
    let paths = OutputPaths::new(&outdir, "demo_plate.csv")?;
    write_outputs(&result, &windows, &paths).context("Failed to write demo outputs")?;

    println!("{}", result.report.format_colored());
    println!("Demo outputs written to {}", outdir.display());
    Ok(())
}
