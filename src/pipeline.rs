//! Extraction → aggregation → outputs, as one call.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::info;

use crate::aggregate::{aggregate, pivot, AggregationMode, AggregationReport, HeatmapGrid};
use crate::extract::{ExtractionDriver, ExtractionError, ExtractionOutcome};
use crate::feature::FeatureWindow;
use crate::output::{
    write_heatmap_csv, write_intensity_csv, write_ratio_csv, OutputError, OutputPaths, RunSummary,
};
use crate::report::RunReport;
use crate::tdf::RawDataSource;

/// Options for [`run_pipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// How intensities are combined per spot
    pub mode: AggregationMode,
    /// Evaluate frames in parallel (`parallel` feature)
    pub parallel: bool,
    /// Stop between frames once set
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Flat intensity table and extraction counters
    pub outcome: ExtractionOutcome,
    /// Ratio table and its data-quality counts
    pub aggregation: AggregationReport,
    /// Heatmap pivot of the ratio table
    pub grid: HeatmapGrid,
    /// Report over all of the above
    pub report: RunReport,
}

/// Extract every window from every frame of `source`, then aggregate.
///
/// A cancelled run still aggregates the records completed before the stop.
pub fn run_pipeline<S: RawDataSource + Sync>(
    source: &S,
    input_label: &str,
    windows: &[FeatureWindow],
    options: &PipelineOptions,
) -> Result<PipelineResult, ExtractionError> {
    let mut driver = ExtractionDriver::new(source).parallel(options.parallel);
    if let Some(flag) = &options.cancel {
        driver = driver.with_cancellation(Arc::clone(flag));
    }
    let outcome = driver.run_all(windows)?;

    let aggregation = aggregate(&outcome.records, options.mode);
    let grid = pivot(&aggregation.ratios);
    info!(
        "Aggregated {} ratio rows into {} heatmap cells",
        aggregation.ratios.len(),
        grid.len()
    );
    let report = RunReport::new(input_label, &outcome, &aggregation, &grid);

    Ok(PipelineResult {
        outcome,
        aggregation,
        grid,
        report,
    })
}

/// Write the tables and the JSON summary. Ratio and heatmap tables are only
/// written when ratios were computed.
pub fn write_outputs(
    result: &PipelineResult,
    windows: &[FeatureWindow],
    paths: &OutputPaths,
) -> Result<(), OutputError> {
    paths.ensure_dirs()?;

    write_intensity_csv(&paths.intensity, &result.outcome.records)?;
    info!("Wrote {} intensity rows to {}", result.outcome.records.len(), paths.intensity.display());

    if result.aggregation.mode.is_enabled() {
        write_ratio_csv(&paths.ratios, &result.aggregation.ratios)?;
        write_heatmap_csv(&paths.heatmap, &result.grid)?;
        info!(
            "Wrote ratios to {} and heatmap to {}",
            paths.ratios.display(),
            paths.heatmap.display()
        );
    }

    RunSummary::new(windows, &result.report, paths).write_to(&paths.summary)?;
    Ok(())
}
