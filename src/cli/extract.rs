use anyhow::{bail, Context, Result};
use clap::Args;
use log::info;
use std::path::PathBuf;

use tims_targeted::aggregate::AggregationMode;
use tims_targeted::feature::{read_feature_list, resolve_windows, FeatureWindow};
use tims_targeted::output::OutputPaths;
use tims_targeted::pipeline::{run_pipeline, write_outputs, PipelineOptions};
use tims_targeted::tdf::{SessionOptions, TimsSession};

use super::config::Config;

/// Tolerance used when neither the command line nor the config sets one.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// Arguments of the `extract` command.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Bruker .d directory of the MALDI acquisition
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Output directory (default: directory containing the input)
    #[arg(short, long, value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    /// Name of the intensity table (default: input name + .csv)
    #[arg(long, value_name = "NAME")]
    pub outfile: Option<String>,

    /// Target m/z values
    #[arg(long, num_args = 1.., value_delimiter = ',', conflicts_with = "feature_list")]
    pub mz: Vec<f64>,

    /// m/z tolerances (one, or one per m/z)
    #[arg(long, num_args = 1.., value_delimiter = ',', conflicts_with = "feature_list")]
    pub mz_tol: Vec<f64>,

    /// Target 1/K0 values
    #[arg(long, num_args = 1.., value_delimiter = ',', conflicts_with = "feature_list")]
    pub ook0: Vec<f64>,

    /// 1/K0 tolerances (one, or one per 1/K0)
    #[arg(long, num_args = 1.., value_delimiter = ',', conflicts_with = "feature_list")]
    pub ook0_tol: Vec<f64>,

    /// Feature list with columns mz, mz_tol, ook0, ook0_tol (.csv or .tsv)
    #[arg(long, value_name = "FILE")]
    pub feature_list: Option<PathBuf>,

    /// 1/K0 of the ratio numerator feature(s)
    #[arg(long, requires = "denominator_ook0")]
    pub numerator_ook0: Option<f64>,

    /// 1/K0 of the ratio denominator feature(s)
    #[arg(long, requires = "numerator_ook0")]
    pub denominator_ook0: Option<f64>,

    /// m/z of the internal standard the ratio is normalized to
    #[arg(long, requires = "numerator_ook0")]
    pub internal_standard_mz: Option<f64>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the timsdata shared library
    #[arg(long, value_name = "FILE")]
    pub sdk_lib: Option<PathBuf>,

    /// Open the acquisition without the recalibrated state
    #[arg(long)]
    pub no_recalibration: bool,

    /// Evaluate frames in parallel (requires the parallel feature)
    #[arg(long)]
    pub parallel: bool,
}

/// Settings after merging command line, config file and defaults.
#[derive(Debug)]
pub struct ExtractSettings {
    pub windows: Vec<FeatureWindow>,
    pub mode: AggregationMode,
    pub session: SessionOptions,
    pub paths: OutputPaths,
    pub parallel: bool,
}

impl ExtractSettings {
    pub fn resolve(args: &ExtractArgs, config: &Config) -> Result<Self> {
        let windows = match &args.feature_list {
            Some(path) => read_feature_list(path)
                .with_context(|| format!("Failed to read feature list: {}", path.display()))?,
            None => {
                if args.mz.is_empty() || args.ook0.is_empty() {
                    bail!("Either --feature-list or both --mz and --ook0 must be given");
                }
                let mz_tol = tolerances(&args.mz_tol, config.extraction.mz_tol);
                let ook0_tol = tolerances(&args.ook0_tol, config.extraction.ook0_tol);
                resolve_windows(&args.mz, &mz_tol, &args.ook0, &ook0_tol)
                    .context("Invalid feature definition")?
            }
        };

        let mode = AggregationMode::from_selectors(
            args.numerator_ook0,
            args.denominator_ook0,
            args.internal_standard_mz,
        )
        .context("Invalid ratio selectors")?;

        let session = SessionOptions {
            sdk_library: args.sdk_lib.clone().or_else(|| config.extraction.sdk_lib.clone()),
            use_recalibrated_state: !args.no_recalibration
                && config.extraction.use_recalibrated_state.unwrap_or(true),
        };

        let outdir = args
            .outdir
            .clone()
            .or_else(|| config.output.outdir.clone())
            .unwrap_or_else(|| OutputPaths::default_outdir(&args.input));
        let outfile = match args.outfile.clone().or_else(|| config.output.outfile.clone()) {
            Some(name) => name,
            None => OutputPaths::default_outfile(&args.input)?,
        };
        let paths = OutputPaths::new(&outdir, &outfile)?;

        Ok(Self {
            windows,
            mode,
            session,
            paths,
            parallel: args.parallel || config.extraction.parallel.unwrap_or(false),
        })
    }
}

fn tolerances(cli: &[f64], configured: Option<f64>) -> Vec<f64> {
    if cli.is_empty() {
        vec![configured.unwrap_or(DEFAULT_TOLERANCE)]
    } else {
        cli.to_vec()
    }
}

/// Run the extraction on a .d directory and write all outputs.
pub fn run(args: ExtractArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let settings = ExtractSettings::resolve(&args, &config)?;
    info!(
        "{} feature windows, aggregation: {}",
        settings.windows.len(),
        settings.mode
    );

    let session = TimsSession::open(&args.input, &settings.session)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let options = PipelineOptions {
        mode: settings.mode,
        parallel: settings.parallel,
        cancel: None,
    };
    let label = args.input.display().to_string();
    let result = run_pipeline(&session, &label, &settings.windows, &options)
        .context("Extraction failed")?;
    drop(session);

    write_outputs(&result, &settings.windows, &settings.paths).context("Failed to write outputs")?;

    println!("{}", result.report.format_colored());
    println!("Intensity table: {}", settings.paths.intensity.display());
    if settings.mode.is_enabled() {
        println!("Ratio table:     {}", settings.paths.ratios.display());
        println!("Heatmap:         {}", settings.paths.heatmap.display());
    }
    println!("Summary:         {}", settings.paths.summary.display());
    Ok(())
}
