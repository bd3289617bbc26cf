use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod extract;
mod info;

pub use extract::ExtractArgs;

/// tims-targeted - Targeted feature intensities for MALDI-TIMS imaging runs
#[derive(Parser)]
#[command(name = "tims-targeted")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract feature intensities from a .d directory, with optional ratios
    Extract(ExtractArgs),

    /// Run the whole pipeline on a synthetic plate
    Demo {
        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        outdir: PathBuf,

        /// Plate rows
        #[arg(long, default_value_t = 8)]
        rows: usize,

        /// Plate columns
        #[arg(long, default_value_t = 12)]
        columns: usize,

        /// Evaluate frames in parallel (requires the parallel feature)
        #[arg(long)]
        parallel: bool,
    },

    /// Display frames and spots of a .d directory
    Info {
        /// Bruker .d directory
        #[arg(short, long, value_name = "DIR")]
        input: PathBuf,

        /// Also open the acquisition with this timsdata library
        #[arg(long, value_name = "FILE")]
        sdk_lib: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract(args) => extract::run(args),
        Commands::Demo {
            outdir,
            rows,
            columns,
            parallel,
        } => demo::run(outdir, rows, columns, parallel),
        Commands::Info { input, sdk_lib } => info::run(input, sdk_lib),
    }
}
