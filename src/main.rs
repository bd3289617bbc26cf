//! # tims-targeted
//!
//! Command-line front end for targeted MALDI-TIMS feature extraction.
//!
//! ## Usage
//!
//! ```bash
//! # One feature, default tolerances (0.05), outputs next to the input
//! tims-targeted extract -i plate_01.d --mz 622.03 --ook0 1.02
//!
//! # Several features with ratios normalized to an internal standard
//! tims-targeted extract -i plate_01.d \
//!     --mz 500.2,600.3,700.1 --ook0 0.90,1.10,1.30 --mz-tol 0.02 --ook0-tol 0.03 \
//!     --numerator-ook0 0.90 --denominator-ook0 1.10 --internal-standard-mz 700.1
//!
//! # Features from a file
//! tims-targeted extract -i plate_01.d --feature-list features.tsv -o results
//!
//! # Synthetic plate, no instrument data needed
//! tims-targeted demo -o /tmp/demo
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
