//! Output artifacts of a run.
//!
//! | File | Content |
//! |------|---------|
//! | `<outfile>` | flat intensity table, one row per feature × frame |
//! | `<stem>_ratios.csv` | per-spot ratios (only when ratio selectors are set) |
//! | `<stem>_heatmap.csv` | spot-grid matrix of mean normalized ratios |
//! | `<stem>_summary.json` | run counts, features and output locations |

mod error;
mod paths;
mod summary;
mod tables;

pub use error::OutputError;
pub use paths::OutputPaths;
pub use summary::RunSummary;
pub use tables::{
    write_heatmap, write_heatmap_csv, write_intensity_csv, write_intensity_table, write_ratio_csv,
    write_ratio_table, MALFORMED_SPOT_FLAG,
};
