//! Targeted feature definitions.
//!
//! A feature is an (m/z, 1/K0) pair with an absolute tolerance on each axis.
//! Features come either from parallel command-line lists, reconciled by
//! [`resolve_windows`], or from a feature-list file read by
//! [`read_feature_list`] (columns `mz`, `mz_tol`, `ook0`, `ook0_tol`).

pub mod error;
pub mod list;
pub mod resolver;
pub mod window;

pub use error::FeatureError;
pub use list::{parse_feature_list, read_feature_list, REQUIRED_COLUMNS};
pub use resolver::resolve_windows;
pub use window::FeatureWindow;
