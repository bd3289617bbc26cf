//! Error types for feature window construction and feature-list parsing.

use thiserror::Error;

/// Errors that can occur while building feature windows.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// Feature and tolerance list lengths cannot be reconciled
    #[error(
        "Argument count mismatch: {mz} m/z, {mz_tol} m/z tolerance, {ook0} 1/K0 and {ook0_tol} 1/K0 tolerance values"
    )]
    ArgumentCountMismatch {
        /// Number of m/z values given
        mz: usize,
        /// Number of m/z tolerances given
        mz_tol: usize,
        /// Number of 1/K0 values given
        ook0: usize,
        /// Number of 1/K0 tolerances given
        ook0_tol: usize,
    },

    /// A window value is negative (tolerances) or not finite
    #[error("Invalid feature window: {0}")]
    InvalidWindow(String),

    /// The feature list contains no rows
    #[error("Feature list is empty")]
    EmptyFeatureList,

    /// A required column is absent from the feature list header
    #[error("Missing required column in feature list: {0}")]
    MissingColumn(String),

    /// Error parsing the feature list
    #[error("Feature list parse error: {0}")]
    CsvError(#[from] csv::Error),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
