//! Error types for raw-data access.

use thiserror::Error;

/// Errors raised by a raw-data source. All of them are fatal for a run.
#[derive(Error, Debug)]
pub enum DataAccessError {
    /// Path does not exist or is not a valid .d directory
    #[error("Invalid TDF path: {0}")]
    InvalidPath(String),

    /// The vendor shared library could not be loaded or lacks a symbol
    #[error("timsdata library error: {0}")]
    LibraryError(#[from] libloading::Error),

    /// The vendor library refused to open the dataset
    #[error("Failed to open {path}: {message}")]
    OpenFailed {
        /// Dataset path
        path: String,
        /// Last error reported by the vendor library
        message: String,
    },

    /// Error reading the analysis.tdf SQLite database
    #[error("TDF SQL error: {0}")]
    SqlError(#[from] rusqlite::Error),

    /// A table required for MALDI processing is absent
    #[error("Missing required table: {0}")]
    MissingTable(String),

    /// Frame id not present in the dataset
    #[error("Unknown frame: {0}")]
    UnknownFrame(u32),

    /// A vendor conversion or read call reported failure
    #[error("{call} failed for frame {frame_id}: {message}")]
    CallFailed {
        /// Name of the vendor function
        call: &'static str,
        /// Frame the call was made for
        frame_id: u32,
        /// Last error reported by the vendor library
        message: String,
    },

    /// Scan buffer returned by the vendor library is shorter than its header claims
    #[error("Corrupt scan buffer for frame {frame_id}: {message}")]
    CorruptScanBuffer {
        /// Frame the buffer belongs to
        frame_id: u32,
        /// Description of the inconsistency
        message: String,
    },

    /// A previous panic left the session handle lock poisoned
    #[error("Raw data session is poisoned")]
    SessionPoisoned,

    /// Generic I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
