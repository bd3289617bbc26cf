//! Error types for feature extraction.

use thiserror::Error;

use crate::tdf::DataAccessError;

/// Errors that abort an extraction run.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Raw data could not be read for a specific frame and feature
    #[error("Extraction failed for frame {frame_id} (spot {spot}), feature {feature}: {source}")]
    FrameFailed {
        /// Frame being processed
        frame_id: u32,
        /// Spot of that frame
        spot: String,
        /// Feature being extracted
        feature: String,
        /// Underlying data access failure
        #[source]
        source: DataAccessError,
    },

    /// Raw data access failed outside of a frame (e.g. listing frames)
    #[error("Data access error: {0}")]
    DataAccess(#[from] DataAccessError),
}
