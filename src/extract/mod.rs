//! Feature intensity extraction.
//!
//! For one frame and one [`FeatureWindow`](crate::feature::FeatureWindow) the
//! [`FeatureExtractor`] selects the scans whose 1/K0 lies in the mobility
//! window, reads the contiguous scan span between them and sums the
//! intensity of every peak whose m/z lies in the m/z window.
//!
//! The [`ExtractionDriver`] repeats this over every feature × frame pair and
//! produces the flat intensity table as a list of [`IntensityRecord`]s,
//! ordered by feature and then by frame.

mod driver;
mod error;
mod extractor;
mod record;
mod stats;

pub use driver::{ExtractionDriver, ExtractionOutcome};
pub use error::ExtractionError;
pub use extractor::FeatureExtractor;
pub use record::{FrameIntensity, IntensityRecord};
pub use stats::ExtractionStats;
