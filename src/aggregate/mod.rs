//! Per-spot aggregation of the flat intensity table.
//!
//! [`aggregate`] groups [`IntensityRecord`](crate::extract::IntensityRecord)s
//! by frame, sums the features picked by the [`AggregationMode`] selectors
//! and computes `ratio = numerator / denominator` and, with an internal
//! standard, `normalized_ratio = ratio / internal_standard`. A zero divisor
//! yields [`RatioValue::Undefined`], never NaN or infinity.
//!
//! [`pivot`] turns the ratio records into a sparse [`HeatmapGrid`] keyed by
//! the row and column labels of the spot name (see [`SpotCoordinate`]).

mod error;
mod heatmap;
mod ratio;
mod spot;

pub use error::SelectorError;
pub use heatmap::{pivot, HeatmapGrid};
pub use ratio::{
    aggregate, AggregationMode, AggregationReport, RatioRecord, RatioValue, SELECTOR_TOLERANCE,
};
pub use spot::{MalformedSpotName, SpotCoordinate};
