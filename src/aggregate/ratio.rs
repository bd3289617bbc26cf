//! Per-spot ratio tables.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};
use serde::{Serialize, Serializer};

use super::error::SelectorError;
use super::spot::SpotCoordinate;
use crate::extract::IntensityRecord;

/// Absolute tolerance when matching a record's feature against a selector.
pub const SELECTOR_TOLERANCE: f64 = 1e-6;

/// How extracted intensities are combined per spot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AggregationMode {
    /// Flat intensity table only
    #[default]
    None,
    /// numerator / denominator, features selected by their 1/K0
    Ratio {
        /// 1/K0 of the numerator feature(s)
        numerator_ook0: f64,
        /// 1/K0 of the denominator feature(s)
        denominator_ook0: f64,
    },
    /// Ratio divided by an internal standard selected by its m/z
    NormalizedRatio {
        /// 1/K0 of the numerator feature(s)
        numerator_ook0: f64,
        /// 1/K0 of the denominator feature(s)
        denominator_ook0: f64,
        /// m/z of the internal standard feature(s)
        internal_standard_mz: f64,
    },
}

impl AggregationMode {
    /// Pick the mode from optional selectors.
    ///
    /// Numerator and denominator go together; an internal standard needs both.
    pub fn from_selectors(
        numerator_ook0: Option<f64>,
        denominator_ook0: Option<f64>,
        internal_standard_mz: Option<f64>,
    ) -> Result<Self, SelectorError> {
        for value in [numerator_ook0, denominator_ook0, internal_standard_mz]
            .into_iter()
            .flatten()
        {
            if !value.is_finite() {
                return Err(SelectorError::NonFinite(value));
            }
        }

        match (numerator_ook0, denominator_ook0, internal_standard_mz) {
            (None, None, None) => Ok(Self::None),
            (Some(numerator_ook0), Some(denominator_ook0), None) => Ok(Self::Ratio {
                numerator_ook0,
                denominator_ook0,
            }),
            (Some(numerator_ook0), Some(denominator_ook0), Some(internal_standard_mz)) => {
                Ok(Self::NormalizedRatio {
                    numerator_ook0,
                    denominator_ook0,
                    internal_standard_mz,
                })
            }
            (Some(_), None, _) => Err(SelectorError::MissingDenominator),
            (None, Some(_), _) => Err(SelectorError::MissingNumerator),
            (None, None, Some(_)) => Err(SelectorError::InternalStandardWithoutRatio),
        }
    }

    /// Whether ratios are computed at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    fn selectors(&self) -> Option<(f64, f64, Option<f64>)> {
        match *self {
            Self::None => None,
            Self::Ratio {
                numerator_ook0,
                denominator_ook0,
            } => Some((numerator_ook0, denominator_ook0, None)),
            Self::NormalizedRatio {
                numerator_ook0,
                denominator_ook0,
                internal_standard_mz,
            } => Some((numerator_ook0, denominator_ook0, Some(internal_standard_mz))),
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Ratio {
                numerator_ook0,
                denominator_ook0,
            } => write!(f, "ratio (1/K0 {} / 1/K0 {})", numerator_ook0, denominator_ook0),
            Self::NormalizedRatio {
                numerator_ook0,
                denominator_ook0,
                internal_standard_mz,
            } => write!(
                f,
                "normalized ratio (1/K0 {} / 1/K0 {}, IS m/z {})",
                numerator_ook0, denominator_ook0, internal_standard_mz
            ),
        }
    }
}

/// A ratio that is either a finite number or undefined (zero divisor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatioValue {
    /// Finite quotient
    Defined(f64),
    /// Division by zero, or a non-finite quotient
    Undefined,
}

impl RatioValue {
    /// Text written for undefined values.
    pub const UNDEFINED: &'static str = "undefined";

    /// `numerator / denominator`, undefined unless the result is finite.
    pub fn divide(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Self::Undefined;
        }
        let quotient = numerator / denominator;
        if quotient.is_finite() {
            Self::Defined(quotient)
        } else {
            Self::Undefined
        }
    }

    /// The value, if defined.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(*v),
            Self::Undefined => None,
        }
    }

    /// Whether the value is undefined.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl fmt::Display for RatioValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(v) => write!(f, "{}", v),
            Self::Undefined => f.write_str(Self::UNDEFINED),
        }
    }
}

impl Serialize for RatioValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Defined(v) => serializer.serialize_f64(*v),
            Self::Undefined => serializer.serialize_str(Self::UNDEFINED),
        }
    }
}

/// Ratio row for one frame / spot.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioRecord {
    /// Frame id
    pub frame_id: u32,
    /// Spot name as stored in the acquisition
    pub spot_name: String,
    /// Row/column labels; `None` for a malformed spot name
    pub coordinate: Option<SpotCoordinate>,
    /// Summed intensity of the numerator features
    pub numerator_intensity: f64,
    /// Summed intensity of the denominator features
    pub denominator_intensity: f64,
    /// Summed intensity of the internal standard, when one is configured
    pub internal_standard_intensity: Option<f64>,
    /// numerator / denominator
    pub ratio: RatioValue,
    /// ratio / internal standard (equal to `ratio` without one)
    pub normalized_ratio: RatioValue,
}

impl RatioRecord {
    /// Row label, if the spot name parsed.
    pub fn row(&self) -> Option<&str> {
        self.coordinate.as_ref().map(|c| c.row.as_str())
    }

    /// Column label, if the spot name parsed.
    pub fn column(&self) -> Option<&str> {
        self.coordinate.as_ref().map(|c| c.column.as_str())
    }
}

/// Ratios plus the data-quality counts gathered while building them.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationReport {
    /// Mode the ratios were built with
    pub mode: AggregationMode,
    /// One record per frame, in ascending frame order (empty for
    /// [`AggregationMode::None`])
    pub ratios: Vec<RatioRecord>,
    /// Frames whose spot name did not parse
    pub malformed_spot_names: usize,
    /// Ratio records whose normalized ratio is undefined
    pub undefined_ratios: usize,
}

#[derive(Default)]
struct SpotSums {
    spot_name: String,
    numerator: f64,
    denominator: f64,
    internal_standard: f64,
}

fn matches_selector(value: f64, selector: f64) -> bool {
    (value - selector).abs() <= SELECTOR_TOLERANCE
}

/// Group the flat intensity table by frame and compute ratios.
///
/// Features match a selector when their 1/K0 (numerator, denominator) or m/z
/// (internal standard) is within [`SELECTOR_TOLERANCE`] of it; all matching
/// records of a frame are summed. A frame with no matching record sums to 0.
pub fn aggregate(records: &[IntensityRecord], mode: AggregationMode) -> AggregationReport {
    let mut spots: BTreeMap<u32, SpotSums> = BTreeMap::new();
    for record in records {
        let sums = spots.entry(record.frame_id).or_insert_with(|| SpotSums {
            spot_name: record.spot_name.clone(),
            ..Default::default()
        });
        if let Some((numerator_ook0, denominator_ook0, internal_standard_mz)) = mode.selectors() {
            let ook0 = record.feature.ook0();
            if matches_selector(ook0, numerator_ook0) {
                sums.numerator += record.intensity;
            }
            if matches_selector(ook0, denominator_ook0) {
                sums.denominator += record.intensity;
            }
            if let Some(is_mz) = internal_standard_mz {
                if matches_selector(record.feature.mz(), is_mz) {
                    sums.internal_standard += record.intensity;
                }
            }
        }
    }

    let mut report = AggregationReport {
        mode,
        ratios: Vec::new(),
        malformed_spot_names: 0,
        undefined_ratios: 0,
    };

    for (frame_id, sums) in spots {
        let coordinate = match SpotCoordinate::parse(&sums.spot_name) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("Frame {}: {}, excluded from the heatmap", frame_id, e);
                report.malformed_spot_names += 1;
                None
            }
        };

        let Some((_, _, internal_standard_mz)) = mode.selectors() else {
            continue;
        };
        let ratio = RatioValue::divide(sums.numerator, sums.denominator);
        let (internal_standard_intensity, normalized_ratio) = match (internal_standard_mz, ratio) {
            (None, _) => (None, ratio),
            (Some(_), RatioValue::Defined(r)) => (
                Some(sums.internal_standard),
                RatioValue::divide(r, sums.internal_standard),
            ),
            (Some(_), RatioValue::Undefined) => (Some(sums.internal_standard), RatioValue::Undefined),
        };
        if normalized_ratio.is_undefined() {
            debug!("Frame {} ({}): undefined ratio", frame_id, sums.spot_name);
            report.undefined_ratios += 1;
        }

        report.ratios.push(RatioRecord {
            frame_id,
            spot_name: sums.spot_name,
            coordinate,
            numerator_intensity: sums.numerator,
            denominator_intensity: sums.denominator,
            internal_standard_intensity,
            ratio,
            normalized_ratio,
        });
    }

    report
}
