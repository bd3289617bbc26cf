use crate::feature::FeatureWindow;
use crate::tdf::Frame;

/// Summed intensity of one feature at one frame.
///
/// One record is emitted per (feature, frame) pair; the collection of records
/// is the flat intensity table.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityRecord {
    /// Frame id
    pub frame_id: u32,
    /// Spot of the frame
    pub spot_name: String,
    /// Feature the intensity was extracted for
    pub feature: FeatureWindow,
    /// Summed intensity (0.0 when nothing matched)
    pub intensity: f64,
}

impl IntensityRecord {
    /// Build a record for `frame`.
    pub fn new(frame: &Frame, feature: FeatureWindow, intensity: f64) -> Self {
        Self {
            frame_id: frame.id,
            spot_name: frame.spot_name.clone(),
            feature,
            intensity,
        }
    }
}

/// Extraction detail for one (feature, frame) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameIntensity {
    /// Summed intensity of matching peaks
    pub intensity: f64,
    /// Scans whose 1/K0 fell inside the mobility window
    pub scans_selected: usize,
    /// Scans read in the contiguous span
    pub scans_read: usize,
    /// Scans skipped because their arrays were inconsistent
    pub malformed_scans: usize,
    /// Peaks whose m/z fell inside the m/z window
    pub matched_peaks: usize,
}
