use std::fmt;

use serde::Serialize;

use super::FrameIntensity;

/// Counters collected over an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Feature windows evaluated
    pub features: usize,
    /// Frames per feature
    pub frames: usize,
    /// Records emitted
    pub records: usize,
    /// Records whose intensity is exactly zero
    pub zero_intensity_records: usize,
    /// Records with no scan inside the 1/K0 window
    pub empty_mobility_windows: usize,
    /// Scans read across all records
    pub scans_read: usize,
    /// Scans skipped as malformed
    pub malformed_scans: usize,
    /// Peaks that matched their feature window
    pub matched_peaks: usize,
}

impl ExtractionStats {
    pub(crate) fn record(&mut self, detail: &FrameIntensity) {
        self.records += 1;
        if detail.intensity == 0.0 {
            self.zero_intensity_records += 1;
        }
        if detail.scans_selected == 0 {
            self.empty_mobility_windows += 1;
        }
        self.scans_read += detail.scans_read;
        self.malformed_scans += detail.malformed_scans;
        self.matched_peaks += detail.matched_peaks;
    }
}

impl fmt::Display for ExtractionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extraction: {} features x {} frames, {} records ({} zero), {} scans read, {} malformed scans, {} matched peaks",
            self.features,
            self.frames,
            self.records,
            self.zero_intensity_records,
            self.scans_read,
            self.malformed_scans,
            self.matched_peaks
        )
    }
}
