//! Summed intensity of one feature window in one frame.

use log::{trace, warn};

use super::FrameIntensity;
use crate::feature::FeatureWindow;
use crate::tdf::{DataAccessError, Frame, RawDataSource};

/// Extracts feature intensities from a raw-data source.
///
/// Each call is independent: nothing is cached or accumulated between frames.
pub struct FeatureExtractor<S> {
    source: S,
}

impl<S: RawDataSource> FeatureExtractor<S> {
    /// Create an extractor over `source` (usually a reference to a session).
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Summed intensity of `window` in `frame`; 0.0 when nothing matches.
    pub fn extract(&self, frame: &Frame, window: &FeatureWindow) -> Result<f64, DataAccessError> {
        Ok(self.extract_detailed(frame, window)?.intensity)
    }

    /// Like [`extract`](Self::extract), with scan and peak counts.
    ///
    /// The scan span read is the contiguous range between the lowest and the
    /// highest scan inside the 1/K0 window. This relies on 1/K0 being monotonic
    /// in scan number within a frame; with non-monotonic mobility, scans in
    /// the span but outside the window would also be summed.
    pub fn extract_detailed(
        &self,
        frame: &Frame,
        window: &FeatureWindow,
    ) -> Result<FrameIntensity, DataAccessError> {
        let scan_numbers: Vec<u32> = (0..=frame.num_scans).collect();
        let mobilities = self.source.scan_to_mobility(frame.id, &scan_numbers)?;

        let selected: Vec<f64> = mobilities
            .into_iter()
            .filter(|&ook0| window.contains_mobility(ook0))
            .collect();
        if selected.is_empty() {
            trace!("Frame {}: no scans within {:?}", frame.id, window.ook0_bounds());
            return Ok(FrameIntensity::default());
        }

        let selected_scans = self.source.mobility_to_scan(frame.id, &selected)?;
        let (Some(&first), Some(&last)) = (selected_scans.iter().min(), selected_scans.iter().max())
        else {
            return Ok(FrameIntensity::default());
        };

        let scans = self.source.read_scans(frame.id, first..=last)?;
        let mut result = FrameIntensity {
            scans_selected: selected.len(),
            scans_read: scans.len(),
            ..Default::default()
        };

        let mut indices: Vec<u32> = Vec::new();
        let mut intensities: Vec<f64> = Vec::new();
        let mut batched_scans = 0usize;
        for (offset, scan) in scans.iter().enumerate() {
            if scan.is_empty() {
                continue;
            }
            if scan.is_malformed() {
                warn!(
                    "Frame {} scan {}: {} indices vs {} intensities, skipping scan",
                    frame.id,
                    first as usize + offset,
                    scan.indices.len(),
                    scan.intensities.len()
                );
                result.malformed_scans += 1;
                continue;
            }
            indices.extend_from_slice(&scan.indices);
            intensities.extend_from_slice(&scan.intensities);
            batched_scans += 1;
        }
        if indices.is_empty() {
            return Ok(result);
        }

        let mz_values = self.source.index_to_mz(frame.id, &indices)?;
        if mz_values.len() != indices.len() {
            warn!(
                "Frame {}: {} m/z values for {} indices, skipping {} scans",
                frame.id,
                mz_values.len(),
                indices.len(),
                batched_scans
            );
            result.malformed_scans += batched_scans;
            return Ok(result);
        }

        for (mz, intensity) in mz_values.iter().zip(&intensities) {
            if window.contains_mz(*mz) {
                result.intensity += intensity;
                result.matched_peaks += 1;
            }
        }
        Ok(result)
    }
}
