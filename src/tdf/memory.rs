//! In-memory raw data with linear calibrations.
//!
//! Frames are assembled with a small builder; calibrations are linear
//! (`1/K0 = start + scan * step`, `m/z = start + index * step`) so tests can
//! place peaks at exact coordinates. The source counts reads and conversion
//! calls, which lets tests assert on batching.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{DataAccessError, Frame, RawDataSource, ScanPeaks};

/// Target (m/z, 1/K0) of the numerator feature on the synthetic plate.
pub const PLATE_NUMERATOR: (f64, f64) = (500.0, 0.90);
/// Target (m/z, 1/K0) of the denominator feature on the synthetic plate.
pub const PLATE_DENOMINATOR: (f64, f64) = (600.0, 1.10);
/// Target (m/z, 1/K0) of the internal standard on the synthetic plate.
pub const PLATE_INTERNAL_STANDARD: (f64, f64) = (700.0, 1.30);

/// A synthetic frame.
#[derive(Debug, Clone)]
pub struct InMemoryFrame {
    frame: Frame,
    mobility_start: f64,
    mobility_step: f64,
    mz_start: f64,
    mz_step: f64,
    scans: BTreeMap<u32, ScanPeaks>,
}

impl InMemoryFrame {
    /// Frame with default calibrations: 1/K0 falls from 1.6 by 0.002 per
    /// scan, m/z rises from 100 by 0.0005 per TOF index.
    pub fn new(id: u32, num_scans: u32, spot_name: impl Into<String>) -> Self {
        Self {
            frame: Frame::new(id, num_scans, spot_name),
            mobility_start: 1.6,
            mobility_step: -0.002,
            mz_start: 100.0,
            mz_step: 0.0005,
            scans: BTreeMap::new(),
        }
    }

    /// Override the scan → 1/K0 calibration.
    pub fn with_mobility_calibration(mut self, start: f64, step: f64) -> Self {
        self.mobility_start = start;
        self.mobility_step = step;
        self
    }

    /// Override the TOF index → m/z calibration.
    pub fn with_mz_calibration(mut self, start: f64, step: f64) -> Self {
        self.mz_start = start;
        self.mz_step = step;
        self
    }

    /// Add one peak at the TOF index nearest to `mz`.
    pub fn add_peak(mut self, scan: u32, mz: f64, intensity: f64) -> Self {
        let index = self.index_for_mz(mz);
        let peaks = self.scans.entry(scan).or_default();
        peaks.indices.push(index);
        peaks.intensities.push(intensity);
        self
    }

    /// Replace a scan's raw arrays verbatim, including malformed ones.
    pub fn with_scan(mut self, scan: u32, peaks: ScanPeaks) -> Self {
        self.scans.insert(scan, peaks);
        self
    }

    /// Frame description.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// 1/K0 of a scan number.
    pub fn mobility_of_scan(&self, scan: u32) -> f64 {
        self.mobility_start + f64::from(scan) * self.mobility_step
    }

    /// Nearest scan number for a 1/K0 value.
    pub fn scan_for_mobility(&self, ook0: f64) -> u32 {
        ((ook0 - self.mobility_start) / self.mobility_step).round().max(0.0) as u32
    }

    /// m/z of a TOF index.
    pub fn mz_of_index(&self, index: u32) -> f64 {
        self.mz_start + f64::from(index) * self.mz_step
    }

    /// Nearest TOF index for an m/z value.
    pub fn index_for_mz(&self, mz: f64) -> u32 {
        ((mz - self.mz_start) / self.mz_step).round().max(0.0) as u32
    }
}

/// A [`RawDataSource`] backed by synthetic frames.
#[derive(Debug, Default)]
pub struct InMemoryRawData {
    frames: Vec<InMemoryFrame>,
    index: HashMap<u32, usize>,
    scan_reads: AtomicUsize,
    conversion_calls: AtomicUsize,
}

impl InMemoryRawData {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame (builder style).
    pub fn with_frame(mut self, frame: InMemoryFrame) -> Self {
        self.push_frame(frame);
        self
    }

    /// Add a frame; a frame with an existing id replaces the old one.
    pub fn push_frame(&mut self, frame: InMemoryFrame) {
        match self.index.get(&frame.frame.id) {
            Some(&i) => self.frames[i] = frame,
            None => {
                self.index.insert(frame.frame.id, self.frames.len());
                self.frames.push(frame);
            }
        }
    }

    /// Number of `read_scans` calls served so far.
    pub fn scan_reads(&self) -> usize {
        self.scan_reads.load(Ordering::Relaxed)
    }

    /// Number of calibration calls served so far.
    pub fn conversion_calls(&self) -> usize {
        self.conversion_calls.load(Ordering::Relaxed)
    }

    /// A `rows × columns` MALDI plate (spots "A1", "A2", ..., "B1", ...).
    ///
    /// Each spot carries the three plate features spread over three adjacent
    /// scans, plus off-target background peaks. At row `r`, column `c`
    /// (0-based) the numerator sums to `1000 * (c + 1)`, the denominator to
    /// `1000 * (r + 1)` and the internal standard to `500`.
    pub fn synthetic_plate(rows: usize, columns: usize) -> Self {
        let mut source = Self::new();
        let mut id = 1u32;
        for r in 0..rows {
            for c in 0..columns {
                let spot = format!("{}{}", row_label(r), c + 1);
                let mut frame = InMemoryFrame::new(id, 500, spot);
                let features = [
                    (PLATE_NUMERATOR, 1000.0 * (c + 1) as f64),
                    (PLATE_DENOMINATOR, 1000.0 * (r + 1) as f64),
                    (PLATE_INTERNAL_STANDARD, 500.0),
                ];
                for ((mz, ook0), total) in features {
                    let center = frame.scan_for_mobility(ook0);
                    for (offset, share) in [(0u32, 0.25), (1, 0.5), (2, 0.25)] {
                        let scan = center + offset - 1;
                        frame = frame
                            .add_peak(scan, mz, total * share)
                            .add_peak(scan, mz + 2.0, 50.0);
                    }
                }
                // background at a mobility none of the features use
                frame = frame.add_peak(20, 500.0, 10_000.0).add_peak(20, 650.0, 10_000.0);
                source.push_frame(frame);
                id += 1;
            }
        }
        source
    }

    fn get(&self, frame_id: u32) -> Result<&InMemoryFrame, DataAccessError> {
        self.index
            .get(&frame_id)
            .map(|&i| &self.frames[i])
            .ok_or(DataAccessError::UnknownFrame(frame_id))
    }
}

/// Plate row label for a 0-based row: A..Z, then AA, AB, ...
fn row_label(mut row: usize) -> String {
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (row % 26) as u8);
        if row < 26 {
            break;
        }
        row = row / 26 - 1;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

impl RawDataSource for InMemoryRawData {
    fn num_frames(&self) -> Result<u32, DataAccessError> {
        Ok(self.frames.len() as u32)
    }

    fn frame_metadata(&self, frame_id: u32) -> Result<Frame, DataAccessError> {
        Ok(self.get(frame_id)?.frame.clone())
    }

    fn scan_to_mobility(&self, frame_id: u32, scans: &[u32]) -> Result<Vec<f64>, DataAccessError> {
        let frame = self.get(frame_id)?;
        self.conversion_calls.fetch_add(1, Ordering::Relaxed);
        Ok(scans.iter().map(|&s| frame.mobility_of_scan(s)).collect())
    }

    fn mobility_to_scan(&self, frame_id: u32, mobilities: &[f64]) -> Result<Vec<u32>, DataAccessError> {
        let frame = self.get(frame_id)?;
        self.conversion_calls.fetch_add(1, Ordering::Relaxed);
        Ok(mobilities.iter().map(|&m| frame.scan_for_mobility(m)).collect())
    }

    fn read_scans(
        &self,
        frame_id: u32,
        scans: RangeInclusive<u32>,
    ) -> Result<Vec<ScanPeaks>, DataAccessError> {
        let frame = self.get(frame_id)?;
        self.scan_reads.fetch_add(1, Ordering::Relaxed);
        Ok(scans
            .map(|scan| frame.scans.get(&scan).cloned().unwrap_or_default())
            .collect())
    }

    fn index_to_mz(&self, frame_id: u32, indices: &[u32]) -> Result<Vec<f64>, DataAccessError> {
        let frame = self.get(frame_id)?;
        self.conversion_calls.fetch_add(1, Ordering::Relaxed);
        Ok(indices.iter().map(|&i| frame.mz_of_index(i)).collect())
    }

    fn frames(&self) -> Result<Vec<Frame>, DataAccessError> {
        let mut frames: Vec<Frame> = self.frames.iter().map(|f| f.frame.clone()).collect();
        frames.sort_by_key(|f| f.id);
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_round_trip() {
        let frame = InMemoryFrame::new(1, 500, "A1");
        let scan = frame.scan_for_mobility(0.9);
        assert_eq!(scan, 350);
        assert!((frame.mobility_of_scan(scan) - 0.9).abs() < 1e-9);

        let index = frame.index_for_mz(500.0);
        assert_eq!(index, 800_000);
        assert!((frame.mz_of_index(index) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_mz_calibration() {
        let frame = InMemoryFrame::new(3, 20, "C4")
            .with_mz_calibration(200.0, 0.25)
            .add_peak(5, 210.0, 7.0);
        assert_eq!(frame.frame(), &Frame::new(3, 20, "C4"));
        assert_eq!(frame.index_for_mz(210.0), 40);

        let source = InMemoryRawData::new().with_frame(frame);
        let scans = source.read_scans(3, 5..=5).unwrap();
        assert_eq!(scans[0].indices, vec![40]);
        assert_eq!(source.index_to_mz(3, &scans[0].indices).unwrap(), vec![210.0]);
    }

    #[test]
    fn test_read_scans_fills_missing_with_empty() {
        let source = InMemoryRawData::new()
            .with_frame(InMemoryFrame::new(1, 10, "A1").add_peak(3, 200.0, 5.0));
        let scans = source.read_scans(1, 2..=4).unwrap();
        assert_eq!(scans.len(), 3);
        assert!(scans[0].is_empty());
        assert_eq!(scans[1].intensities, vec![5.0]);
        assert!(scans[2].is_empty());
        assert_eq!(source.scan_reads(), 1);
    }

    #[test]
    fn test_unknown_frame() {
        let source = InMemoryRawData::new();
        assert!(matches!(
            source.frame_metadata(7),
            Err(DataAccessError::UnknownFrame(7))
        ));
    }

    #[test]
    fn test_frames_sorted_by_id() {
        let source = InMemoryRawData::new()
            .with_frame(InMemoryFrame::new(2, 10, "A2"))
            .with_frame(InMemoryFrame::new(1, 10, "A1"));
        let frames = source.frames().unwrap();
        assert_eq!(frames[0].spot_name, "A1");
        assert_eq!(frames[1].spot_name, "A2");
    }

    #[test]
    fn test_row_labels() {
        assert_eq!(row_label(0), "A");
        assert_eq!(row_label(25), "Z");
        assert_eq!(row_label(26), "AA");
        assert_eq!(row_label(27), "AB");
    }

    #[test]
    fn test_synthetic_plate_layout() {
        let source = InMemoryRawData::synthetic_plate(2, 3);
        let frames = source.frames().unwrap();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[0].spot_name, "A1");
        assert_eq!(frames[5].spot_name, "B3");
    }
}
