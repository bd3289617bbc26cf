//! Raw-data access for MALDI-TIMS acquisitions.
//!
//! The extraction code never touches the vendor format directly. It talks to
//! a [`RawDataSource`], which exposes the per-frame scan layout and the two
//! vendor calibrations (scan number ↔ 1/K0, TOF index ↔ m/z) as batched calls.
//!
//! Two sources are provided:
//!
//! - [`TimsSession`]: a Bruker `.d` directory. Frame and spot tables are read
//!   from `analysis.tdf` with SQLite; calibrations and peak reads are delegated
//!   to the vendor `timsdata` shared library loaded at runtime.
//! - [`InMemoryRawData`]: deterministic synthetic frames with linear
//!   calibrations, for tests, benchmarks and the `demo` command.
//!
//! # Example
//!
//! ```no_run
//! use tims_targeted::tdf::{RawDataSource, SessionOptions, TimsSession};
//!
//! let session = TimsSession::open("run.d", &SessionOptions::default())?;
//! for frame in session.frames()? {
//!     println!("frame {} at spot {} ({} scans)", frame.id, frame.spot_name, frame.num_scans);
//! }
//! # Ok::<(), tims_targeted::tdf::DataAccessError>(())
//! ```

use std::ops::RangeInclusive;

pub mod error;
pub mod memory;
pub mod sdk;
pub mod session;
pub mod sql;

pub use error::DataAccessError;
pub use memory::{InMemoryFrame, InMemoryRawData};
pub use sdk::BrukerTimsSdk;
pub use session::{SessionOptions, TimsSession};

/// One acquisition event, tied to one spot of the MALDI target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame id (Frames.Id)
    pub id: u32,
    /// Number of mobility scans in the frame
    pub num_scans: u32,
    /// Spot label from MaldiFrameInfo (e.g. "A12")
    pub spot_name: String,
}

impl Frame {
    /// Create a frame description.
    pub fn new(id: u32, num_scans: u32, spot_name: impl Into<String>) -> Self {
        Self {
            id,
            num_scans,
            spot_name: spot_name.into(),
        }
    }
}

/// Peaks of one mobility scan: parallel TOF index and intensity arrays.
///
/// The arrays are expected to have equal length; sources do not enforce this,
/// and consumers treat a mismatch as a malformed scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPeaks {
    /// TOF indices of the peaks
    pub indices: Vec<u32>,
    /// Peak intensities
    pub intensities: Vec<f64>,
}

impl ScanPeaks {
    /// Create a scan from parallel arrays.
    pub fn new(indices: Vec<u32>, intensities: Vec<f64>) -> Self {
        Self {
            indices,
            intensities,
        }
    }

    /// Whether the scan holds no peaks at all.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.intensities.is_empty()
    }

    /// Whether index and intensity arrays disagree or one of them is missing.
    pub fn is_malformed(&self) -> bool {
        self.indices.len() != self.intensities.len()
    }
}

/// Access to frames, calibrations and peaks of one acquisition.
///
/// All conversion calls are batched: one call converts a whole slice for a
/// single frame. Implementations must return output slices of the same length
/// as their input.
pub trait RawDataSource {
    /// Number of frames (spots) in the acquisition.
    fn num_frames(&self) -> Result<u32, DataAccessError>;

    /// Scan count and spot name of one frame.
    fn frame_metadata(&self, frame_id: u32) -> Result<Frame, DataAccessError>;

    /// Convert scan numbers to 1/K0 values.
    fn scan_to_mobility(&self, frame_id: u32, scans: &[u32]) -> Result<Vec<f64>, DataAccessError>;

    /// Convert 1/K0 values back to scan numbers (may round).
    fn mobility_to_scan(&self, frame_id: u32, mobilities: &[f64]) -> Result<Vec<u32>, DataAccessError>;

    /// Read the peaks of every scan in an inclusive scan range, one entry per scan.
    fn read_scans(
        &self,
        frame_id: u32,
        scans: RangeInclusive<u32>,
    ) -> Result<Vec<ScanPeaks>, DataAccessError>;

    /// Convert TOF indices to m/z values.
    fn index_to_mz(&self, frame_id: u32, indices: &[u32]) -> Result<Vec<f64>, DataAccessError>;

    /// All frames, in frame-id order. Frames are numbered from 1.
    fn frames(&self) -> Result<Vec<Frame>, DataAccessError> {
        (1..=self.num_frames()?)
            .map(|id| self.frame_metadata(id))
            .collect()
    }
}

impl<S: RawDataSource + ?Sized> RawDataSource for &S {
    fn num_frames(&self) -> Result<u32, DataAccessError> {
        (**self).num_frames()
    }

    fn frame_metadata(&self, frame_id: u32) -> Result<Frame, DataAccessError> {
        (**self).frame_metadata(frame_id)
    }

    fn scan_to_mobility(&self, frame_id: u32, scans: &[u32]) -> Result<Vec<f64>, DataAccessError> {
        (**self).scan_to_mobility(frame_id, scans)
    }

    fn mobility_to_scan(&self, frame_id: u32, mobilities: &[f64]) -> Result<Vec<u32>, DataAccessError> {
        (**self).mobility_to_scan(frame_id, mobilities)
    }

    fn read_scans(
        &self,
        frame_id: u32,
        scans: RangeInclusive<u32>,
    ) -> Result<Vec<ScanPeaks>, DataAccessError> {
        (**self).read_scans(frame_id, scans)
    }

    fn index_to_mz(&self, frame_id: u32, indices: &[u32]) -> Result<Vec<f64>, DataAccessError> {
        (**self).index_to_mz(frame_id, indices)
    }

    fn frames(&self) -> Result<Vec<Frame>, DataAccessError> {
        (**self).frames()
    }
}
