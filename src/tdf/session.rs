//! An open Bruker `.d` acquisition.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, info, warn};

use super::sdk::BrukerTimsSdk;
use super::sql::{read_maldi_frames, ANALYSIS_TDF};
use super::{DataAccessError, Frame, RawDataSource, ScanPeaks};

/// Options for opening a [`TimsSession`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Explicit path to the timsdata shared library; the platform default
    /// name is looked up on the library search path when absent.
    pub sdk_library: Option<PathBuf>,
    /// Open with the recalibrated state stored in the dataset.
    pub use_recalibrated_state: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            sdk_library: None,
            use_recalibrated_state: true,
        }
    }
}

/// Exclusive session on one MALDI-TIMS dataset.
///
/// The vendor handle is opened once and closed when the session is dropped,
/// on every exit path. All vendor calls go through a mutex, so a session can
/// be shared between threads while the handle itself is only ever used by one
/// thread at a time.
pub struct TimsSession {
    sdk: BrukerTimsSdk,
    handle: Mutex<u64>,
    data_path: PathBuf,
    frames: Vec<Frame>,
    frame_index: HashMap<u32, usize>,
}

impl TimsSession {
    /// Open a `.d` directory.
    pub fn open<P: AsRef<Path>>(data_path: P, options: &SessionOptions) -> Result<Self, DataAccessError> {
        let data_path = data_path.as_ref();

        if !data_path.exists() {
            return Err(DataAccessError::InvalidPath(format!(
                "Path does not exist: {}",
                data_path.display()
            )));
        }
        if !data_path.is_dir() {
            return Err(DataAccessError::InvalidPath(format!(
                "Not a directory: {}",
                data_path.display()
            )));
        }
        let tdf_path = data_path.join(ANALYSIS_TDF);
        if !tdf_path.is_file() {
            return Err(DataAccessError::InvalidPath(format!(
                "No {} in {}",
                ANALYSIS_TDF,
                data_path.display()
            )));
        }

        // Metadata first, so a non-MALDI dataset never acquires a vendor handle.
        let frames = read_maldi_frames(&tdf_path)?;
        debug!("Read {} MALDI frames from {}", frames.len(), tdf_path.display());

        let sdk = BrukerTimsSdk::load(options.sdk_library.as_deref())?;
        let handle = sdk.open(data_path, options.use_recalibrated_state)?;
        info!(
            "Opened {} ({} frames) with {}",
            data_path.display(),
            frames.len(),
            sdk.path().display()
        );

        let frame_index = frames.iter().enumerate().map(|(i, f)| (f.id, i)).collect();
        Ok(Self {
            sdk,
            handle: Mutex::new(handle),
            data_path: data_path.to_path_buf(),
            frames,
            frame_index,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, u64>, DataAccessError> {
        self.handle.lock().map_err(|_| DataAccessError::SessionPoisoned)
    }

    fn frame(&self, frame_id: u32) -> Result<&Frame, DataAccessError> {
        self.frame_index
            .get(&frame_id)
            .map(|&i| &self.frames[i])
            .ok_or(DataAccessError::UnknownFrame(frame_id))
    }
}

impl RawDataSource for TimsSession {
    fn num_frames(&self) -> Result<u32, DataAccessError> {
        Ok(self.frames.len() as u32)
    }

    fn frame_metadata(&self, frame_id: u32) -> Result<Frame, DataAccessError> {
        self.frame(frame_id).cloned()
    }

    fn scan_to_mobility(&self, frame_id: u32, scans: &[u32]) -> Result<Vec<f64>, DataAccessError> {
        let scans: Vec<f64> = scans.iter().map(|&s| f64::from(s)).collect();
        let handle = self.lock()?;
        self.sdk.scan_to_mobility(*handle, frame_id, &scans)
    }

    fn mobility_to_scan(&self, frame_id: u32, mobilities: &[f64]) -> Result<Vec<u32>, DataAccessError> {
        let handle = self.lock()?;
        let scans = self.sdk.mobility_to_scan(*handle, frame_id, mobilities)?;
        // fractional scan numbers truncate
        Ok(scans.into_iter().map(|s| s.max(0.0) as u32).collect())
    }

    fn read_scans(
        &self,
        frame_id: u32,
        scans: RangeInclusive<u32>,
    ) -> Result<Vec<ScanPeaks>, DataAccessError> {
        let (begin, end) = scans.into_inner();
        let handle = self.lock()?;
        self.sdk.read_scans(*handle, frame_id, begin, end.saturating_add(1))
    }

    fn index_to_mz(&self, frame_id: u32, indices: &[u32]) -> Result<Vec<f64>, DataAccessError> {
        let indices: Vec<f64> = indices.iter().map(|&i| f64::from(i)).collect();
        let handle = self.lock()?;
        self.sdk.index_to_mz(*handle, frame_id, &indices)
    }

    fn frames(&self) -> Result<Vec<Frame>, DataAccessError> {
        Ok(self.frames.clone())
    }
}

impl Drop for TimsSession {
    fn drop(&mut self) {
        let handle = match self.handle.get_mut() {
            Ok(handle) => *handle,
            Err(poisoned) => *poisoned.into_inner(),
        };
        match self.sdk.close(handle) {
            Ok(()) => debug!("Closed {}", self.data_path.display()),
            Err(e) => warn!("Failed to close {}: {}", self.data_path.display(), e),
        }
    }
}
