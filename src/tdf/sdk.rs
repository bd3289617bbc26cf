//! Thin bindings to the Bruker `timsdata` shared library.
//!
//! Symbols are resolved on every call, so a library missing an optional
//! function only fails when that function is actually used.

use std::ffi::CString;
use std::os::raw::{c_char, c_double, c_void};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use log::debug;

use super::{DataAccessError, ScanPeaks};

type OpenFn = unsafe extern "C" fn(*const c_char, u32) -> u64;
type CloseFn = unsafe extern "C" fn(u64);
type LastErrorFn = unsafe extern "C" fn(*mut c_char, u32) -> u32;
type ConvertFn = unsafe extern "C" fn(u64, i64, *const c_double, *mut c_double, u32) -> u32;
type ReadScansFn = unsafe extern "C" fn(u64, i64, u32, u32, *mut c_void, u32) -> u32;

/// Initial scan buffer size in 32-bit words; grown on demand.
const INITIAL_SCAN_BUFFER_WORDS: usize = 128 * 1024;

/// A loaded `timsdata` library.
pub struct BrukerTimsSdk {
    lib: Library,
    path: PathBuf,
}

impl BrukerTimsSdk {
    /// Platform default library file name.
    pub fn default_library_name() -> &'static str {
        if cfg!(target_os = "windows") {
            "timsdata.dll"
        } else if cfg!(target_os = "macos") {
            "libtimsdata.dylib"
        } else {
            "libtimsdata.so"
        }
    }

    /// Load the library from an explicit path, or from the platform default
    /// name resolved through the system library search path.
    pub fn load(path: Option<&Path>) -> Result<Self, DataAccessError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(Self::default_library_name()));
        debug!("Loading timsdata library from {}", path.display());
        // SAFETY: only the symbols typed above are ever called.
        let lib = unsafe { Library::new(&path)? };
        Ok(Self { lib, path })
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a dataset, returning the raw vendor handle.
    pub fn open(&self, data_path: &Path, use_recalibrated_state: bool) -> Result<u64, DataAccessError> {
        let c_path = CString::new(data_path.to_string_lossy().as_bytes()).map_err(|_| {
            DataAccessError::InvalidPath(format!("Path contains NUL byte: {}", data_path.display()))
        })?;
        let handle = unsafe {
            let func: Symbol<OpenFn> = self.lib.get(b"tims_open")?;
            func(c_path.as_ptr(), u32::from(use_recalibrated_state))
        };
        if handle == 0 {
            return Err(DataAccessError::OpenFailed {
                path: data_path.display().to_string(),
                message: self.last_error(),
            });
        }
        Ok(handle)
    }

    /// Close a handle returned by [`open`](Self::open).
    pub fn close(&self, handle: u64) -> Result<(), DataAccessError> {
        unsafe {
            let func: Symbol<CloseFn> = self.lib.get(b"tims_close")?;
            func(handle);
        }
        Ok(())
    }

    /// Last error message recorded by the library on this thread.
    pub fn last_error(&self) -> String {
        let func: Symbol<LastErrorFn> = match unsafe { self.lib.get(b"tims_get_last_error_string") } {
            Ok(func) => func,
            Err(e) => return format!("unknown error ({e})"),
        };
        let mut buf = vec![0u8; 512];
        let required = unsafe { func(buf.as_mut_ptr() as *mut c_char, buf.len() as u32) } as usize;
        if required > buf.len() {
            buf.resize(required, 0);
            unsafe { func(buf.as_mut_ptr() as *mut c_char, buf.len() as u32) };
        }
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        String::from_utf8_lossy(&buf[..end]).into_owned()
    }

    /// Scan numbers to 1/K0 for one frame.
    pub fn scan_to_mobility(&self, handle: u64, frame_id: u32, scans: &[f64]) -> Result<Vec<f64>, DataAccessError> {
        self.convert(b"tims_scannum_to_oneoverk0", "tims_scannum_to_oneoverk0", handle, frame_id, scans)
    }

    /// 1/K0 to fractional scan numbers for one frame.
    pub fn mobility_to_scan(&self, handle: u64, frame_id: u32, mobilities: &[f64]) -> Result<Vec<f64>, DataAccessError> {
        self.convert(b"tims_oneoverk0_to_scannum", "tims_oneoverk0_to_scannum", handle, frame_id, mobilities)
    }

    /// TOF indices to m/z for one frame.
    pub fn index_to_mz(&self, handle: u64, frame_id: u32, indices: &[f64]) -> Result<Vec<f64>, DataAccessError> {
        self.convert(b"tims_index_to_mz", "tims_index_to_mz", handle, frame_id, indices)
    }

    fn convert(
        &self,
        symbol: &[u8],
        call: &'static str,
        handle: u64,
        frame_id: u32,
        input: &[f64],
    ) -> Result<Vec<f64>, DataAccessError> {
        let mut output = vec![0.0; input.len()];
        if input.is_empty() {
            return Ok(output);
        }
        let status = unsafe {
            let func: Symbol<ConvertFn> = self.lib.get(symbol)?;
            func(
                handle,
                i64::from(frame_id),
                input.as_ptr(),
                output.as_mut_ptr(),
                input.len() as u32,
            )
        };
        if status == 0 {
            return Err(DataAccessError::CallFailed {
                call,
                frame_id,
                message: self.last_error(),
            });
        }
        Ok(output)
    }

    /// Read scans `[scan_begin, scan_end)` of one frame.
    pub fn read_scans(
        &self,
        handle: u64,
        frame_id: u32,
        scan_begin: u32,
        scan_end: u32,
    ) -> Result<Vec<ScanPeaks>, DataAccessError> {
        if scan_end <= scan_begin {
            return Ok(Vec::new());
        }
        let func: Symbol<ReadScansFn> = unsafe { self.lib.get(b"tims_read_scans_v2")? };
        let mut buffer: Vec<u32> = vec![0; INITIAL_SCAN_BUFFER_WORDS];
        loop {
            let capacity_bytes = (buffer.len() * std::mem::size_of::<u32>()) as u32;
            let required_bytes = unsafe {
                func(
                    handle,
                    i64::from(frame_id),
                    scan_begin,
                    scan_end,
                    buffer.as_mut_ptr() as *mut c_void,
                    capacity_bytes,
                )
            };
            if required_bytes == 0 {
                return Err(DataAccessError::CallFailed {
                    call: "tims_read_scans_v2",
                    frame_id,
                    message: self.last_error(),
                });
            }
            if required_bytes <= capacity_bytes {
                let words = required_bytes as usize / std::mem::size_of::<u32>();
                return parse_scan_buffer(&buffer[..words], (scan_end - scan_begin) as usize)
                    .map_err(|message| DataAccessError::CorruptScanBuffer { frame_id, message });
            }
            debug!(
                "Growing scan buffer for frame {} to {} bytes",
                frame_id, required_bytes
            );
            buffer.resize(required_bytes as usize / std::mem::size_of::<u32>() + 1, 0);
        }
    }
}

/// Split a `tims_read_scans_v2` buffer into per-scan peak arrays.
///
/// Layout: `num_scans` peak counts, then for each scan its `n` TOF indices
/// followed by its `n` intensities.
pub fn parse_scan_buffer(buffer: &[u32], num_scans: usize) -> Result<Vec<ScanPeaks>, String> {
    if buffer.len() < num_scans {
        return Err(format!(
            "buffer holds {} words, header needs {}",
            buffer.len(),
            num_scans
        ));
    }
    let (counts, mut body) = buffer.split_at(num_scans);
    let mut scans = Vec::with_capacity(num_scans);
    for (scan, &count) in counts.iter().enumerate() {
        let n = count as usize;
        if body.len() < 2 * n {
            return Err(format!(
                "scan {} declares {} peaks but only {} words remain",
                scan,
                n,
                body.len()
            ));
        }
        let (indices, rest) = body.split_at(n);
        let (intensities, rest) = rest.split_at(n);
        scans.push(ScanPeaks::new(
            indices.to_vec(),
            intensities.iter().map(|&v| f64::from(v)).collect(),
        ));
        body = rest;
    }
    Ok(scans)
}
