//! Integration tests for tims-targeted
//!
//! These tests run the full pipeline from a raw-data source to the files on disk.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rusqlite::Connection;
use tempfile::tempdir;
use tims_targeted::prelude::*;
use tims_targeted::tdf::sql::read_maldi_frames;
use tims_targeted::tdf::{InMemoryFrame, ScanPeaks};

fn two_spot_source() -> InMemoryRawData {
    let a1 = InMemoryFrame::new(1, 500, "A1");
    let scan = a1.scan_for_mobility(1.0);
    let a1 = a1
        .add_peak(scan, 622.0, 10.0)
        .add_peak(scan, 622.03, 20.0)
        .add_peak(scan + 1, 621.96, 5.0)
        .add_peak(scan, 640.0, 999.0);
    let a2 = InMemoryFrame::new(2, 500, "A2").add_peak(scan, 580.0, 40.0);
    InMemoryRawData::new().with_frame(a1).with_frame(a2)
}

/// Two spots, one feature: 35 at A1, nothing at A2
#[test]
fn test_two_spot_intensity_table() {
    let dir = tempdir().unwrap();
    let source = two_spot_source();
    let windows = resolve_windows(&[622.0], &[0.05], &[1.0], &[0.01]).unwrap();

    let result = run_pipeline(&source, "two spots", &windows, &PipelineOptions::default()).unwrap();
    let paths = OutputPaths::new(dir.path(), "two_spots.csv").unwrap();
    write_outputs(&result, &windows, &paths).unwrap();

    let table = fs::read_to_string(&paths.intensity).unwrap();
    assert_eq!(
        table,
        "Frame,Spot,mz,mz_tolerance,ook0,ook0_tol,intensity\n\
         1,A1,622.0,0.05,1.0,0.01,35.0\n\
         2,A2,622.0,0.05,1.0,0.01,0.0\n"
    );
    assert_eq!(result.report.stats.zero_intensity_records, 1);
    assert!(!paths.ratios.exists());

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.summary).unwrap()).unwrap();
    assert_eq!(summary["report"]["stats"]["records"], 2);
    assert_eq!(summary["report"]["mode"]["mode"], "none");
}

/// Ratios, undefined ratios and malformed spot names end up in the right files
#[test]
fn test_ratio_and_heatmap_outputs() {
    let dir = tempdir().unwrap();
    let num = (500.0, 0.9);
    let den = (600.0, 1.1);

    let mut source = InMemoryRawData::new();
    for (id, spot, num_intensity, den_intensity) in [
        (1, "A1", 200.0, 100.0),
        (2, "A2", 300.0, 0.0),
        (3, "spot3", 50.0, 25.0),
        (4, "0_B1", 100.0, 100.0),
        (5, "B1", 300.0, 100.0),
    ] {
        let frame = InMemoryFrame::new(id, 500, spot);
        let num_scan = frame.scan_for_mobility(num.1);
        let den_scan = frame.scan_for_mobility(den.1);
        let mut frame = frame.add_peak(num_scan, num.0, num_intensity);
        if den_intensity > 0.0 {
            frame = frame.add_peak(den_scan, den.0, den_intensity);
        }
        source.push_frame(frame);
    }

    let windows = resolve_windows(&[num.0, den.0], &[0.05], &[num.1, den.1], &[0.01]).unwrap();
    let options = PipelineOptions {
        mode: AggregationMode::from_selectors(Some(num.1), Some(den.1), None).unwrap(),
        ..Default::default()
    };
    let result = run_pipeline(&source, "plate", &windows, &options).unwrap();
    let paths = OutputPaths::new(dir.path(), "plate.csv").unwrap();
    write_outputs(&result, &windows, &paths).unwrap();

    // every frame stays in the flat table
    let table = fs::read_to_string(&paths.intensity).unwrap();
    assert_eq!(table.lines().count(), 1 + 10);
    assert!(table.contains("3,spot3,500.0"));

    let ratios = fs::read_to_string(&paths.ratios).unwrap();
    let lines: Vec<&str> = ratios.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "1,A1,A,1,200.0,100.0,,2.0,2.0,");
    assert_eq!(lines[2], "2,A2,A,2,300.0,0.0,,undefined,undefined,");
    assert_eq!(lines[3], "3,spot3,,,50.0,25.0,,2.0,2.0,malformed_spot_name");
    assert!(!ratios.contains("NaN"));

    // B1 is the mean over frames 4 and 5; A2 has no defined ratio
    let heatmap = fs::read_to_string(&paths.heatmap).unwrap();
    assert_eq!(heatmap, "row,1\nA,2.0\nB,2.0\n");

    assert_eq!(result.report.malformed_spot_names, 1);
    assert_eq!(result.report.undefined_ratios, 1);
    assert!(result.report.has_issues());
}

/// Source that raises the cancellation flag after a number of scan reads
struct CancelAfter {
    inner: InMemoryRawData,
    flag: Arc<AtomicBool>,
    reads: AtomicUsize,
    limit: usize,
}

impl RawDataSource for CancelAfter {
    fn num_frames(&self) -> Result<u32, DataAccessError> {
        self.inner.num_frames()
    }

    fn frame_metadata(&self, frame_id: u32) -> Result<Frame, DataAccessError> {
        self.inner.frame_metadata(frame_id)
    }

    fn scan_to_mobility(&self, frame_id: u32, scans: &[u32]) -> Result<Vec<f64>, DataAccessError> {
        self.inner.scan_to_mobility(frame_id, scans)
    }

    fn mobility_to_scan(&self, frame_id: u32, mobilities: &[f64]) -> Result<Vec<u32>, DataAccessError> {
        self.inner.mobility_to_scan(frame_id, mobilities)
    }

    fn read_scans(
        &self,
        frame_id: u32,
        scans: RangeInclusive<u32>,
    ) -> Result<Vec<ScanPeaks>, DataAccessError> {
        if self.reads.fetch_add(1, Ordering::SeqCst) + 1 >= self.limit {
            self.flag.store(true, Ordering::SeqCst);
        }
        self.inner.read_scans(frame_id, scans)
    }

    fn index_to_mz(&self, frame_id: u32, indices: &[u32]) -> Result<Vec<f64>, DataAccessError> {
        self.inner.index_to_mz(frame_id, indices)
    }

    fn frames(&self) -> Result<Vec<Frame>, DataAccessError> {
        self.inner.frames()
    }
}

/// Cancellation keeps only complete records
#[test]
fn test_cancellation_between_frames() {
    let windows = resolve_windows(&[500.0], &[0.05], &[0.9], &[0.01]).unwrap();
    let reference = ExtractionDriver::new(&InMemoryRawData::synthetic_plate(2, 3))
        .run_all(&windows)
        .unwrap();

    let flag = Arc::new(AtomicBool::new(false));
    let source = CancelAfter {
        inner: InMemoryRawData::synthetic_plate(2, 3),
        flag: Arc::clone(&flag),
        reads: AtomicUsize::new(0),
        limit: 2,
    };
    let outcome = ExtractionDriver::new(&source)
        .with_cancellation(flag)
        .run_all(&windows)
        .unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[..], reference.records[..2]);
    assert_eq!(outcome.stats.records, 2);
}

/// Feature lists drive the same pipeline as command-line lists
#[test]
fn test_feature_list_pipeline() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("features.tsv");
    fs::write(
        &list,
        "name\tmz\tmz_tol\took0\took0_tol\n\
         numerator\t500.0\t0.05\t0.90\t0.01\n\
         denominator\t600.0\t0.05\t1.10\t0.01\n",
    )
    .unwrap();

    let windows = read_feature_list(&list).unwrap();
    let source = InMemoryRawData::synthetic_plate(1, 2);
    let options = PipelineOptions {
        mode: AggregationMode::from_selectors(Some(0.9), Some(1.1), None).unwrap(),
        ..Default::default()
    };
    let result = run_pipeline(&source, "plate", &windows, &options).unwrap();

    let ratios: Vec<Option<f64>> = result
        .aggregation
        .ratios
        .iter()
        .map(|r| r.ratio.value())
        .collect();
    assert_eq!(ratios, vec![Some(1.0), Some(2.0)]);
    assert_eq!(result.grid.get("A", "2"), Some(2.0));
}

fn write_analysis_tdf(path: &Path, frames: &[(u32, &str, u32)], maldi: bool) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE Frames (Id INTEGER PRIMARY KEY, NumScans INTEGER NOT NULL);
         CREATE TABLE GlobalMetadata (Key TEXT PRIMARY KEY, Value TEXT);
         INSERT INTO GlobalMetadata VALUES ('InstrumentName', 'timsTOF fleX');",
    )
    .unwrap();
    if maldi {
        conn.execute_batch("CREATE TABLE MaldiFrameInfo (Frame INTEGER PRIMARY KEY, SpotName TEXT NOT NULL);")
            .unwrap();
    }
    for &(id, spot, scans) in frames {
        conn.execute("INSERT INTO Frames VALUES (?1, ?2)", (id, scans)).unwrap();
        if maldi {
            conn.execute("INSERT INTO MaldiFrameInfo VALUES (?1, ?2)", (id, spot)).unwrap();
        }
    }
}

/// Frame metadata is read from analysis.tdf before the vendor library is needed
#[test]
fn test_dot_d_metadata_and_session_errors() {
    let dir = tempdir().unwrap();
    let dot_d = dir.path().join("plate.d");
    fs::create_dir(&dot_d).unwrap();
    write_analysis_tdf(&dot_d.join("analysis.tdf"), &[(2, "B1", 918), (1, "A1", 918)], true);

    let frames = read_maldi_frames(&dot_d.join("analysis.tdf")).unwrap();
    assert_eq!(frames, vec![Frame::new(1, 918, "A1"), Frame::new(2, 918, "B1")]);

    let options = SessionOptions {
        sdk_library: Some(dir.path().join("no_such_libtimsdata.so")),
        ..Default::default()
    };
    assert!(matches!(
        TimsSession::open(&dot_d, &options),
        Err(DataAccessError::LibraryError(_))
    ));

    assert!(matches!(
        TimsSession::open(dir.path().join("missing.d"), &options),
        Err(DataAccessError::InvalidPath(_))
    ));
}

/// Non-MALDI acquisitions are rejected
#[test]
fn test_missing_maldi_table() {
    let dir = tempdir().unwrap();
    let tdf = dir.path().join("analysis.tdf");
    write_analysis_tdf(&tdf, &[(1, "A1", 918)], false);
    assert!(matches!(
        read_maldi_frames(&tdf),
        Err(DataAccessError::MissingTable(table)) if table == "MaldiFrameInfo"
    ));
}
