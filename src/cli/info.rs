use anyhow::{Context, Result};
use log::warn;
use std::collections::BTreeMap;
use std::path::PathBuf;

use tims_targeted::aggregate::SpotCoordinate;
use tims_targeted::tdf::sql::{read_global_metadata, read_maldi_frames, ANALYSIS_TDF};
use tims_targeted::tdf::{RawDataSource, SessionOptions, TimsSession};

/// Metadata keys worth showing when present.
const SHOWN_KEYS: [&str; 6] = [
    "AcquisitionSoftware",
    "AcquisitionSoftwareVersion",
    "InstrumentName",
    "InstrumentSerialNumber",
    "AcquisitionDateTime",
    "MaldiApplicationType",
];

/// Display the frames and spots of a .d directory
pub fn run(input: PathBuf, sdk_lib: Option<PathBuf>) -> Result<()> {
    if !input.is_dir() {
        anyhow::bail!("Not a .d directory: {}", input.display());
    }
    let tdf = input.join(ANALYSIS_TDF);
    let metadata = read_global_metadata(&tdf).unwrap_or_else(|e| {
        warn!("No global metadata: {}", e);
        BTreeMap::new()
    });
    let frames = read_maldi_frames(&tdf).context("Failed to read MALDI frames")?;

    println!("MALDI-TIMS Acquisition");
    println!("======================");
    println!("Input: {}", input.display());
    println!();

    println!("Metadata:");
    for key in SHOWN_KEYS {
        if let Some(value) = metadata.get(key) {
            println!("  {}: {}", key, value);
        }
    }
    println!();

    let mut rows: BTreeMap<usize, BTreeMap<String, usize>> = BTreeMap::new();
    let mut malformed = Vec::new();
    for frame in &frames {
        match SpotCoordinate::parse(&frame.spot_name) {
            Ok(spot) => {
                *rows
                    .entry(spot.row.len())
                    .or_default()
                    .entry(spot.row)
                    .or_default() += 1;
            }
            Err(_) => malformed.push(frame.spot_name.as_str()),
        }
    }

    println!("Frames: {}", frames.len());
    if let (Some(first), Some(last)) = (frames.first(), frames.last()) {
        println!("  Frame ids: {}..={}", first.id, last.id);
        println!("  First spot: {} ({} scans)", first.spot_name, first.num_scans);
        println!("  Last spot: {} ({} scans)", last.spot_name, last.num_scans);
    }
    println!("Spot rows:");
    for (label, count) in rows.values().flatten() {
        println!("  {}: {} frames", label, count);
    }
    if !malformed.is_empty() {
        println!("Malformed spot names: {}", malformed.join(", "));
    }

    if let Some(library) = sdk_lib {
        let options = SessionOptions {
            sdk_library: Some(library),
            ..Default::default()
        };
        let session = TimsSession::open(&input, &options).context("Failed to open acquisition")?;
        if let Some(frame) = frames.first() {
            let mobility = session
                .scan_to_mobility(frame.id, &[0, frame.num_scans])
                .context("Failed to convert scan numbers")?;
            if let [start, end] = mobility[..] {
                println!();
                println!("1/K0 range of frame {}: {:.4} - {:.4}", frame.id, start, end);
            }
        }
    }

    Ok(())
}
