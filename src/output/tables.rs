//! Delimited-text writers for the intensity, ratio and heatmap tables.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::OutputError;
use crate::aggregate::{HeatmapGrid, RatioRecord, RatioValue};
use crate::extract::IntensityRecord;

/// Flag written for ratio rows whose spot name did not parse.
pub const MALFORMED_SPOT_FLAG: &str = "malformed_spot_name";

#[derive(Serialize)]
struct IntensityRow<'a> {
    #[serde(rename = "Frame")]
    frame: u32,
    #[serde(rename = "Spot")]
    spot: &'a str,
    mz: f64,
    mz_tolerance: f64,
    ook0: f64,
    ook0_tol: f64,
    intensity: f64,
}

impl<'a> From<&'a IntensityRecord> for IntensityRow<'a> {
    fn from(record: &'a IntensityRecord) -> Self {
        Self {
            frame: record.frame_id,
            spot: &record.spot_name,
            mz: record.feature.mz(),
            mz_tolerance: record.feature.mz_tol(),
            ook0: record.feature.ook0(),
            ook0_tol: record.feature.ook0_tol(),
            intensity: record.intensity,
        }
    }
}

#[derive(Serialize)]
struct RatioRow<'a> {
    #[serde(rename = "Frame")]
    frame: u32,
    #[serde(rename = "Spot")]
    spot: &'a str,
    row: Option<&'a str>,
    column: Option<&'a str>,
    numerator_intensity: f64,
    denominator_intensity: f64,
    internal_standard_intensity: Option<f64>,
    ratio: RatioValue,
    normalized_ratio: RatioValue,
    flag: &'static str,
}

impl<'a> From<&'a RatioRecord> for RatioRow<'a> {
    fn from(record: &'a RatioRecord) -> Self {
        Self {
            frame: record.frame_id,
            spot: &record.spot_name,
            row: record.row(),
            column: record.column(),
            numerator_intensity: record.numerator_intensity,
            denominator_intensity: record.denominator_intensity,
            internal_standard_intensity: record.internal_standard_intensity,
            ratio: record.ratio,
            normalized_ratio: record.normalized_ratio,
            flag: if record.coordinate.is_none() {
                MALFORMED_SPOT_FLAG
            } else {
                ""
            },
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, OutputError> {
    Ok(BufWriter::new(File::create(path)?))
}

/// Write the flat intensity table
/// (`Frame,Spot,mz,mz_tolerance,ook0,ook0_tol,intensity`).
pub fn write_intensity_table<W: Write>(
    writer: W,
    records: &[IntensityRecord],
) -> Result<(), OutputError> {
    let mut csv = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv.write_record(["Frame", "Spot", "mz", "mz_tolerance", "ook0", "ook0_tol", "intensity"])?;
    }
    for record in records {
        csv.serialize(IntensityRow::from(record))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the per-spot ratio table; undefined ratios are written as
/// `undefined`.
pub fn write_ratio_table<W: Write>(writer: W, ratios: &[RatioRecord]) -> Result<(), OutputError> {
    let mut csv = csv::Writer::from_writer(writer);
    if ratios.is_empty() {
        csv.write_record([
            "Frame",
            "Spot",
            "row",
            "column",
            "numerator_intensity",
            "denominator_intensity",
            "internal_standard_intensity",
            "ratio",
            "normalized_ratio",
            "flag",
        ])?;
    }
    for record in ratios {
        csv.serialize(RatioRow::from(record))?;
    }
    csv.flush()?;
    Ok(())
}

/// One heatmap field; cells share the number formatting of the ratio table.
#[derive(Serialize)]
#[serde(untagged)]
enum HeatmapField<'a> {
    Label(&'a str),
    Cell(Option<f64>),
}

/// Write the heatmap as a matrix: header `row,<columns>`, one line per row
/// label, empty cells where no value exists.
pub fn write_heatmap<W: Write>(writer: W, grid: &HeatmapGrid) -> Result<(), OutputError> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(grid.columns().len() + 1);
    header.push("row".to_string());
    header.extend(grid.columns().iter().cloned());
    csv.write_record(&header)?;

    for row in grid.rows() {
        let mut line = Vec::with_capacity(header.len());
        line.push(HeatmapField::Label(row.as_str()));
        for column in grid.columns() {
            line.push(HeatmapField::Cell(grid.get(row, column)));
        }
        csv.serialize(&line)?;
    }
    csv.flush()?;
    Ok(())
}

/// [`write_intensity_table`] to a file.
pub fn write_intensity_csv(path: &Path, records: &[IntensityRecord]) -> Result<(), OutputError> {
    write_intensity_table(create(path)?, records)
}

/// [`write_ratio_table`] to a file.
pub fn write_ratio_csv(path: &Path, ratios: &[RatioRecord]) -> Result<(), OutputError> {
    write_ratio_table(create(path)?, ratios)
}

/// [`write_heatmap`] to a file.
pub fn write_heatmap_csv(path: &Path, grid: &HeatmapGrid) -> Result<(), OutputError> {
    write_heatmap(create(path)?, grid)
}
