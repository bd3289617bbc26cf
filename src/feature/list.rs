//! Batch feature lists: one feature window per row of a delimited file.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::window::FeatureRow;
use super::{FeatureError, FeatureWindow};

/// Columns every feature list must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["mz", "mz_tol", "ook0", "ook0_tol"];

/// Read a feature list file.
///
/// Files ending in `.tsv` or `.txt` are read tab-delimited, everything else
/// comma-delimited. Rows keep their input order.
pub fn read_feature_list<P: AsRef<Path>>(path: P) -> Result<Vec<FeatureWindow>, FeatureError> {
    let path = path.as_ref();
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("txt") => b'\t',
        _ => b',',
    };
    let file = File::open(path)?;
    parse_feature_list(BufReader::new(file), delimiter)
}

/// Parse a feature list from any reader.
pub fn parse_feature_list<R: Read>(reader: R, delimiter: u8) -> Result<Vec<FeatureWindow>, FeatureError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(FeatureError::MissingColumn(required.to_string()));
        }
    }

    let mut windows = Vec::new();
    for row in csv_reader.deserialize::<FeatureRow>() {
        windows.push(FeatureWindow::try_from(row?)?);
    }

    if windows.is_empty() {
        return Err(FeatureError::EmptyFeatureList);
    }
    Ok(windows)
}
