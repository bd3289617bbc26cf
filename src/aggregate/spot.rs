//! MALDI spot name decomposition.

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Optional `<digits>_` plate prefix, row letters, column digits.
const SPOT_PATTERN: &str = r"^(?:\d+_)?([A-Z]+)(\d+)$";

static SPOT_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn spot_regex() -> Result<&'static Regex, &'static regex::Error> {
    SPOT_REGEX.get_or_init(|| Regex::new(SPOT_PATTERN)).as_ref()
}

/// A spot name that does not follow the plate naming convention.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed spot name: {0:?}")]
pub struct MalformedSpotName(pub String);

/// Row and column labels of a MALDI target spot ("A12" → "A", "12").
///
/// The column label keeps its digits verbatim, so "B07" has column "07".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SpotCoordinate {
    /// Row label (uppercase letters)
    pub row: String,
    /// Column label (digits)
    pub column: String,
}

impl SpotCoordinate {
    /// Split a spot name into row and column labels.
    ///
    /// ```
    /// use tims_targeted::aggregate::SpotCoordinate;
    ///
    /// let spot = SpotCoordinate::parse("0_B07")?;
    /// assert_eq!((spot.row.as_str(), spot.column.as_str()), ("B", "07"));
    /// assert!(SpotCoordinate::parse("spot1").is_err());
    /// # Ok::<(), tims_targeted::aggregate::MalformedSpotName>(())
    /// ```
    pub fn parse(spot_name: &str) -> Result<Self, MalformedSpotName> {
        let malformed = || MalformedSpotName(spot_name.to_string());
        let captures = spot_regex()
            .map_err(|_| malformed())?
            .captures(spot_name)
            .ok_or_else(malformed)?;
        match (captures.get(1), captures.get(2)) {
            (Some(row), Some(column)) => Ok(Self {
                row: row.as_str().to_string(),
                column: column.as_str().to_string(),
            }),
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for SpotCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}

/// Plate order of row labels: A < B < ... < Z < AA < AB.
pub(crate) fn compare_rows(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Numeric order of column labels of any length, ties ("7" vs "07") broken
/// by text.
pub(crate) fn compare_columns(a: &str, b: &str) -> Ordering {
    let (x, y) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
    x.len()
        .cmp(&y.len())
        .then_with(|| x.cmp(y))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let spot = SpotCoordinate::parse("A12").unwrap();
        assert_eq!(spot.row, "A");
        assert_eq!(spot.column, "12");
        assert_eq!(spot.to_string(), "A12");
    }

    #[test]
    fn test_parse_keeps_leading_zero() {
        let spot = SpotCoordinate::parse("B07").unwrap();
        assert_eq!(spot.row, "B");
        assert_eq!(spot.column, "07");
    }

    #[test]
    fn test_parse_plate_prefix_and_long_row() {
        let spot = SpotCoordinate::parse("12_AB3").unwrap();
        assert_eq!(spot.row, "AB");
        assert_eq!(spot.column, "3");
    }

    #[test]
    fn test_malformed_names() {
        for name in ["spot1", "", "A", "12", "a1", "A1B", " A1", "A1 ", "_A1", "A-1"] {
            assert_eq!(
                SpotCoordinate::parse(name),
                Err(MalformedSpotName(name.to_string())),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_row_and_column_order() {
        let mut rows = vec!["AA", "B", "Z", "A"];
        rows.sort_by(|a, b| compare_rows(a, b));
        assert_eq!(rows, vec!["A", "B", "Z", "AA"]);

        let mut columns = vec!["10", "2", "07", "1", "7"];
        columns.sort_by(|a, b| compare_columns(a, b));
        assert_eq!(columns, vec!["1", "2", "07", "7", "10"]);
    }

    #[test]
    fn test_column_order_beyond_u64() {
        let huge = "30000000000000000000000";
        let mut columns = vec!["12", huge, "5", "0", "10", "7", "2"];
        columns.sort_by(|a, b| compare_columns(a, b));
        assert_eq!(columns, vec!["0", "2", "5", "7", "10", "12", huge]);

        assert_eq!(compare_columns("5", huge), Ordering::Less);
        assert_eq!(compare_columns(huge, "0030000000000000000000000"), Ordering::Greater);
    }
}
