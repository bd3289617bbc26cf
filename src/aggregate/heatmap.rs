//! Spot-grid pivot of normalized ratios.

use std::collections::HashMap;

use super::ratio::RatioRecord;
use super::spot::{compare_columns, compare_rows};

/// Sparse (row, column) → mean normalized ratio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatmapGrid {
    rows: Vec<String>,
    columns: Vec<String>,
    cells: HashMap<(String, String), f64>,
}

impl HeatmapGrid {
    /// Row labels in plate order.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Column labels in numeric order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cell value; `None` when no frame contributed a defined ratio.
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        self.cells.get(&(row.to_string(), column.to_string())).copied()
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is populated.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Pivot ratio records into a spot grid.
///
/// Each cell is the mean of the defined normalized ratios of the frames at
/// that spot. Records with a malformed spot name or an undefined ratio do not
/// contribute; rows and columns only appear when they hold at least one cell.
pub fn pivot(ratios: &[RatioRecord]) -> HeatmapGrid {
    let mut sums: HashMap<(String, String), (f64, usize)> = HashMap::new();
    for record in ratios {
        let (Some(coordinate), Some(value)) = (&record.coordinate, record.normalized_ratio.value())
        else {
            continue;
        };
        let entry = sums
            .entry((coordinate.row.clone(), coordinate.column.clone()))
            .or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let cells: HashMap<(String, String), f64> = sums
        .into_iter()
        .map(|(key, (sum, n))| (key, sum / n as f64))
        .collect();

    let mut rows: Vec<String> = cells.keys().map(|(r, _)| r.clone()).collect();
    rows.sort_by(|a, b| compare_rows(a, b));
    rows.dedup();
    let mut columns: Vec<String> = cells.keys().map(|(_, c)| c.clone()).collect();
    columns.sort_by(|a, b| compare_columns(a, b));
    columns.dedup();

    HeatmapGrid {
        rows,
        columns,
        cells,
    }
}
