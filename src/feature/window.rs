//! Validated (m/z, 1/K0) feature windows.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::FeatureError;

/// A targeted feature: an m/z window crossed with a 1/K0 window.
///
/// Both windows are closed intervals centred on the target value. A window is
/// validated once at construction and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureWindow {
    mz: f64,
    mz_tol: f64,
    ook0: f64,
    ook0_tol: f64,
}

impl FeatureWindow {
    /// Create a window, rejecting negative tolerances and non-finite values.
    pub fn new(mz: f64, mz_tol: f64, ook0: f64, ook0_tol: f64) -> Result<Self, FeatureError> {
        for (name, value) in [("mz", mz), ("mz_tol", mz_tol), ("ook0", ook0), ("ook0_tol", ook0_tol)] {
            if !value.is_finite() {
                return Err(FeatureError::InvalidWindow(format!("{name} is not finite: {value}")));
            }
        }
        if mz_tol < 0.0 {
            return Err(FeatureError::InvalidWindow(format!(
                "m/z tolerance must be >= 0, got {mz_tol}"
            )));
        }
        if ook0_tol < 0.0 {
            return Err(FeatureError::InvalidWindow(format!(
                "1/K0 tolerance must be >= 0, got {ook0_tol}"
            )));
        }
        Ok(Self {
            mz,
            mz_tol,
            ook0,
            ook0_tol,
        })
    }

    /// Target m/z.
    pub fn mz(&self) -> f64 {
        self.mz
    }

    /// m/z half-width in Da.
    pub fn mz_tol(&self) -> f64 {
        self.mz_tol
    }

    /// Target inverse ion mobility (1/K0).
    pub fn ook0(&self) -> f64 {
        self.ook0
    }

    /// 1/K0 half-width.
    pub fn ook0_tol(&self) -> f64 {
        self.ook0_tol
    }

    /// Inclusive m/z bounds.
    pub fn mz_bounds(&self) -> (f64, f64) {
        (self.mz - self.mz_tol, self.mz + self.mz_tol)
    }

    /// Inclusive 1/K0 bounds.
    pub fn ook0_bounds(&self) -> (f64, f64) {
        (self.ook0 - self.ook0_tol, self.ook0 + self.ook0_tol)
    }

    /// Whether `mz` falls inside the m/z window (both ends inclusive).
    #[inline]
    pub fn contains_mz(&self, mz: f64) -> bool {
        let (lo, hi) = self.mz_bounds();
        mz >= lo && mz <= hi
    }

    /// Whether `ook0` falls inside the 1/K0 window (both ends inclusive).
    #[inline]
    pub fn contains_mobility(&self, ook0: f64) -> bool {
        let (lo, hi) = self.ook0_bounds();
        ook0 >= lo && ook0 <= hi
    }
}

impl fmt::Display for FeatureWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/z {} ± {} @ 1/K0 {} ± {}",
            self.mz, self.mz_tol, self.ook0, self.ook0_tol
        )
    }
}

/// Raw feature-list row, validated into a [`FeatureWindow`] after parsing.
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureRow {
    pub mz: f64,
    pub mz_tol: f64,
    pub ook0: f64,
    pub ook0_tol: f64,
}

impl TryFrom<FeatureRow> for FeatureWindow {
    type Error = FeatureError;

    fn try_from(row: FeatureRow) -> Result<Self, Self::Error> {
        FeatureWindow::new(row.mz, row.mz_tol, row.ook0, row.ook0_tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds_inclusive() {
        let window = FeatureWindow::new(500.0, 0.5, 1.0, 0.25).unwrap();
        assert!(window.contains_mz(499.5));
        assert!(window.contains_mz(500.5));
        assert!(!window.contains_mz(500.5001));
        assert!(window.contains_mobility(0.75));
        assert!(window.contains_mobility(1.25));
        assert!(!window.contains_mobility(0.7499));
    }

    #[test]
    fn test_zero_tolerance_is_point_window() {
        let window = FeatureWindow::new(500.0, 0.0, 1.0, 0.0).unwrap();
        assert!(window.contains_mz(500.0));
        assert!(!window.contains_mz(500.0 + f64::EPSILON * 1000.0));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        assert!(matches!(
            FeatureWindow::new(500.0, -0.1, 1.0, 0.05),
            Err(FeatureError::InvalidWindow(_))
        ));
        assert!(matches!(
            FeatureWindow::new(500.0, 0.1, 1.0, -0.05),
            Err(FeatureError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(FeatureWindow::new(f64::NAN, 0.1, 1.0, 0.05).is_err());
        assert!(FeatureWindow::new(500.0, 0.1, f64::INFINITY, 0.05).is_err());
    }
}
