//! Reconciliation of parallel m/z, 1/K0 and tolerance lists.

use super::{FeatureError, FeatureWindow};

/// Resolve parallel value lists into one [`FeatureWindow`] per target.
///
/// `mz` and `ook0` must have the same length N. Each tolerance list must
/// either have length N or be a single value, which is then broadcast to all
/// N targets. Anything else fails with [`FeatureError::ArgumentCountMismatch`]
/// before any raw data is touched.
///
/// # Example
///
/// ```
/// use tims_targeted::feature::resolve_windows;
///
/// let windows = resolve_windows(&[100.0, 200.0], &[0.1], &[0.8, 0.9], &[0.02])?;
/// assert_eq!(windows.len(), 2);
/// assert_eq!(windows[1].mz_tol(), 0.1);
/// # Ok::<(), tims_targeted::feature::FeatureError>(())
/// ```
pub fn resolve_windows(
    mz: &[f64],
    mz_tol: &[f64],
    ook0: &[f64],
    ook0_tol: &[f64],
) -> Result<Vec<FeatureWindow>, FeatureError> {
    let mismatch = || FeatureError::ArgumentCountMismatch {
        mz: mz.len(),
        mz_tol: mz_tol.len(),
        ook0: ook0.len(),
        ook0_tol: ook0_tol.len(),
    };

    let n = mz.len();
    if n == 0 || ook0.len() != n {
        return Err(mismatch());
    }

    let mz_tol = broadcast(mz_tol, n).ok_or_else(mismatch)?;
    let ook0_tol = broadcast(ook0_tol, n).ok_or_else(mismatch)?;

    mz.iter()
        .zip(mz_tol)
        .zip(ook0.iter())
        .zip(ook0_tol)
        .map(|(((&mz, mz_tol), &ook0), ook0_tol)| FeatureWindow::new(mz, mz_tol, ook0, ook0_tol))
        .collect()
}

/// Expand a tolerance list to length `n`, or `None` if it cannot be.
fn broadcast(values: &[f64], n: usize) -> Option<Vec<f64>> {
    match values.len() {
        len if len == n => Some(values.to_vec()),
        1 => Some(vec![values[0]; n]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_both_tolerances() {
        let windows =
            resolve_windows(&[100.0, 200.0, 300.0], &[0.1], &[0.8, 0.9, 1.0], &[0.02]).unwrap();

        assert_eq!(windows.len(), 3);
        let expected = [(100.0, 0.8), (200.0, 0.9), (300.0, 1.0)];
        for (window, (mz, ook0)) in windows.iter().zip(expected) {
            assert_eq!(window.mz(), mz);
            assert_eq!(window.ook0(), ook0);
            assert_eq!(window.mz_tol(), 0.1);
            assert_eq!(window.ook0_tol(), 0.02);
        }
    }

    #[test]
    fn test_broadcast_single_tolerance_list() {
        let windows =
            resolve_windows(&[100.0, 200.0], &[0.1, 0.2], &[0.8, 0.9], &[0.03]).unwrap();
        assert_eq!(windows[0].mz_tol(), 0.1);
        assert_eq!(windows[1].mz_tol(), 0.2);
        assert_eq!(windows[0].ook0_tol(), 0.03);
        assert_eq!(windows[1].ook0_tol(), 0.03);

        let windows =
            resolve_windows(&[100.0, 200.0], &[0.1], &[0.8, 0.9], &[0.01, 0.02]).unwrap();
        assert_eq!(windows[1].mz_tol(), 0.1);
        assert_eq!(windows[1].ook0_tol(), 0.02);
    }

    #[test]
    fn test_all_lists_full_length() {
        let windows = resolve_windows(&[1.0, 2.0], &[0.1, 0.2], &[0.5, 0.6], &[0.01, 0.02]).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].ook0_tol(), 0.02);
    }

    #[test]
    fn test_single_feature() {
        let windows = resolve_windows(&[622.0], &[0.05], &[0.99], &[0.05]).unwrap();
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_value_count_mismatch() {
        let result = resolve_windows(&[100.0, 200.0], &[0.1], &[0.8, 0.9, 1.0], &[0.02]);
        assert!(matches!(
            result,
            Err(FeatureError::ArgumentCountMismatch { mz: 2, ook0: 3, .. })
        ));
    }

    #[test]
    fn test_tolerance_count_mismatch() {
        let result = resolve_windows(&[1.0, 2.0, 3.0], &[0.1, 0.2], &[0.5, 0.6, 0.7], &[0.02]);
        assert!(matches!(result, Err(FeatureError::ArgumentCountMismatch { .. })));

        let result = resolve_windows(&[1.0, 2.0, 3.0], &[0.1, 0.2, 0.3], &[0.5, 0.6, 0.7], &[0.1, 0.2]);
        assert!(matches!(result, Err(FeatureError::ArgumentCountMismatch { .. })));
    }

    #[test]
    fn test_empty_lists_rejected() {
        assert!(resolve_windows(&[], &[0.1], &[], &[0.1]).is_err());
        assert!(resolve_windows(&[1.0], &[], &[0.5], &[0.1]).is_err());
    }

    #[test]
    fn test_negative_broadcast_tolerance_rejected() {
        let result = resolve_windows(&[1.0, 2.0], &[-0.1], &[0.5, 0.6], &[0.1]);
        assert!(matches!(result, Err(FeatureError::InvalidWindow(_))));
    }
}
