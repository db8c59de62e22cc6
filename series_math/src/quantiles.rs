//! Quantiles and contiguous window splitting
//!
//! Quantiles use linear interpolation between the two closest ranks,
//! and windows are split the way an even partition with remainder works:
//! the first `len % count` windows hold one extra element.

use crate::{MathError, Result};
use std::ops::Range;

/// Returns the value at quantile `q` of `values`.
///
/// # Arguments
/// * `values` - Input sample, in any order
/// * `q` - Quantile level in `[0, 1]`
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take a quantile of an empty sample".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&q) || q.is_nan() {
        return Err(MathError::InvalidInput(format!(
            "Quantile level must be between 0 and 1, got {}",
            q
        )));
    }
    if values.iter().any(|v| v.is_nan()) {
        return Err(MathError::InvalidInput(
            "Sample contains NaN values".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    if n == 1 {
        return Ok(sorted[0]);
    }

    let pos = q * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    if lower == upper {
        Ok(sorted[lower])
    } else {
        Ok(sorted[lower] * (1.0 - frac) + sorted[upper] * frac)
    }
}

/// Index ranges splitting `len` elements into `count` contiguous windows.
///
/// Fails if any window would be empty, i.e. when `len < count`.
pub fn window_bounds(len: usize, count: usize) -> Result<Vec<Range<usize>>> {
    if count == 0 {
        return Err(MathError::InvalidInput(
            "Window count must be greater than zero".to_string(),
        ));
    }
    if len < count {
        return Err(MathError::InsufficientData(format!(
            "Cannot split {} values into {} non-empty windows",
            len, count
        )));
    }

    let base = len / count;
    let extra = len % count;
    let mut bounds = Vec::with_capacity(count);
    let mut start = 0;
    for i in 0..count {
        let size = if i < extra { base + 1 } else { base };
        bounds.push(start..start + size);
        start += size;
    }

    Ok(bounds)
}

/// Splits `values` into `count` contiguous, near-equal windows.
pub fn split_windows(values: &[f64], count: usize) -> Result<Vec<&[f64]>> {
    Ok(window_bounds(values.len(), count)?
        .into_iter()
        .map(|range| &values[range])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantile_quartiles() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(quantile(&series, 0.25).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(quantile(&series, 0.5).unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(quantile(&series, 0.75).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn quantile_interpolates_between_ranks() {
        let series = [4.0, 1.0, 3.0, 2.0];
        // position 0.25 * 3 = 0.75 between 1.0 and 2.0
        assert_relative_eq!(quantile(&series, 0.25).unwrap(), 1.75, epsilon = 1e-12);
        assert_relative_eq!(quantile(&series, 0.5).unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn quantile_single_value() {
        assert_relative_eq!(quantile(&[7.0], 0.75).unwrap(), 7.0);
    }

    #[test]
    fn quantile_rejects_bad_input() {
        assert!(matches!(
            quantile(&[], 0.5),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            quantile(&[1.0, 2.0], 1.5),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            quantile(&[1.0, f64::NAN], 0.5),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn windows_put_remainder_first() {
        let bounds = window_bounds(14, 6).unwrap();
        let sizes: Vec<usize> = bounds.iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2, 2, 2]);
        assert_eq!(bounds.last().unwrap().end, 14);
    }

    #[test]
    fn windows_even_split() {
        let values: Vec<f64> = (0..12).map(f64::from).collect();
        let windows = split_windows(&values, 6).unwrap();
        assert_eq!(windows.len(), 6);
        assert!(windows.iter().all(|w| w.len() == 2));
        assert_eq!(windows[5], &[10.0, 11.0]);
    }

    #[test]
    fn windows_reject_short_input() {
        assert!(window_bounds(5, 6).is_err());
        assert!(window_bounds(0, 6).is_err());
        assert!(window_bounds(10, 0).is_err());
    }
}
