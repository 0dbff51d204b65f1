//! Cross-sectional statistics used when combining indicators.

use ndarray::ArrayView1;

/// Standard deviations below this are treated as zero.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

/// Z-scores of a cross-section, using the sample standard deviation (ddof = 1).
///
/// A cross-section with fewer than two values or (near) zero dispersion
/// carries no ranking information and standardizes to all zeros.
///
/// # Examples
///
/// ```
/// use apogee_traits::stats::standardize;
///
/// let z = standardize(&[1.0, 2.0, 3.0]);
/// assert!((z[0] + 1.0).abs() < 1e-12);
/// assert!(z[1].abs() < 1e-12);
/// assert!((z[2] - 1.0).abs() < 1e-12);
/// ```
pub fn standardize(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return vec![0.0; values.len()];
    }
    let view = ArrayView1::from(values);
    let mean = view.mean().unwrap_or(0.0);
    let std = view.std(1.0);
    if std.is_finite() && std > MIN_STD_THRESHOLD {
        view.iter().map(|x| (x - mean) / std).collect()
    } else {
        vec![0.0; values.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_standardize_moments() {
        let z = standardize(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mean = z.iter().sum::<f64>() / z.len() as f64;
        let var = z.iter().map(|x| x.powi(2)).sum::<f64>() / (z.len() - 1) as f64;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(var, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_standardize_degenerate() {
        assert!(standardize(&[]).is_empty());
        assert_eq!(standardize(&[42.0]), vec![0.0]);
        assert_eq!(standardize(&[3.0, 3.0, 3.0]), vec![0.0; 3]);
    }

    #[test]
    fn test_standardize_preserves_order() {
        let z = standardize(&[0.3, -1.0, 2.0]);
        assert!(z[2] > z[0] && z[0] > z[1]);
    }
}
