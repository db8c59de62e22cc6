//! Similarity measures between equal-length vectors

use crate::{MathError, Result};
use statrs::statistics::Statistics;

fn check_lengths(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(MathError::InvalidInput(format!(
            "Vectors have different lengths ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

/// Cosine distance `1 - (a . b) / (|a| |b|)`.
///
/// Zero for vectors pointing the same way, one for orthogonal vectors.
/// Undefined (and an error) when either vector has zero norm or holds a
/// non-finite value.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    check_lengths(a, b)?;
    if a.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compare empty vectors".to_string(),
        ));
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if !(dot.is_finite() && norm_a.is_finite() && norm_b.is_finite()) {
        return Err(MathError::CalculationError(
            "Cosine distance is undefined for non-finite values".to_string(),
        ));
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(MathError::CalculationError(
            "Cosine distance is undefined for a zero vector".to_string(),
        ));
    }

    // Rounding can push the similarity a hair past 1.
    let similarity = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    Ok(1.0 - similarity)
}

/// Pearson correlation coefficient of two paired samples.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    check_lengths(x, y)?;
    if x.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Correlation needs at least 2 paired points, got {}",
            x.len()
        )));
    }

    let covariance = x.iter().covariance(y.iter());
    let std_x = x.iter().std_dev();
    let std_y = y.iter().std_dev();
    let denominator = std_x * std_y;

    if !denominator.is_finite() || denominator == 0.0 {
        return Err(MathError::CalculationError(
            "Correlation is undefined for a constant series".to_string(),
        ));
    }

    Ok((covariance / denominator).clamp(-1.0, 1.0))
}
