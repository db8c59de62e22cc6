//! # Series Math
//!
//! Numeric primitives for comparing and extending time series.
//! This crate provides the quantile and windowing helpers behind series
//! profiling, the similarity measures used to pick a reference series,
//! and the incremental smoothers the bundled forecasting pipelines are
//! built from.

use thiserror::Error;

pub mod forecasting;
pub mod moving_averages;
pub mod quantiles;
pub mod similarity;

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_detail() {
        let err = MathError::InsufficientData("need 2 points".to_string());
        assert_eq!(
            err.to_string(),
            "Insufficient data for calculation: need 2 points"
        );
    }
}
