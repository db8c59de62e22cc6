//! Loss functions for scoring forecasts

use crate::error::{FillError, Result};
use serde::{Deserialize, Serialize};

/// Loss minimised while tuning a pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loss {
    /// Mean Absolute Error
    #[default]
    Mae,
    /// Mean Squared Error
    Mse,
}

impl Loss {
    /// Score `forecast` against `actual`; lower is better
    pub fn evaluate(&self, forecast: &[f64], actual: &[f64]) -> Result<f64> {
        match self {
            Loss::Mae => mean_absolute_error(forecast, actual),
            Loss::Mse => mean_squared_error(forecast, actual),
        }
    }
}

fn check_pair(forecast: &[f64], actual: &[f64]) -> Result<()> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(FillError::InvalidInput(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }
    Ok(())
}

/// Mean Absolute Error
pub fn mean_absolute_error(forecast: &[f64], actual: &[f64]) -> Result<f64> {
    check_pair(forecast, actual)?;
    let sum: f64 = forecast
        .iter()
        .zip(actual)
        .map(|(f, a)| (a - f).abs())
        .sum();
    Ok(sum / forecast.len() as f64)
}

/// Mean Squared Error
pub fn mean_squared_error(forecast: &[f64], actual: &[f64]) -> Result<f64> {
    check_pair(forecast, actual)?;
    let sum: f64 = forecast
        .iter()
        .zip(actual)
        .map(|(f, a)| (a - f).powi(2))
        .sum();
    Ok(sum / forecast.len() as f64)
}
