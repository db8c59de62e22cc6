//! Forecasting engine contract and the bundled pipelines
//!
//! A pipeline configuration is fitted on a training series, optionally
//! tuned against a loss within a time budget, and then asked to continue
//! a series for a fixed number of steps. Configurations are persisted as
//! JSON artifacts.

use crate::error::{FillError, Result};
use crate::metrics::Loss;
use std::fmt::Debug;
use std::time::Duration;

pub mod pipeline;
pub mod tuning;

pub use pipeline::{Pipeline, TrainedPipeline};

/// Forecast result containing predicted values
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Forecasted values
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(FillError::Engine(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FillError::Engine(
                "Forecast contains non-finite values".to_string(),
            ));
        }

        Ok(Self { values, horizons })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Consume the result, returning the values
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug + Sized {
    /// Refine the model against `loss` on `train`, spending at most `budget`
    fn fine_tune(self, loss: Loss, train: &[f64], budget: Duration) -> Result<Self>;

    /// Forecast the `horizon` values that follow `history`
    fn predict(&self, history: &[f64], horizon: usize) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be fitted on a series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Fit the model on a training series
    fn fit(&self, train: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}
