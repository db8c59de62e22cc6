//! Serializable forecasting pipelines

use crate::error::{FillError, Result};
use crate::metrics::Loss;
use crate::models::tuning;
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use serde::{Deserialize, Serialize};
use series_math::forecasting::{
    DoubleExponentialSmoothing, ExponentialSmoothing, IncrementalForecaster, LinearRegression,
};
use series_math::moving_averages::SimpleMovingAverage;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// A pipeline configuration, as stored in an artifact file.
///
/// Serialized as a JSON object tagged by `model`, e.g.
/// `{"model": "holt", "alpha": 0.5, "beta": 0.1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum Pipeline {
    /// Repeats the last observation
    Naive,
    /// Simple exponential smoothing with a flat forecast
    ExponentialSmoothing { alpha: f64 },
    /// Holt's linear trend method
    Holt { alpha: f64, beta: f64 },
    /// Flat forecast at the mean of the last `window` observations
    MovingAverage { window: usize },
    /// Linear trend fitted to the last `period` observations
    LinearTrend { period: usize },
}

/// Carries the last observation forward
#[derive(Debug, Clone, Default)]
struct LastValue(Option<f64>);

impl IncrementalForecaster for LastValue {
    fn update(&mut self, value: f64) -> series_math::Result<()> {
        self.0 = Some(value);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.0.is_some()
    }

    fn forecast(&self, _periods_ahead: usize) -> series_math::Result<f64> {
        self.0.ok_or_else(|| {
            series_math::MathError::InsufficientData("No observation seen yet".to_string())
        })
    }
}

fn unit_grid(steps: u32) -> impl Iterator<Item = f64> {
    (1..steps).map(move |i| f64::from(i) / f64::from(steps))
}

impl Pipeline {
    /// Parse and validate a pipeline from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let pipeline: Pipeline = serde_json::from_str(json)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// Load a pipeline from an artifact file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Serialize the pipeline to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the pipeline to an artifact file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Check the parameters are usable
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    /// Observations needed before the pipeline can forecast
    pub fn min_observations(&self) -> usize {
        match self {
            Pipeline::Naive | Pipeline::ExponentialSmoothing { .. } => 1,
            Pipeline::Holt { .. } | Pipeline::LinearTrend { .. } => 2,
            Pipeline::MovingAverage { window } => *window,
        }
    }

    /// Parameter grid searched when tuning, within the same model family
    pub fn candidates(&self) -> Vec<Pipeline> {
        match self {
            Pipeline::Naive => vec![Pipeline::Naive],
            Pipeline::ExponentialSmoothing { .. } => unit_grid(20)
                .map(|alpha| Pipeline::ExponentialSmoothing { alpha })
                .collect(),
            Pipeline::Holt { .. } => unit_grid(10)
                .flat_map(|alpha| unit_grid(10).map(move |beta| Pipeline::Holt { alpha, beta }))
                .collect(),
            Pipeline::MovingAverage { .. } => (1..=12)
                .map(|window| Pipeline::MovingAverage { window })
                .collect(),
            Pipeline::LinearTrend { .. } => (2..=24)
                .map(|period| Pipeline::LinearTrend { period })
                .collect(),
        }
    }

    pub(crate) fn build(&self) -> Result<Box<dyn IncrementalForecaster>> {
        let node: Box<dyn IncrementalForecaster> = match self {
            Pipeline::Naive => Box::new(LastValue::default()),
            Pipeline::ExponentialSmoothing { alpha } => Box::new(ExponentialSmoothing::new(*alpha)?),
            Pipeline::Holt { alpha, beta } => {
                Box::new(DoubleExponentialSmoothing::new(*alpha, *beta)?)
            }
            Pipeline::MovingAverage { window } => Box::new(SimpleMovingAverage::new(*window)?),
            Pipeline::LinearTrend { period } => Box::new(LinearRegression::new(*period)?),
        };
        Ok(node)
    }

    fn check_series(&self, series: &[f64]) -> Result<()> {
        if series.len() < self.min_observations() {
            return Err(FillError::Engine(format!(
                "{} needs at least {} observation(s), got {}",
                self.name(),
                self.min_observations(),
                series.len()
            )));
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(FillError::Engine(
                "Series contains non-finite values".to_string(),
            ));
        }
        Ok(())
    }
}

impl ForecastModel for Pipeline {
    type Trained = TrainedPipeline;

    fn fit(&self, train: &[f64]) -> Result<TrainedPipeline> {
        self.check_series(train)?;
        let mut node = self.build()?;
        node.update_all(train)?;

        Ok(TrainedPipeline {
            pipeline: self.clone(),
            observations: train.len(),
            tuning_score: None,
        })
    }

    fn name(&self) -> &str {
        match self {
            Pipeline::Naive => "naive",
            Pipeline::ExponentialSmoothing { .. } => "exponential_smoothing",
            Pipeline::Holt { .. } => "holt",
            Pipeline::MovingAverage { .. } => "moving_average",
            Pipeline::LinearTrend { .. } => "linear_trend",
        }
    }
}

/// A pipeline fitted on a training series
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedPipeline {
    pipeline: Pipeline,
    observations: usize,
    tuning_score: Option<f64>,
}

impl TrainedPipeline {
    /// The configuration in use, e.g. for persisting a tuned pipeline
    pub fn to_pipeline(&self) -> Pipeline {
        self.pipeline.clone()
    }

    /// Number of observations the pipeline was fitted on
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Best in-sample loss found by the last tuning run
    pub fn tuning_score(&self) -> Option<f64> {
        self.tuning_score
    }
}

impl TrainedForecastModel for TrainedPipeline {
    fn fine_tune(self, loss: Loss, train: &[f64], budget: Duration) -> Result<Self> {
        let outcome = tuning::tune(&self.pipeline, train, loss, budget)?;
        debug!(
            model = self.pipeline.name(),
            evaluated = outcome.evaluated,
            score = ?outcome.score,
            "tuned pipeline"
        );

        let mut tuned = outcome.best.fit(train)?;
        tuned.tuning_score = outcome.score;
        Ok(tuned)
    }

    fn predict(&self, history: &[f64], horizon: usize) -> Result<ForecastResult> {
        self.pipeline.check_series(history)?;
        let mut node = self.pipeline.build()?;
        node.update_all(history)?;

        ForecastResult::new(node.forecast_path(horizon)?, horizon)
    }

    fn name(&self) -> &str {
        self.pipeline.name()
    }
}
