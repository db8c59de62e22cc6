//! Incremental forecasters for time series continuation
//!
//! Contains implementations of the building blocks used by forecasting
//! pipelines:
//! - Rolling least-squares trend
//! - Exponential Smoothing
//! - Double Exponential Smoothing (Holt's linear trend method)
//!
//! Each one consumes observations one at a time and can project the
//! series forward from the last observation seen.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Common interface for forecasters fed one observation at a time
pub trait IncrementalForecaster {
    /// Feed the next observation
    fn update(&mut self, value: f64) -> Result<()>;

    /// Whether enough observations have been seen to forecast
    fn is_ready(&self) -> bool;

    /// Forecast `periods_ahead` steps past the last observation (1 = next value)
    fn forecast(&self, periods_ahead: usize) -> Result<f64>;

    /// Feed every value of `values` in order
    fn update_all(&mut self, values: &[f64]) -> Result<()> {
        for &value in values {
            self.update(value)?;
        }
        Ok(())
    }

    /// Forecast the next `horizon` values
    fn forecast_path(&self, horizon: usize) -> Result<Vec<f64>> {
        (1..=horizon).map(|h| self.forecast(h)).collect()
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if value <= 0.0 || value >= 1.0 || value.is_nan() {
        return Err(MathError::InvalidInput(format!(
            "{} must be between 0 and 1 (exclusive)",
            name
        )));
    }
    Ok(())
}

/// Slope and intercept of the least-squares line through `(i, values[i])`.
///
/// Needs at least two points.
fn least_squares<'a, I>(values: I) -> Option<(f64, f64)>
where
    I: ExactSizeIterator<Item = &'a f64>,
{
    let n = values.len();
    if n < 2 {
        return None;
    }

    // Closed form sums over x = 0..n
    let nf = n as f64;
    let sum_x = nf * (nf - 1.0) / 2.0;
    let sum_xx = (nf - 1.0) * nf * (2.0 * nf - 1.0) / 6.0;
    let (sum_y, sum_xy) = values
        .enumerate()
        .fold((0.0, 0.0), |(sy, sxy), (i, &y)| (sy + y, sxy + i as f64 * y));

    let slope = (nf * sum_xy - sum_x * sum_y) / (nf * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / nf;
    Some((slope, intercept))
}

/// Least-squares trend over the most recent `period` observations
#[derive(Debug, Clone)]
pub struct LinearRegression {
    period: usize,
    window: VecDeque<f64>,
    fit: Option<(f64, f64)>,
}

impl LinearRegression {
    /// Create a trend fitted to at most `period` trailing observations
    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(format!(
                "A trend needs a period of at least 2, got {}",
                period
            )));
        }

        Ok(Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            fit: None,
        })
    }

    /// Slope of the current fit
    pub fn slope(&self) -> Result<f64> {
        self.fit.map(|(slope, _)| slope).ok_or_else(|| {
            MathError::InsufficientData("Trend needs two observations".to_string())
        })
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }
}

impl IncrementalForecaster for LinearRegression {
    fn update(&mut self, value: f64) -> Result<()> {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(value);
        self.fit = least_squares(self.window.iter());
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.fit.is_some()
    }

    /// Extends the fitted line past the end of the window
    fn forecast(&self, periods_ahead: usize) -> Result<f64> {
        let (slope, intercept) = self.fit.ok_or_else(|| {
            MathError::InsufficientData("Trend needs two observations".to_string())
        })?;
        let x = (self.window.len() - 1 + periods_ahead) as f64;
        Ok(intercept + slope * x)
    }
}

/// Simple exponential smoothing
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    alpha: f64,
    level: Option<f64>,
}

impl ExponentialSmoothing {
    /// Create a smoother with weight `alpha` on the newest observation
    pub fn new(alpha: f64) -> Result<Self> {
        check_unit_interval("Alpha", alpha)?;
        Ok(Self { alpha, level: None })
    }

    /// Get the current smoothed value
    pub fn value(&self) -> Result<f64> {
        self.level
            .ok_or_else(|| MathError::InsufficientData("Smoother has no level yet".to_string()))
    }

    /// Get the current alpha value
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl IncrementalForecaster for ExponentialSmoothing {
    fn update(&mut self, value: f64) -> Result<()> {
        let level = self
            .level
            .map_or(value, |prev| prev + self.alpha * (value - prev));
        self.level = Some(level);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.level.is_some()
    }

    /// Flat forecast: every horizon equals the last level
    fn forecast(&self, _periods_ahead: usize) -> Result<f64> {
        self.value()
    }
}

/// Holt's linear trend method
#[derive(Debug, Clone)]
pub struct DoubleExponentialSmoothing {
    alpha: f64,
    beta: f64,
    /// Level and trend, once the first observation is in
    state: Option<(f64, f64)>,
    seen: usize,
}

impl DoubleExponentialSmoothing {
    /// Create a smoother with level weight `alpha` and trend weight `beta`
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        check_unit_interval("Alpha", alpha)?;
        check_unit_interval("Beta", beta)?;

        Ok(Self {
            alpha,
            beta,
            state: None,
            seen: 0,
        })
    }

    fn state(&self) -> Result<(f64, f64)> {
        self.state
            .ok_or_else(|| MathError::InsufficientData("Smoother has no level yet".to_string()))
    }

    /// Get the current level
    pub fn level(&self) -> Result<f64> {
        self.state().map(|(level, _)| level)
    }

    /// Get the current trend
    pub fn trend(&self) -> Result<f64> {
        self.state().map(|(_, trend)| trend)
    }
}

impl IncrementalForecaster for DoubleExponentialSmoothing {
    fn update(&mut self, value: f64) -> Result<()> {
        self.seen += 1;
        self.state = Some(match self.state {
            None => (value, 0.0),
            Some((level, trend)) => {
                let next_level = self.alpha * value + (1.0 - self.alpha) * (level + trend);
                let next_trend = self.beta * (next_level - level) + (1.0 - self.beta) * trend;
                (next_level, next_trend)
            }
        });
        Ok(())
    }

    /// Needs a second observation before the trend means anything
    fn is_ready(&self) -> bool {
        self.seen >= 2
    }

    fn forecast(&self, periods_ahead: usize) -> Result<f64> {
        let (level, trend) = self.state()?;
        Ok(level + periods_ahead as f64 * trend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn least_squares_exact_line() {
        let values = [1.0, 3.0, 5.0, 7.0];
        let (slope, intercept) = least_squares(values.iter()).unwrap();
        assert_relative_eq!(slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(intercept, 1.0, epsilon = 1e-12);
        assert!(least_squares([1.0].iter()).is_none());
    }

    #[test]
    fn trend_extends_line() {
        let mut trend = LinearRegression::new(3).unwrap();
        trend.update_all(&[10.0, 20.0, 30.0]).unwrap();

        assert_relative_eq!(trend.slope().unwrap(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(trend.forecast(1).unwrap(), 40.0, epsilon = 1e-9);
        assert_eq!(trend.forecast_path(2).unwrap().len(), 2);
        assert_relative_eq!(trend.forecast(2).unwrap(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn trend_rolls_window() {
        let mut trend = LinearRegression::new(2).unwrap();
        trend.update_all(&[100.0, 1.0, 2.0]).unwrap();
        // only [1, 2] remain in the window
        assert_relative_eq!(trend.forecast(1).unwrap(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn smoothing_moves_toward_new_values() {
        let mut es = ExponentialSmoothing::new(0.3).unwrap();
        assert!(!es.is_ready());

        es.update(10.0).unwrap();
        assert_relative_eq!(es.value().unwrap(), 10.0);

        es.update(20.0).unwrap(); // 10 + 0.3 * (20 - 10)
        assert_relative_eq!(es.value().unwrap(), 13.0, epsilon = 1e-12);

        let path = es.forecast_path(3).unwrap();
        assert!(path.iter().all(|v| (v - 13.0).abs() < 1e-12));
    }

    #[test]
    fn holt_follows_trend() {
        let mut holt = DoubleExponentialSmoothing::new(0.4, 0.3).unwrap();
        holt.update(10.0).unwrap();
        assert!(!holt.is_ready());
        holt.update_all(&[20.0, 30.0]).unwrap();

        let level = holt.level().unwrap();
        assert!(level > 20.0);
        assert!(holt.trend().unwrap() > 0.0);
        assert!(holt.forecast(2).unwrap() > level);
    }

    #[test]
    fn parameters_are_validated() {
        assert!(ExponentialSmoothing::new(1.5).is_err());
        assert!(ExponentialSmoothing::new(0.0).is_err());
        assert!(DoubleExponentialSmoothing::new(0.5, 1.0).is_err());
        assert!(LinearRegression::new(1).is_err());
    }
}
