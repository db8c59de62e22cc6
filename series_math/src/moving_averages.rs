//! Moving average forecaster

use crate::forecasting::IncrementalForecaster;
use crate::{MathError, Result};
use std::collections::VecDeque;

/// Mean of the last `period` observations, carried forward flat
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    window: VecDeque<f64>,
    total: f64,
}

impl SimpleMovingAverage {
    /// Create an average over `period` observations
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Averaging period must be positive".to_string(),
            ));
        }

        Ok(Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            total: 0.0,
        })
    }

    /// Current average, once the window is full
    pub fn value(&self) -> Result<f64> {
        if !self.is_ready() {
            return Err(MathError::InsufficientData(format!(
                "Average over {} observations has only {}",
                self.period,
                self.window.len()
            )));
        }
        Ok(self.total / self.period as f64)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }
}

impl IncrementalForecaster for SimpleMovingAverage {
    fn update(&mut self, value: f64) -> Result<()> {
        self.window.push_back(value);
        self.total += value;
        if self.window.len() > self.period {
            self.total -= self.window.pop_front().unwrap_or(0.0);
        }
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.window.len() == self.period
    }

    fn forecast(&self, _periods_ahead: usize) -> Result<f64> {
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn average_waits_for_full_window() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();
        sma.update_all(&[1.0, 2.0]).unwrap();
        assert!(!sma.is_ready());
        assert!(sma.value().is_err());

        sma.update(3.0).unwrap();
        assert_relative_eq!(sma.value().unwrap(), 2.0, epsilon = 1e-12);

        sma.update(7.0).unwrap(); // window is now [2, 3, 7]
        assert_relative_eq!(sma.forecast(5).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_period_is_rejected() {
        assert!(SimpleMovingAverage::new(0).is_err());
    }
}
