//! Quantile profiles of series
//!
//! A profile splits a series into contiguous windows and records a few
//! quantiles of each one. Values are laid out level-major: all windows
//! for the first level, then all windows for the next, so two profiles
//! built with the same profiler compare position by position.

use crate::error::{FillError, Result};
use series_math::quantiles::{quantile, split_windows};

/// Default number of windows per series
pub const DEFAULT_WINDOWS: usize = 6;

/// Default quantile levels
pub const DEFAULT_LEVELS: [f64; 3] = [0.25, 0.5, 0.75];

/// Fixed-length quantile summary of a series
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileVector(Vec<f64>);

impl ProfileVector {
    /// Get the profile values
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of values in the profile
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the profile is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reduces series to profile vectors
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileProfiler {
    windows: usize,
    levels: Vec<f64>,
}

impl Default for QuantileProfiler {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS,
            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

impl QuantileProfiler {
    /// Create a profiler with a custom window count and quantile levels
    pub fn new(windows: usize, levels: Vec<f64>) -> Result<Self> {
        if windows == 0 {
            return Err(FillError::InvalidInput(
                "Profiler needs at least one window".to_string(),
            ));
        }
        if levels.is_empty() {
            return Err(FillError::InvalidInput(
                "Profiler needs at least one quantile level".to_string(),
            ));
        }
        if let Some(level) = levels.iter().find(|l| !(0.0..=1.0).contains(*l)) {
            return Err(FillError::InvalidInput(format!(
                "Quantile level {} is outside [0, 1]",
                level
            )));
        }

        Ok(Self { windows, levels })
    }

    /// Get the window count
    pub fn windows(&self) -> usize {
        self.windows
    }

    /// Get the quantile levels
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Length of every profile this profiler produces
    pub fn output_len(&self) -> usize {
        self.windows * self.levels.len()
    }

    /// Profile a series; it must hold at least one value per window
    pub fn profile(&self, values: &[f64]) -> Result<ProfileVector> {
        let parts = split_windows(values, self.windows).map_err(|e| {
            FillError::InvalidInput(format!("Cannot profile series of length {}: {}", values.len(), e))
        })?;

        let mut profile = Vec::with_capacity(self.output_len());
        for &level in &self.levels {
            for part in &parts {
                profile.push(quantile(part, level)?);
            }
        }

        Ok(ProfileVector(profile))
    }
}
