//! Run configuration
//!
//! Defaults mirror the expected on-disk layout: workbooks and the
//! `Train.csv` reference table under the data root, pipelines under
//! `pipelines/`, plots under `visualizations/`.

use crate::data::DEFAULT_SENTINEL;
use crate::error::{FillError, Result};
use crate::matching::MatchStrategy;
use crate::metrics::Loss;
use crate::profile::{QuantileProfiler, DEFAULT_LEVELS, DEFAULT_WINDOWS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for one completion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Similarity strategy used for every series
    pub strategy: MatchStrategy,
    /// Directory scanned for input workbooks
    pub data_root: PathBuf,
    /// Reference table; defaults to `<data_root>/Train.csv`
    pub reference_path: Option<PathBuf>,
    /// Directory of stored pipelines
    pub artifacts_root: PathBuf,
    /// Output tables root; defaults to `<data_root>/results`
    pub results_root: Option<PathBuf>,
    /// Plot output root
    pub plots_root: PathBuf,
    /// Sheet holding the series to complete
    pub sheet: String,
    /// Substring marking input workbooks
    pub input_marker: String,
    /// Text preceding the test number in workbook names
    pub test_id_prefix: String,
    /// Marker for entries to forecast
    pub sentinel: String,
    /// Profile windows per series
    pub windows: usize,
    /// Profile quantile levels
    pub quantile_levels: Vec<f64>,
    /// Time budget for tuning each pipeline, in seconds
    pub tune_budget_secs: f64,
    /// Loss minimised while tuning
    pub loss: Loss,
    /// Whether to render plots
    pub plots: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::default(),
            data_root: PathBuf::from("data"),
            reference_path: None,
            artifacts_root: PathBuf::from("pipelines"),
            results_root: None,
            plots_root: PathBuf::from("visualizations"),
            sheet: "Monthly".to_string(),
            input_marker: "Test".to_string(),
            test_id_prefix: "Test_example".to_string(),
            sentinel: DEFAULT_SENTINEL.to_string(),
            windows: DEFAULT_WINDOWS,
            quantile_levels: DEFAULT_LEVELS.to_vec(),
            tune_budget_secs: 60.0,
            loss: Loss::Mae,
            plots: true,
        }
    }
}

impl RunConfig {
    /// Read a configuration from a JSON file; absent fields take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
        Ok(config)
    }

    /// Reference table path
    pub fn reference_path(&self) -> PathBuf {
        self.reference_path
            .clone()
            .unwrap_or_else(|| self.data_root.join("Train.csv"))
    }

    /// Output tables root
    pub fn results_root(&self) -> PathBuf {
        self.results_root
            .clone()
            .unwrap_or_else(|| self.data_root.join("results"))
    }

    /// Tuning budget per pipeline
    pub fn tune_budget(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.tune_budget_secs).map_err(|e| {
            FillError::Config(format!(
                "Tuning budget must be a non-negative number of seconds, got {}: {}",
                self.tune_budget_secs, e
            ))
        })
    }

    /// Profiler built from the window and level settings
    pub fn profiler(&self) -> Result<QuantileProfiler> {
        QuantileProfiler::new(self.windows, self.quantile_levels.clone())
            .map_err(|e| FillError::Config(e.to_string()))
    }

    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        self.profiler()?;

        if self.sentinel.trim().is_empty() {
            return Err(FillError::Config("Sentinel must not be empty".to_string()));
        }
        if self.sheet.is_empty() {
            return Err(FillError::Config("Sheet name must not be empty".to_string()));
        }
        self.tune_budget()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RunConfig::default();
        config.validate().unwrap();
        assert_eq!(config.reference_path(), PathBuf::from("data/Train.csv"));
        assert_eq!(config.results_root(), PathBuf::from("data/results"));
        assert_eq!(config.tune_budget().unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{"strategy": "correlation", "windows": 4}"#).unwrap();
        assert_eq!(config.strategy, MatchStrategy::Correlation);
        assert_eq!(config.windows, 4);
        assert_eq!(config.sheet, "Monthly");
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut config = RunConfig {
            windows: 0,
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(FillError::Config(_))));

        config.windows = 6;
        config.quantile_levels = vec![1.5];
        assert!(config.validate().is_err());

        config.quantile_levels = vec![0.5];
        config.sentinel = "  ".to_string();
        assert!(config.validate().is_err());

        config.sentinel = "Forecast".to_string();
        config.tune_budget_secs = -1.0;
        assert!(config.validate().is_err());

        config.tune_budget_secs = 1e20;
        assert!(matches!(config.validate(), Err(FillError::Config(_))));
        assert!(config.tune_budget().is_err());

        config.tune_budget_secs = f64::NAN;
        assert!(config.validate().is_err());
    }
}
