//! # Forecast Fill
//!
//! Completes the trailing "to be forecast" entries of spreadsheet series.
//!
//! ## Features
//!
//! - Horizon detection from a placeholder marker (`Forecast` by default)
//! - Reference matching by quantile-profile cosine distance or Pearson correlation
//! - Lookup of a stored pipeline for the matched reference
//! - Fit, time-boxed tuning and prediction on the known prefix, spliced back in place
//! - CSV result tables, SVG plots and a JSON run report
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_fill::{Orchestrator, RunConfig};
//!
//! let config = RunConfig::default();
//! let report = Orchestrator::from_config(config)?.run()?;
//! println!("{} workbooks completed", report.completed_workbooks());
//! # Ok::<(), forecast_fill::FillError>(())
//! ```
//!
//! The steps are also usable on their own:
//!
//! ```
//! use std::sync::Arc;
//! use forecast_fill::data::Cell;
//! use forecast_fill::library::ReferenceLibrary;
//! use forecast_fill::matching::CorrelationMatcher;
//!
//! let library = Arc::new(ReferenceLibrary::new(vec![
//!     ("A", vec![3.0, 1.0, 2.0]),
//!     ("B", vec![1.0, 2.0, 3.0]),
//! ])?);
//! let cells = vec![Cell::Value(10.0), Cell::Value(20.0), Cell::Placeholder];
//! let matched = CorrelationMatcher::new(library)?.best_match(&cells)?;
//! assert_eq!(matched.reference, "B");
//! # Ok::<(), forecast_fill::FillError>(())
//! ```

pub mod artifacts;
pub mod assembler;
pub mod config;
pub mod data;
pub mod error;
pub mod horizon;
pub mod library;
pub mod matching;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod plot;
pub mod profile;
pub mod report;

// Re-export commonly used types
pub use crate::artifacts::ArtifactIndex;
pub use crate::config::RunConfig;
pub use crate::data::{Cell, Column, DataLoader, Table, Workbook};
pub use crate::error::{FillError, Result};
pub use crate::library::ReferenceLibrary;
pub use crate::matching::{MatchStrategy, Matcher};
pub use crate::models::{ForecastModel, ForecastResult, Pipeline, TrainedForecastModel};
pub use crate::orchestrator::Orchestrator;
pub use crate::report::RunReport;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
