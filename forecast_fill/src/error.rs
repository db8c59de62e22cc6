//! Error types for the forecast_fill crate

use polars::prelude::PolarsError;
use series_math::MathError;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the forecast_fill crate
#[derive(Debug, Error)]
pub enum FillError {
    /// A series is too short or malformed for the requested operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The reference library has no series to match against
    #[error("Reference library is empty")]
    EmptyLibrary,

    /// Too few aligned points remain to correlate against the library
    #[error("Insufficient overlap: {aligned} aligned point(s), need at least 2")]
    InsufficientOverlap { aligned: usize },

    /// No stored pipeline matches a reference identifier
    #[error("No artifact found for reference '{identifier}': {reason}")]
    ArtifactNotFound { identifier: String, reason: String },

    /// A stored pipeline directory holds more than one serialized file
    #[error("Artifact directory {dir} holds {count} serialized pipelines, expected exactly one")]
    AmbiguousArtifact { dir: PathBuf, count: usize },

    /// The requested sheet is missing from a workbook
    #[error("Workbook '{workbook}' has no '{sheet}' sheet")]
    UnreadableSheet { workbook: String, sheet: String },

    /// Error raised by a forecasting pipeline
    #[error("Forecasting engine error: {0}")]
    Engine(String),

    /// Error in the run configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from numeric primitives
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from (de)serializing pipelines, configs or reports
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),
}

impl FillError {
    /// Short, stable label for diagnostics and run reports
    pub fn kind(&self) -> &'static str {
        match self {
            FillError::InvalidInput(_) => "invalid_input",
            FillError::EmptyLibrary => "empty_library",
            FillError::InsufficientOverlap { .. } => "insufficient_overlap",
            FillError::ArtifactNotFound { .. } => "artifact_not_found",
            FillError::AmbiguousArtifact { .. } => "ambiguous_artifact",
            FillError::UnreadableSheet { .. } => "unreadable_sheet",
            FillError::Engine(_) => "engine",
            FillError::Config(_) => "config",
            FillError::Math(_) => "math",
            FillError::Io(_) => "io",
            FillError::Json(_) => "json",
            FillError::Polars(_) => "polars",
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, FillError>;

impl From<PolarsError> for FillError {
    fn from(err: PolarsError) -> Self {
        FillError::Polars(err.to_string())
    }
}
