//! Per-run record of what happened to every workbook and column

use crate::error::FillError;
use crate::matching::MatchStrategy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ColumnOutcome {
    /// Nothing to forecast; emitted unchanged
    PassThrough,
    /// Forecast spliced into the trailing entries
    Completed {
        reference: String,
        artifact: String,
        model: String,
        horizon: usize,
    },
    /// Processing aborted; the column is emitted unchanged
    Failed { kind: String, message: String },
}

/// Report for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub column: String,
    #[serde(flatten)]
    pub outcome: ColumnOutcome,
}

impl ColumnReport {
    /// Report a column failure
    pub fn failed(column: &str, error: &FillError) -> Self {
        Self {
            column: column.to_string(),
            outcome: ColumnOutcome::Failed {
                kind: error.kind().to_string(),
                message: error.to_string(),
            },
        }
    }
}

/// Outcome of one workbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkbookOutcome {
    /// Result table written
    Completed { output: PathBuf },
    /// Workbook not processed
    Skipped { kind: String, reason: String },
}

/// Report for one workbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookReport {
    pub workbook: String,
    pub test_id: Option<u64>,
    #[serde(flatten)]
    pub outcome: WorkbookOutcome,
    pub columns: Vec<ColumnReport>,
}

impl WorkbookReport {
    /// Report a workbook that could not be processed
    pub fn skipped(workbook: &str, error: &FillError) -> Self {
        Self {
            workbook: workbook.to_string(),
            test_id: None,
            outcome: WorkbookOutcome::Skipped {
                kind: error.kind().to_string(),
                reason: error.to_string(),
            },
            columns: Vec::new(),
        }
    }

    /// Number of columns that failed
    pub fn failed_columns(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| matches!(c.outcome, ColumnOutcome::Failed { .. }))
            .count()
    }
}

/// Report for a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub strategy: MatchStrategy,
    pub workbooks: Vec<WorkbookReport>,
}

impl RunReport {
    /// Start an empty report
    pub fn new(strategy: MatchStrategy) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            strategy,
            workbooks: Vec::new(),
        }
    }

    /// Number of workbooks with a written result table
    pub fn completed_workbooks(&self) -> usize {
        self.workbooks
            .iter()
            .filter(|w| matches!(w.outcome, WorkbookOutcome::Completed { .. }))
            .count()
    }

    /// Number of skipped workbooks
    pub fn skipped_workbooks(&self) -> usize {
        self.workbooks.len() - self.completed_workbooks()
    }

    /// Number of failed columns across all workbooks
    pub fn failed_columns(&self) -> usize {
        self.workbooks.iter().map(WorkbookReport::failed_columns).sum()
    }
}
