//! Per-workbook, per-column completion flow
//!
//! Each column of the configured sheet goes through
//! detect -> match -> resolve -> fit and tune -> predict -> splice.
//! Failures are scoped: a failing column is emitted unchanged and reported,
//! a failing workbook is skipped and reported, and the run carries on.

use crate::artifacts::ArtifactIndex;
use crate::assembler::ResultAssembler;
use crate::config::RunConfig;
use crate::data::{Cell, Column, Workbook};
use crate::error::{FillError, Result};
use crate::horizon::{horizon, known_values};
use crate::library::ReferenceLibrary;
use crate::matching::Matcher;
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::plot::{PlotRequest, SvgPlotter, Visualizer};
use crate::report::{
    ColumnOutcome, ColumnReport, RunReport, WorkbookOutcome, WorkbookReport,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Overwrite the trailing placeholder run of `cells` with `forecast`.
///
/// The known prefix is copied unchanged. With no placeholders and an empty
/// forecast the cells are returned as they are.
pub fn splice(cells: &[Cell], forecast: &[f64]) -> Result<Vec<Cell>> {
    let horizon = horizon(cells);
    if forecast.len() != horizon {
        return Err(FillError::InvalidInput(format!(
            "Forecast has {} values for a horizon of {}",
            forecast.len(),
            horizon
        )));
    }

    let known = cells.len() - horizon;
    Ok(cells[..known]
        .iter()
        .cloned()
        .chain(forecast.iter().copied().map(Cell::Value))
        .collect())
}

/// A column after processing
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedColumn {
    /// The column to emit
    pub column: Column,
    /// What happened to it
    pub outcome: ColumnOutcome,
    /// Values spliced into the trailing entries; empty on pass-through
    pub forecast: Vec<f64>,
}

/// Drives a completion run over every input workbook
#[derive(Debug)]
pub struct Orchestrator {
    config: RunConfig,
    matcher: Matcher,
    artifacts: ArtifactIndex,
    assembler: ResultAssembler,
    visualizer: Option<Box<dyn Visualizer>>,
}

impl Orchestrator {
    /// Create an orchestrator from already loaded collaborators.
    ///
    /// Plots go to `<plots_root>/<strategy>` when enabled in the config.
    pub fn new(
        config: RunConfig,
        library: Arc<ReferenceLibrary>,
        artifacts: ArtifactIndex,
    ) -> Result<Self> {
        config.validate()?;

        let matcher = Matcher::new(config.strategy, library, config.profiler()?)?;
        let assembler =
            ResultAssembler::new(config.results_root(), config.strategy, &config.sentinel);
        let visualizer: Option<Box<dyn Visualizer>> = if config.plots {
            Some(Box::new(SvgPlotter::new(
                config.plots_root.join(config.strategy.as_str()),
            )))
        } else {
            None
        };

        Ok(Self {
            config,
            matcher,
            artifacts,
            assembler,
            visualizer,
        })
    }

    /// Load the reference library and index the artifacts named by `config`
    pub fn from_config(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let library = ReferenceLibrary::from_csv(config.reference_path(), &config.sentinel)?;
        let artifacts = ArtifactIndex::scan(&config.artifacts_root)?;
        Self::new(config, Arc::new(library), artifacts)
    }

    /// Replace the visualizer; `None` disables plotting
    pub fn with_visualizer(mut self, visualizer: Option<Box<dyn Visualizer>>) -> Self {
        self.visualizer = visualizer;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Get the result assembler
    pub fn assembler(&self) -> &ResultAssembler {
        &self.assembler
    }

    /// Process every input workbook under the data root and write the run report
    pub fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::new(self.matcher.strategy());
        let workbooks = Workbook::discover(&self.config.data_root, &self.config.input_marker)?;
        info!(
            data_root = %self.config.data_root.display(),
            workbooks = workbooks.len(),
            strategy = %self.matcher.strategy(),
            "starting run"
        );

        for workbook in &workbooks {
            match self.process_workbook(workbook) {
                Ok(workbook_report) => report.workbooks.push(workbook_report),
                Err(e) => {
                    warn!(
                        workbook = workbook.name(),
                        kind = e.kind(),
                        error = %e,
                        "skipping workbook"
                    );
                    report.workbooks.push(WorkbookReport::skipped(workbook.name(), &e));
                }
            }
        }

        report.finished_at = Some(Utc::now());
        let path = self.assembler.write_report(&report)?;
        info!(
            completed = report.completed_workbooks(),
            skipped = report.skipped_workbooks(),
            failed_columns = report.failed_columns(),
            report = %path.display(),
            "run finished"
        );

        Ok(report)
    }

    /// Complete every series column of one workbook and write its result table
    #[tracing::instrument(skip_all, fields(workbook = workbook.name()))]
    pub fn process_workbook(&self, workbook: &Workbook) -> Result<WorkbookReport> {
        let table = workbook.read_sheet(&self.config.sheet, &self.config.sentinel)?;
        let test_id = workbook.test_id(&self.config.test_id_prefix)?;

        let mut columns = Vec::with_capacity(table.width());
        let mut reports = Vec::with_capacity(table.width());
        let mut plots = Vec::new();

        for column in table.columns() {
            if column.is_index() {
                debug!(column = column.name(), "skipping index column");
                continue;
            }

            match self.complete_column(column) {
                Ok(done) => {
                    if !done.forecast.is_empty() {
                        plots.push((done.column.clone(), done.forecast.clone()));
                    }
                    reports.push(ColumnReport {
                        column: column.name().to_string(),
                        outcome: done.outcome,
                    });
                    columns.push(done.column);
                }
                Err(e) => {
                    warn!(column = column.name(), kind = e.kind(), error = %e, "column failed");
                    reports.push(ColumnReport::failed(column.name(), &e));
                    columns.push(column.clone());
                }
            }
        }

        let table = self.assembler.assemble(columns)?;
        let output = self.assembler.save(test_id, &table)?;

        for (column, forecast) in &plots {
            self.emit_plot(test_id, column, forecast);
        }

        Ok(WorkbookReport {
            workbook: workbook.name().to_string(),
            test_id: Some(test_id),
            outcome: WorkbookOutcome::Completed { output },
            columns: reports,
        })
    }

    /// Run one column through the completion flow
    #[tracing::instrument(skip_all, fields(column = column.name()))]
    pub fn complete_column(&self, column: &Column) -> Result<CompletedColumn> {
        let horizon = horizon(column.cells());
        if horizon == 0 {
            debug!("no placeholders, passing through");
            return Ok(CompletedColumn {
                column: column.clone(),
                outcome: ColumnOutcome::PassThrough,
                forecast: Vec::new(),
            });
        }

        let matched = self.matcher.best_match(column.cells())?;
        debug!(reference = %matched.reference, score = matched.score, "matched reference");

        let (location, pipeline) = self.artifacts.load(&matched.reference)?;

        let known = known_values(column.cells())?;
        let trained = pipeline.fit(&known)?.fine_tune(
            self.config.loss,
            &known,
            self.config.tune_budget()?,
        )?;
        let forecast = trained.predict(&known, horizon)?.into_values();

        let cells = splice(column.cells(), &forecast)?;
        info!(
            reference = %matched.reference,
            artifact = %location.dir_name,
            model = trained.name(),
            horizon,
            "completed column"
        );

        Ok(CompletedColumn {
            column: Column::new(column.name(), cells),
            outcome: ColumnOutcome::Completed {
                reference: matched.reference,
                artifact: location.dir_name,
                model: trained.name().to_string(),
                horizon,
            },
            forecast,
        })
    }

    fn emit_plot(&self, test_id: u64, column: &Column, forecast: &[f64]) {
        let Some(visualizer) = &self.visualizer else {
            return;
        };
        let Some(series) = column.all_values() else {
            debug!(column = column.name(), "column has non-numeric cells, not plotted");
            return;
        };

        let request = PlotRequest {
            test_id,
            column: column.name(),
            series: &series,
            forecast,
            horizon: forecast.len(),
        };
        match visualizer.render(&request) {
            Ok(path) => debug!(path = %path.display(), "wrote plot"),
            Err(e) => warn!(column = column.name(), error = %e, "plot failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_replaces_only_the_trailing_run() {
        let cells = vec![Cell::Value(1.0), Cell::Value(2.0), Cell::Placeholder, Cell::Placeholder];
        let spliced = splice(&cells, &[3.0, 4.0]).unwrap();
        assert_eq!(
            spliced,
            vec![Cell::Value(1.0), Cell::Value(2.0), Cell::Value(3.0), Cell::Value(4.0)]
        );
    }

    #[test]
    fn splice_rejects_wrong_length() {
        let cells = vec![Cell::Value(1.0), Cell::Placeholder];
        assert!(matches!(splice(&cells, &[]), Err(FillError::InvalidInput(_))));
    }
}
