//! Command-line entry point: complete every input workbook under a data root

use clap::Parser;
use forecast_fill::{FillError, MatchStrategy, Orchestrator, RunConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fill the trailing forecast gaps of spreadsheet series
#[derive(Parser, Debug)]
#[command(name = "series-fill", version, about)]
struct Cli {
    /// Directory holding the input workbooks and the reference table
    data_root: Option<PathBuf>,

    /// JSON configuration file, applied before the flags below
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Similarity strategy used to pick reference series
    #[arg(short, long, value_enum)]
    strategy: Option<MatchStrategy>,

    /// Reference table (defaults to <DATA_ROOT>/Train.csv)
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Directory of stored pipelines, one subdirectory per reference
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// Output root for result tables (defaults to <DATA_ROOT>/results)
    #[arg(long)]
    results: Option<PathBuf>,

    /// Output root for plots
    #[arg(long)]
    plots_dir: Option<PathBuf>,

    /// Do not render plots
    #[arg(long)]
    no_plots: bool,

    /// Tuning budget per column, in seconds
    #[arg(long)]
    tune_budget_secs: Option<f64>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<RunConfig, FillError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(data_root) = &self.data_root {
            config.data_root = data_root.clone();
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(reference) = &self.reference {
            config.reference_path = Some(reference.clone());
        }
        if let Some(artifacts) = &self.artifacts {
            config.artifacts_root = artifacts.clone();
        }
        if let Some(results) = &self.results {
            config.results_root = Some(results.clone());
        }
        if let Some(plots_dir) = &self.plots_dir {
            config.plots_root = plots_dir.clone();
        }
        if self.no_plots {
            config.plots = false;
        }
        if let Some(budget) = self.tune_budget_secs {
            config.tune_budget_secs = budget;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "series_fill=debug,forecast_fill=debug"
    } else {
        "series_fill=info,forecast_fill=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let report = match Orchestrator::from_config(config).and_then(|o| o.run()) {
        Ok(report) => report,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "run aborted");
            return ExitCode::FAILURE;
        }
    };

    info!(
        completed = report.completed_workbooks(),
        skipped = report.skipped_workbooks(),
        failed_columns = report.failed_columns(),
        "done"
    );
    ExitCode::SUCCESS
}
