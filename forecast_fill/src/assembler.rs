//! Collecting completed columns into per-test result tables

use crate::data::{Column, DataLoader, Table};
use crate::error::Result;
use crate::matching::MatchStrategy;
use crate::report::RunReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the run report written next to the result tables
pub const REPORT_FILE: &str = "run_report.json";

/// Writes result tables under `<results_root>/<strategy>/`
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    output_dir: PathBuf,
    sentinel: String,
}

impl ResultAssembler {
    /// Create an assembler for one strategy
    pub fn new<P: AsRef<Path>>(results_root: P, strategy: MatchStrategy, sentinel: &str) -> Self {
        Self {
            output_dir: results_root.as_ref().join(strategy.as_str()),
            sentinel: sentinel.to_string(),
        }
    }

    /// Directory the tables are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output path for a test
    pub fn output_path(&self, test_id: u64) -> PathBuf {
        self.output_dir.join(format!("Test_output_{}.csv", test_id))
    }

    /// Combine columns, in input order, into one table
    pub fn assemble(&self, columns: Vec<Column>) -> Result<Table> {
        Table::from_columns(columns)
    }

    /// Write the table for a test, replacing any earlier output
    pub fn save(&self, test_id: u64, table: &Table) -> Result<PathBuf> {
        let path = self.output_path(test_id);
        DataLoader::write_csv(table, &path, &self.sentinel)?;
        info!(path = %path.display(), columns = table.width(), "wrote result table");
        Ok(path)
    }

    /// Write the run report as JSON
    pub fn write_report(&self, report: &RunReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(REPORT_FILE);
        fs::write(&path, serde_json::to_string_pretty(report)?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Cell;
    use tempfile::tempdir;

    #[test]
    fn writes_under_strategy_directory() {
        let dir = tempdir().unwrap();
        let assembler = ResultAssembler::new(dir.path(), MatchStrategy::Correlation, "Forecast");
        assert_eq!(assembler.output_dir(), dir.path().join("correlation"));

        let table = assembler
            .assemble(vec![
                Column::from_values("A", &[1.0, 2.0]),
                Column::new("B", vec![Cell::Value(3.0), Cell::Placeholder]),
            ])
            .unwrap();
        let path = assembler.save(7, &table).unwrap();

        assert_eq!(path, dir.path().join("correlation").join("Test_output_7.csv"));
        let reloaded = DataLoader::from_csv(&path, "Forecast").unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn rejects_uneven_columns() {
        let assembler = ResultAssembler::new("unused", MatchStrategy::Quantile, "Forecast");
        let result = assembler.assemble(vec![
            Column::from_values("A", &[1.0, 2.0]),
            Column::from_values("B", &[1.0]),
        ]);
        assert!(result.is_err());
    }
}
