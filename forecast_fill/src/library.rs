//! Reference library of fully-known series
//!
//! Loaded once per run and never mutated afterwards; share it behind an
//! `Arc` between the matcher and the orchestrator.

use crate::data::{DataLoader, Table};
use crate::error::{FillError, Result};
use std::path::Path;
use tracing::{info, warn};

/// A named, fully-known reference series
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSeries {
    name: String,
    values: Vec<f64>,
}

impl ReferenceSeries {
    /// Get the series name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the series values
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Ordered collection of equal-length reference series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceLibrary {
    series: Vec<ReferenceSeries>,
}

impl ReferenceLibrary {
    /// Create a library from named series of equal length
    pub fn new<S: Into<String>>(series: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let series: Vec<ReferenceSeries> = series
            .into_iter()
            .map(|(name, values)| ReferenceSeries {
                name: name.into(),
                values,
            })
            .collect();

        if let Some(first) = series.first() {
            if let Some(odd) = series.iter().find(|s| s.values.len() != first.values.len()) {
                return Err(FillError::InvalidInput(format!(
                    "Reference '{}' has {} points, '{}' has {}",
                    odd.name,
                    odd.values.len(),
                    first.name,
                    first.values.len()
                )));
            }
        }

        Ok(Self { series })
    }

    /// Build a library from the numeric columns of a table.
    ///
    /// Index columns and columns with any non-numeric cell are skipped.
    pub fn from_table(table: &Table) -> Self {
        let series = table
            .columns()
            .iter()
            .filter(|column| !column.is_index())
            .filter_map(|column| match column.all_values() {
                Some(values) => Some(ReferenceSeries {
                    name: column.name().to_string(),
                    values,
                }),
                None => {
                    warn!(column = column.name(), "skipping reference column with non-numeric cells");
                    None
                }
            })
            .collect();

        Self { series }
    }

    /// Load a library from a CSV training table
    pub fn from_csv<P: AsRef<Path>>(path: P, sentinel: &str) -> Result<Self> {
        let path = path.as_ref();
        let table = DataLoader::from_csv(path, sentinel)?;
        let library = Self::from_table(&table);
        info!(
            path = %path.display(),
            series = library.len(),
            height = library.height(),
            "loaded reference library"
        );
        Ok(library)
    }

    /// Number of reference series
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if the library has no series
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of points in every reference series
    pub fn height(&self) -> usize {
        self.series.first().map_or(0, |s| s.values.len())
    }

    /// Iterate over the series in library order
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceSeries> {
        self.series.iter()
    }

    /// Find a series by name
    pub fn get(&self, name: &str) -> Option<&ReferenceSeries> {
        self.series.iter().find(|s| s.name == name)
    }
}
