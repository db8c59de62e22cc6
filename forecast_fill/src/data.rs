//! Tabular data handling for series completion
//!
//! Workbooks are stored as one CSV file per sheet, named
//! `<workbook>.<sheet>.csv`. Each column of a sheet is an independent
//! series whose trailing cells may carry a placeholder marker.

use crate::error::{FillError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default marker for entries still to be forecast
pub const DEFAULT_SENTINEL: &str = "Forecast";

/// One entry of a series
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A known numeric value
    Value(f64),
    /// Marker for an entry still to be forecast
    Placeholder,
    /// Empty cell
    Missing,
    /// Any other text, kept verbatim
    Text(String),
}

impl Cell {
    /// Classify a raw spreadsheet entry
    pub fn parse(raw: &str, sentinel: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        if trimmed == sentinel {
            return Cell::Placeholder;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_nan() => Cell::Missing,
            Ok(value) => Cell::Value(value),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    /// The numeric value, if this cell holds one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Value(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether this cell is a forecast placeholder
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Cell::Placeholder)
    }

    fn render(&self, sentinel: &str) -> Option<String> {
        match self {
            Cell::Value(value) => Some(value.to_string()),
            Cell::Placeholder => Some(sentinel.to_string()),
            Cell::Missing => None,
            Cell::Text(text) => Some(text.clone()),
        }
    }
}

/// Convert cells to numbers, failing on the first non-numeric entry
pub fn numeric_values(cells: &[Cell]) -> Result<Vec<f64>> {
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            cell.as_f64().ok_or_else(|| {
                FillError::InvalidInput(format!(
                    "Row {} holds {:?} where a known numeric value is required",
                    row, cell
                ))
            })
        })
        .collect()
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    /// Create a column from its cells
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Create a fully numeric column
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(Cell::Value).collect())
    }

    /// Get the column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Consume the column, returning its cells
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Get the number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the column is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether this is a spreadsheet index column rather than a series
    pub fn is_index(&self) -> bool {
        let name = self.name.trim();
        name.is_empty() || name.starts_with("Unnamed")
    }

    /// All cells as numbers, or `None` if any cell is not a known value
    pub fn all_values(&self) -> Option<Vec<f64>> {
        self.cells.iter().map(Cell::as_f64).collect()
    }

    fn to_series(&self, sentinel: &str) -> Series {
        let numeric = self
            .cells
            .iter()
            .all(|cell| matches!(cell, Cell::Value(_) | Cell::Missing));

        if numeric {
            let values: Vec<Option<f64>> = self.cells.iter().map(Cell::as_f64).collect();
            Series::new(&self.name, values)
        } else {
            let values: Vec<Option<String>> =
                self.cells.iter().map(|cell| cell.render(sentinel)).collect();
            Series::new(&self.name, values)
        }
    }
}

/// An ordered set of equal-height columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from columns of equal height
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            table.push(column)?;
        }
        Ok(table)
    }

    /// Append a column
    pub fn push(&mut self, column: Column) -> Result<()> {
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(FillError::InvalidInput(format!(
                    "Column '{}' has {} rows, table has {}",
                    column.name(),
                    column.len(),
                    first.len()
                )));
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Get the columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Find a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Build a table from a DataFrame, classifying every cell
    pub fn from_dataframe(df: &DataFrame, sentinel: &str) -> Result<Self> {
        let columns = df
            .get_columns()
            .iter()
            .map(|series| Ok(Column::new(series.name(), series_to_cells(series, sentinel)?)))
            .collect::<Result<Vec<_>>>()?;

        Self::from_columns(columns)
    }

    /// Convert to a DataFrame; placeholders are rendered as `sentinel`
    pub fn to_dataframe(&self, sentinel: &str) -> Result<DataFrame> {
        let series = self
            .columns
            .iter()
            .map(|column| column.to_series(sentinel))
            .collect::<Vec<_>>();

        Ok(DataFrame::new(series)?)
    }
}

fn series_to_cells(series: &Series, sentinel: &str) -> Result<Vec<Cell>> {
    let dtype = series.dtype();

    if dtype.is_numeric() {
        let floats = series.cast(&DataType::Float64)?;
        return Ok(floats
            .f64()?
            .into_iter()
            .map(|value| match value {
                Some(v) if !v.is_nan() => Cell::Value(v),
                _ => Cell::Missing,
            })
            .collect());
    }

    let text = match dtype {
        DataType::Utf8 => series.clone(),
        _ => series.cast(&DataType::Utf8)?,
    };

    Ok(text
        .utf8()?
        .into_iter()
        .map(|raw| raw.map_or(Cell::Missing, |raw| Cell::parse(raw, sentinel)))
        .collect())
}

/// Data loader for CSV-backed tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, sentinel: &str) -> Result<Table> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Table::from_dataframe(&df, sentinel)
    }

    /// Write a table to a CSV file, creating parent directories
    pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P, sentinel: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut df = table.to_dataframe(sentinel)?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).has_header(true).finish(&mut df)?;

        Ok(())
    }
}

/// A workbook made of `<name>.<sheet>.csv` files in one directory
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    name: String,
    sheets: BTreeMap<String, PathBuf>,
}

impl Workbook {
    /// Discover workbooks in `root` whose file name contains `marker`.
    ///
    /// The listing is not recursive. Workbooks are returned sorted by name.
    pub fn discover<P: AsRef<Path>>(root: P, marker: &str) -> Result<Vec<Workbook>> {
        let mut workbooks: BTreeMap<String, BTreeMap<String, PathBuf>> = BTreeMap::new();

        for entry in fs::read_dir(root.as_ref())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.contains(marker) {
                continue;
            }
            let Some(stem) = file_name.strip_suffix(".csv") else {
                debug!(file = %file_name, "skipping non-CSV input");
                continue;
            };

            let (name, sheet) = stem.split_once('.').unwrap_or((stem, ""));
            workbooks
                .entry(name.to_string())
                .or_default()
                .insert(sheet.to_string(), entry.path());
        }

        Ok(workbooks
            .into_iter()
            .map(|(name, sheets)| Workbook { name, sheets })
            .collect())
    }

    /// Create a workbook from explicit sheet files
    pub fn new(name: impl Into<String>, sheets: BTreeMap<String, PathBuf>) -> Self {
        Self {
            name: name.into(),
            sheets,
        }
    }

    /// Get the workbook name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the sheets present
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Read one sheet into a table
    pub fn read_sheet(&self, sheet: &str, sentinel: &str) -> Result<Table> {
        let path = self
            .sheets
            .get(sheet)
            .ok_or_else(|| FillError::UnreadableSheet {
                workbook: self.name.clone(),
                sheet: sheet.to_string(),
            })?;

        DataLoader::from_csv(path, sentinel)
    }

    /// Numeric test identifier: the digits directly following `prefix` in the name
    pub fn test_id(&self, prefix: &str) -> Result<u64> {
        let digits: String = self
            .name
            .find(prefix)
            .map(|start| {
                self.name[start + prefix.len()..]
                    .chars()
                    .take_while(char::is_ascii_digit)
                    .collect()
            })
            .unwrap_or_default();

        digits.parse().map_err(|_| {
            FillError::InvalidInput(format!(
                "Workbook name '{}' has no test number after '{}'",
                self.name, prefix
            ))
        })
    }
}
