//! Forecast horizon detection
//!
//! The horizon of a series is the number of its entries carrying the
//! placeholder marker. Absence of the marker is not an error: the horizon
//! is simply zero and the series passes through unchanged.

use crate::data::{numeric_values, Cell, Table};
use crate::error::Result;

/// Count the placeholder entries of a series
pub fn horizon(cells: &[Cell]) -> usize {
    cells.iter().filter(|cell| cell.is_placeholder()).count()
}

/// Horizon of every column of a table, in column order
pub fn table_horizons(table: &Table) -> Vec<(String, usize)> {
    table
        .columns()
        .iter()
        .map(|column| (column.name().to_string(), horizon(column.cells())))
        .collect()
}

/// The entries preceding the horizon
pub fn known_prefix(cells: &[Cell]) -> &[Cell] {
    &cells[..cells.len() - horizon(cells)]
}

/// The known prefix as numbers.
///
/// Fails if a placeholder, a missing cell or text sits inside the prefix.
pub fn known_values(cells: &[Cell]) -> Result<Vec<f64>> {
    numeric_values(known_prefix(cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_excludes_trailing_placeholders() {
        let cells = vec![Cell::Value(1.0), Cell::Value(2.0), Cell::Placeholder];
        assert_eq!(known_prefix(&cells), &cells[..2]);
        assert_eq!(known_values(&cells).unwrap(), vec![1.0, 2.0]);
    }
}
