use ndarray::Array2;

use super::infer::parse_number;
use super::{ColumnKind, ColumnProfile, Table};

/// Numeric columns of a table with incomplete rows removed.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSubset {
    /// Numeric column names in header order.
    pub columns: Vec<String>,
    /// Original row index of every retained row, ascending.
    pub rows: Vec<usize>,
    /// Row-major values, `rows.len()` x `columns.len()`.
    pub records: Array2<f64>,
}

impl NumericSubset {
    pub fn n_rows(&self) -> usize {
        self.records.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.records.ncols()
    }
}

/// Restrict `table` to its numeric columns and drop rows with any missing value.
pub fn numeric_subset(table: &Table, profiles: &[ColumnProfile]) -> NumericSubset {
    let numeric: Vec<_> = table
        .columns
        .iter()
        .zip(profiles)
        .filter(|(_, profile)| profile.kind == ColumnKind::Numeric)
        .map(|(column, _)| column)
        .collect();
    let columns: Vec<String> = numeric.iter().map(|column| column.name.clone()).collect();
    let mut rows = Vec::new();
    let mut values = Vec::with_capacity(table.row_count() * numeric.len());
    let mut row_values = Vec::with_capacity(numeric.len());
    for row in 0..table.row_count() {
        row_values.clear();
        for column in &numeric {
            let value = column.cells[row]
                .as_text()
                .and_then(parse_number)
                .filter(|value| !value.is_nan());
            match value {
                Some(value) => row_values.push(value),
                None => break,
            }
        }
        if row_values.len() == numeric.len() {
            rows.push(row);
            values.extend_from_slice(&row_values);
        }
    }
    let records = Array2::from_shape_vec((rows.len(), columns.len()), values)
        .unwrap_or_else(|_| Array2::zeros((0, columns.len())));
    NumericSubset {
        columns,
        rows,
        records,
    }
}
