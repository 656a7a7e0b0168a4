//! In-memory tabular dataset parsed from an uploaded delimited file.
//!
//! Parsing keeps every cell as raw text; numeric interpretation happens in a
//! separate inference pass that produces typed column profiles before any
//! arithmetic touches the data.

mod infer;
mod parse;
mod subset;

use thiserror::Error;

pub use self::infer::{ColumnKind, ColumnProfile, infer_profiles, is_missing_marker};
pub use self::parse::parse_table;
pub use self::subset::{NumericSubset, numeric_subset};

/// A raw cell value as read from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Missing,
    Text(String),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Missing => None,
            Cell::Text(text) => Some(text),
        }
    }
}

/// A named column of raw cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// Ordered sequence of named columns; every column has the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.columns
            .first()
            .map(|column| column.cells.len())
            .unwrap_or(0)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }
}

/// Errors raised while reading an uploaded file into a [`Table`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("No columns to parse from file")]
    NoColumns,
    #[error("Error tokenizing data. Expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("File is not valid UTF-8 text (line {line})")]
    InvalidUtf8 { line: u64 },
    #[error("Failed to read delimited data: {0}")]
    Csv(#[from] csv::Error),
}
