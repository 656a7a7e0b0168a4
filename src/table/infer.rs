use super::{Column, Table};

/// Tokens that denote a missing value, in addition to the empty string.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// Typed descriptor for one column, produced before any numeric work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
}

pub fn is_missing_marker(text: &str) -> bool {
    text.is_empty() || MISSING_MARKERS.contains(&text)
}

/// Parse a non-missing cell as a number.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Classify every column of `table` in header order.
pub fn infer_profiles(table: &Table) -> Vec<ColumnProfile> {
    table
        .columns
        .iter()
        .map(|column| ColumnProfile {
            name: column.name.clone(),
            kind: infer_kind(column),
        })
        .collect()
}

fn infer_kind(column: &Column) -> ColumnKind {
    // A header-only column carries no values to classify.
    if column.cells.is_empty() {
        return ColumnKind::Text;
    }
    let all_numeric = column
        .cells
        .iter()
        .filter_map(|cell| cell.as_text())
        .all(|text| parse_number(text).is_some());
    if all_numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}
