use std::collections::HashMap;

use csv::{ByteRecord, ReaderBuilder};

use super::infer::is_missing_marker;
use super::{Cell, Column, Table, TableError};

const BOM: char = '\u{feff}';

/// Parse comma-delimited bytes with a header row into a [`Table`].
///
/// Short rows are padded with [`Cell::Missing`]; rows wider than the header
/// are rejected.
pub fn parse_table(bytes: &[u8]) -> Result<Table, TableError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.byte_records();
    let header = match records.next() {
        Some(record) => record?,
        None => return Err(TableError::NoColumns),
    };
    let names = header_names(&header)?;
    if names.is_empty() {
        return Err(TableError::NoColumns);
    }
    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|name| Column {
            name,
            cells: Vec::new(),
        })
        .collect();
    for record in records {
        let record = record?;
        push_row(&mut columns, &record)?;
    }
    Ok(Table { columns })
}

fn header_names(record: &ByteRecord) -> Result<Vec<String>, TableError> {
    let line = record_line(record);
    let mut raw = Vec::with_capacity(record.len());
    for (idx, field) in record.iter().enumerate() {
        let text = decode_field(field, line)?;
        let text = if idx == 0 {
            text.trim_start_matches(BOM)
        } else {
            text
        };
        if text.is_empty() {
            raw.push(format!("Unnamed: {idx}"));
        } else {
            raw.push(text.to_string());
        }
    }
    Ok(dedupe_names(raw))
}

/// Rename repeated header names to `name.1`, `name.2`, ... in order of appearance.
fn dedupe_names(raw: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(raw.len());
    for mut name in raw {
        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            name = format!("{name}.{count}");
            count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), count + 1);
        names.push(name);
    }
    names
}

fn push_row(columns: &mut [Column], record: &ByteRecord) -> Result<(), TableError> {
    let line = record_line(record);
    if record.len() > columns.len() {
        return Err(TableError::RaggedRow {
            line,
            expected: columns.len(),
            found: record.len(),
        });
    }
    for (idx, column) in columns.iter_mut().enumerate() {
        let cell = match record.get(idx) {
            Some(field) => to_cell(decode_field(field, line)?),
            None => Cell::Missing,
        };
        column.cells.push(cell);
    }
    Ok(())
}

fn to_cell(text: &str) -> Cell {
    if is_missing_marker(text) {
        Cell::Missing
    } else {
        Cell::Text(text.to_string())
    }
}

fn decode_field(field: &[u8], line: u64) -> Result<&str, TableError> {
    std::str::from_utf8(field).map_err(|_| TableError::InvalidUtf8 { line })
}

fn record_line(record: &ByteRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or(0)
}
