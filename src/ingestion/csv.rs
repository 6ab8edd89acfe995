//! CSV loading.

use std::path::Path;

use crate::error::LoadResult;
use crate::types::{Schema, Table, Value};

/// Load a CSV file into an in-memory [`Table`].
///
/// Rules:
///
/// - CSV must have a header row; every header becomes a column.
/// - Cells are trimmed; empty cells become [`Value::Missing`], everything else [`Value::Text`].
/// - Short records are padded with `Missing`, extra fields are dropped.
pub fn load_csv_from_path(path: impl AsRef<Path>) -> LoadResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    load_csv_from_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
pub fn load_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> LoadResult<Table> {
    let headers = rdr.headers()?.clone();
    let width = headers.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<Value> = Vec::with_capacity(width);
        for idx in 0..width {
            row.push(raw_cell(record.get(idx).unwrap_or("")));
        }
        rows.push(row);
    }

    Ok(Table::new(Schema::from_names(headers.iter()), rows))
}

fn raw_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Missing
    } else {
        Value::Text(trimmed.to_owned())
    }
}
