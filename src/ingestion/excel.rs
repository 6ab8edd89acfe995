#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{LoadError, LoadResult};
use crate::types::{Schema, Table, Value};

/// Load an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into an in-memory [`Table`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Reads remaining rows; numbers become `Number`, dates `DateTime`, empty cells `Missing`
pub fn load_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> LoadResult<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| LoadError::Malformed {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    load_sheet_range(&range).map_err(|e| match e {
        LoadError::Malformed { message } => LoadError::Malformed {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    })
}

fn load_sheet_range(range: &calamine::Range<Data>) -> LoadResult<Table> {
    let (header_row_idx, header_cells) = range
        .rows()
        .enumerate()
        .find(|(_, row)| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(idx0, row)| (idx0, row.iter().map(cell_to_header_string).collect::<Vec<_>>()))
        .ok_or_else(|| LoadError::Malformed {
            message: "sheet has no non-empty rows (no header row found)".to_string(),
        })?;

    let width = header_cells.len();
    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row in range.rows().skip(header_row_idx + 1) {
        let out_row: Vec<Value> = (0..width)
            .map(|idx| convert_cell(row.get(idx).unwrap_or(&Data::Empty)))
            .collect();
        rows.push(out_row);
    }

    Ok(Table::new(Schema::from_names(header_cells), rows))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Missing,
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::DateTime(dt) => dt.as_datetime().map_or(Value::Missing, Value::DateTime),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Missing
            } else {
                Value::Text(trimmed.to_string())
            }
        }
        Data::Error(_) => Value::Missing,
        other => Value::Text(other.to_string()),
    }
}
