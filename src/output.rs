//! Cleaned-table CSV export.
//!
//! Next to the CSV a small JSON manifest records each column's type, so a reload can coerce cells
//! back into the types the cleaning run chose instead of guessing them again.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, LoadResult};
use crate::types::{ColumnType, Table};

#[derive(Debug, Serialize, Deserialize)]
struct ColumnTypeEntry {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
}

/// Write `table` as CSV to `path`, replacing any existing file.
///
/// The header is the schema's column order. Cells use [`crate::types::Value`]'s `Display` form, so
/// missing cells become empty fields.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let writer = csv::Writer::from_path(path)?;
    write_table(table, writer)
}

/// Write `table` as CSV to any writer.
pub fn write_csv_to<W: Write>(table: &Table, out: W) -> Result<(), ExportError> {
    write_table(table, csv::Writer::from_writer(out))
}

fn write_table<W: Write>(table: &Table, mut writer: csv::Writer<W>) -> Result<(), ExportError> {
    writer.write_record(table.schema.column_names())?;
    for row in &table.rows {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;
    Ok(())
}

/// Manifest path for a cleaned CSV: `cleaned_output.csv` -> `cleaned_output.types.json`.
pub fn column_types_path(csv_path: &Path) -> PathBuf {
    csv_path.with_extension("types.json")
}

/// Write the typed columns of `table` as a JSON manifest. Untyped columns are left out.
pub fn write_column_types(table: &Table, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let entries: Vec<ColumnTypeEntry> = table
        .schema
        .columns
        .iter()
        .filter_map(|c| {
            c.inferred_type.map(|column_type| ColumnTypeEntry {
                name: c.name.clone(),
                column_type,
            })
        })
        .collect();
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &entries)?;
    out.flush()?;
    Ok(())
}

/// Read a manifest written by [`write_column_types`]. A missing file yields `Ok(None)`.
pub fn read_column_types(path: impl AsRef<Path>) -> LoadResult<Option<Vec<(String, ColumnType)>>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let entries: Vec<ColumnTypeEntry> = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    Ok(Some(
        entries.into_iter().map(|e| (e.name, e.column_type)).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{column_types_path, read_column_types, write_column_types, write_csv_to};
    use crate::types::{Column, ColumnType, Schema, Table, Value};

    #[test]
    fn serializes_each_value_kind() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let t = Table::new(
            Schema::from_names(["product", "price", "order_date", "note"]),
            vec![vec![
                Value::text("pen, blue"),
                Value::Number(2.5),
                Value::DateTime(ts),
                Value::Missing,
            ]],
        );
        let mut buf = Vec::new();
        write_csv_to(&t, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "product,price,order_date,note\n\"pen, blue\",2.5,2024-03-01T08:30:00,\n"
        );
    }

    #[test]
    fn column_type_manifest_skips_untyped_columns() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("cleaned_output.csv");
        let path = column_types_path(&csv_path);
        assert!(path.ends_with("cleaned_output.types.json"));

        let t = Table::new(
            Schema::new(vec![
                Column::typed("product", ColumnType::Text),
                Column::typed("order_date", ColumnType::DateTime),
                Column::new("raw"),
            ]),
            Vec::new(),
        );
        write_column_types(&t, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"datetime\""));
        assert_eq!(
            read_column_types(&path).unwrap(),
            Some(vec![
                ("product".to_string(), ColumnType::Text),
                ("order_date".to_string(), ColumnType::DateTime),
            ])
        );
        assert_eq!(read_column_types(dir.path().join("absent.json")).unwrap(), None);
    }
}
