//! Parquet loading.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate};
use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::LoadResult;
use crate::types::{Schema, Table, Value};

/// Load a Parquet file into an in-memory [`Table`].
///
/// Notes:
/// - Columns are the file's top-level fields, in schema order
/// - Uses the Parquet record API (`RowIter`)
/// - Nested groups/lists/maps are kept as their text rendering
pub fn load_parquet_from_path(path: impl AsRef<Path>) -> LoadResult<Table> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;
    let names = top_level_field_names(&reader);

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row_res in reader.into_iter() {
        let row = row_res?;

        let map: HashMap<&str, &Field> = row
            .get_column_iter()
            .map(|(name, field)| (name.as_str(), field))
            .collect();

        let out_row = names
            .iter()
            .map(|name| map.get(name.as_str()).map_or(Value::Missing, |f| convert_parquet_field(f)))
            .collect();
        rows.push(out_row);
    }

    Ok(Table::new(Schema::from_names(names), rows))
}

fn top_level_field_names<R: ChunkReader + 'static>(reader: &SerializedFileReader<R>) -> Vec<String> {
    reader
        .metadata()
        .file_metadata()
        .schema()
        .get_fields()
        .iter()
        .map(|t| t.name().to_string())
        .collect()
}

fn convert_parquet_field(f: &Field) -> Value {
    match f {
        Field::Null => Value::Missing,
        Field::Byte(v) => Value::Number(f64::from(*v)),
        Field::Short(v) => Value::Number(f64::from(*v)),
        Field::Int(v) => Value::Number(f64::from(*v)),
        Field::Long(v) => Value::Number(*v as f64),
        Field::UByte(v) => Value::Number(f64::from(*v)),
        Field::UShort(v) => Value::Number(f64::from(*v)),
        Field::UInt(v) => Value::Number(f64::from(*v)),
        Field::ULong(v) => Value::Number(*v as f64),
        Field::Float(v) => Value::Number(f64::from(*v)),
        Field::Double(v) => Value::Number(*v),
        Field::Str(s) if s.trim().is_empty() => Value::Missing,
        Field::Str(s) => Value::Text(s.trim().to_string()),
        Field::Date(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(i64::from(*days))))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map_or(Value::Missing, Value::DateTime),
        Field::TimestampMillis(ms) => DateTime::from_timestamp_millis(*ms)
            .map_or(Value::Missing, |dt| Value::DateTime(dt.naive_utc())),
        Field::TimestampMicros(us) => DateTime::from_timestamp_micros(*us)
            .map_or(Value::Missing, |dt| Value::DateTime(dt.naive_utc())),
        other => Value::Text(other.to_string()),
    }
}
