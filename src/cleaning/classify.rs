//! Per-column type inference and coercion.
//!
//! A column whose name mentions a date or time is parsed as timestamps. Otherwise, if more than
//! half of its non-missing cells read as numbers, it becomes numeric; anything else is text and is
//! lower-cased. Cells that cannot be coerced to the chosen type become [`Value::Missing`].

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rayon::prelude::*;

use crate::observability::{PipelineContext, PipelineEvent, Stage};
use crate::types::{Column, ColumnType, Table, Value};

use super::{join_columns, split_columns};

/// Substrings of a normalized column name that mark it as a timestamp column.
pub const DATETIME_NAME_MARKERS: [&str; 2] = ["date", "time"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d %b %Y", "%b %d %Y", "%b %d, %Y",
];

/// `true` if `name` indicates a date/time column.
pub fn is_datetime_name(name: &str) -> bool {
    DATETIME_NAME_MARKERS.iter().any(|m| name.contains(m))
}

/// Parse a number; non-finite results (`nan`, `inf`) are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Permissive timestamp parser. Formats are tried in a fixed order, so `01/02/2024` reads
/// day-first.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Decide the type for one column from its name and cells.
///
/// A column with no non-missing cells is numeric; its cells stay missing through imputation.
pub fn infer_column_type(name: &str, values: &[Value]) -> ColumnType {
    if is_datetime_name(name) {
        return ColumnType::DateTime;
    }

    let (present, numeric) = values.iter().fold((0usize, 0usize), |(p, n), v| match v {
        Value::Missing => (p, n),
        Value::Number(x) if x.is_finite() => (p + 1, n + 1),
        Value::Text(s) if parse_number(s).is_some() => (p + 1, n + 1),
        _ => (p + 1, n),
    });

    if present == 0 || numeric * 2 > present {
        ColumnType::Numeric
    } else {
        ColumnType::Text
    }
}

/// Convert one cell to `column_type`; unconvertible cells become [`Value::Missing`].
pub fn coerce_value(value: Value, column_type: ColumnType) -> Value {
    match (column_type, value) {
        (_, Value::Missing) => Value::Missing,

        (ColumnType::Numeric, Value::Number(x)) if x.is_finite() => Value::Number(x),
        (ColumnType::Numeric, Value::Text(s)) => parse_number(&s).map_or(Value::Missing, Value::Number),
        (ColumnType::Numeric, _) => Value::Missing,

        (ColumnType::DateTime, Value::DateTime(dt)) => Value::DateTime(dt),
        (ColumnType::DateTime, Value::Text(s)) => parse_datetime(&s).map_or(Value::Missing, Value::DateTime),
        (ColumnType::DateTime, Value::Number(_)) => Value::Missing,

        (ColumnType::Text, Value::Text(s)) => Value::Text(s.to_lowercase()),
        (ColumnType::Text, other) => Value::Text(other.to_string().to_lowercase()),
    }
}

/// Infer a type for `values` and coerce every cell to it.
pub fn classify_column(name: &str, values: Vec<Value>) -> (ColumnType, Vec<Value>) {
    let column_type = infer_column_type(name, &values);
    let coerced = values.into_iter().map(|v| coerce_value(v, column_type)).collect();
    (column_type, coerced)
}

/// Classify every column of `table` in place.
///
/// Columns are independent, so they are processed on rayon's pool; results are applied in column
/// order.
pub fn classify_columns(table: &mut Table, ctx: &PipelineContext) {
    classify_columns_with(table, &[], ctx);
}

/// Like [`classify_columns`], but columns named in `known` are coerced to the listed type without
/// inference.
pub fn classify_columns_with(table: &mut Table, known: &[(String, ColumnType)], ctx: &PipelineContext) {
    let known: HashMap<&str, ColumnType> = known.iter().map(|(n, t)| (n.as_str(), *t)).collect();
    let names: Vec<String> = table.schema.column_names().map(str::to_owned).collect();
    let columns = split_columns(table);

    let classified: Vec<(ColumnType, Vec<Value>)> = names
        .par_iter()
        .zip(columns.into_par_iter())
        .map(|(name, values)| match known.get(name.as_str()) {
            Some(&column_type) => (
                column_type,
                values.into_iter().map(|v| coerce_value(v, column_type)).collect(),
            ),
            None => classify_column(name, values),
        })
        .collect();

    let mut typed_columns = Vec::with_capacity(classified.len());
    let mut schema = Vec::with_capacity(classified.len());
    for (name, (column_type, values)) in names.into_iter().zip(classified) {
        ctx.emit(PipelineEvent::ColumnClassified {
            column: name.clone(),
            column_type,
        });
        schema.push(Column::typed(name, column_type));
        typed_columns.push(values);
    }

    table.schema.columns = schema;
    join_columns(table, typed_columns);
    ctx.emit(PipelineEvent::StageFinished {
        stage: Stage::Classify,
        rows: table.row_count(),
    });
}
