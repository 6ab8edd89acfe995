//! JSON loading.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single object (one row)
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Columns are the union of object keys in order of first appearance. A key absent from a record
//! reads as [`Value::Missing`].

use std::fs;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::types::{Schema, Table, Value};

/// Load JSON into an in-memory [`Table`].
pub fn load_json_from_path(path: impl AsRef<Path>) -> LoadResult<Table> {
    let text = fs::read_to_string(path)?;
    load_json_from_str(&text)
}

/// Load JSON from an in-memory string into a [`Table`].
pub fn load_json_from_str(input: &str) -> LoadResult<Table> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LoadError::Malformed {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => load_json_values(&items),
            serde_json::Value::Object(_) => load_json_values(std::slice::from_ref(&v)),
            _ => Err(LoadError::Malformed {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                LoadError::Malformed {
                    message: format!("invalid ndjson at line {}: {}", i + 1, e),
                }
            })?;
            values.push(v);
        }
        load_json_values(&values)
    }
}

fn load_json_values(values: &[serde_json::Value]) -> LoadResult<Table> {
    let mut objects = Vec::with_capacity(values.len());
    let mut names: Vec<String> = Vec::new();

    for (idx0, v) in values.iter().enumerate() {
        let obj = v.as_object().ok_or_else(|| LoadError::Malformed {
            message: format!("row {} is not a json object", idx0 + 1),
        })?;
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            names
                .iter()
                .map(|name| obj.get(name).map_or(Value::Missing, convert_json_value))
                .collect()
        })
        .collect();

    Ok(Table::new(Schema::from_names(names), rows))
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Missing,
        serde_json::Value::Number(n) => n.as_f64().map_or(Value::Missing, Value::Number),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Missing
            } else {
                Value::Text(trimmed.to_owned())
            }
        }
        serde_json::Value::Bool(b) => Value::Text(b.to_string()),
        nested => Value::Text(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::load_json_from_str;
    use crate::types::Value;

    #[test]
    fn array_of_objects_unions_keys_in_first_seen_order() {
        let t = load_json_from_str(r#"[{"b":1,"a":"x"},{"a":"y","c":null}]"#).unwrap();
        assert_eq!(t.schema.column_names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(
            t.rows,
            vec![
                vec![Value::Number(1.0), Value::text("x"), Value::Missing],
                vec![Value::Missing, Value::text("y"), Value::Missing],
            ]
        );
    }

    #[test]
    fn ndjson_is_accepted() {
        let t = load_json_from_str("{\"a\":1}\n\n{\"a\":true}\n").unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.rows[1][0], Value::text("true"));
    }

    #[test]
    fn scalar_root_is_rejected() {
        let err = load_json_from_str("42").unwrap_err();
        assert!(err.to_string().contains("malformed input"));
    }

    #[test]
    fn non_object_row_is_rejected() {
        let err = load_json_from_str(r#"[{"a":1}, 3]"#).unwrap_err();
        assert!(err.to_string().contains("row 2 is not a json object"));
    }
}
