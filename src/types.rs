//! Core data model types.
//!
//! Loaders produce an in-memory [`Table`] whose cells are [`Value`]s. The table's [`Schema`] starts
//! out untyped (every [`Column::inferred_type`] is `None`) and is typed by the classifier during
//! cleaning.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Semantic type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Floating point measures.
    Numeric,
    /// Free text (lower-cased during classification).
    Text,
    /// Timestamps.
    DateTime,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::DateTime => "datetime",
        };
        f.write_str(s)
    }
}

/// A single named column in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column identifier.
    pub name: String,
    /// Type assigned by the classifier; `None` until classification ran.
    pub inferred_type: Option<ColumnType>,
}

impl Column {
    /// Create an untyped column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inferred_type: None,
        }
    }

    /// Create a column with a known type.
    pub fn typed(name: impl Into<String>, inferred_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            inferred_type: Some(inferred_type),
        }
    }
}

/// Ordered column definitions shared by every row of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Ordered list of columns.
    pub columns: Vec<Column>,
}

impl Schema {
    /// Create a new schema from columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Build an untyped schema from column names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: names.into_iter().map(Column::new).collect(),
        }
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// `true` when the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A single cell.
///
/// `Missing` is a first-class value; it is never conflated with `0` or the empty string.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent/empty cell.
    Missing,
    /// 64-bit float.
    Number(f64),
    /// UTF-8 text.
    Text(String),
    /// Timestamp without timezone.
    DateTime(NaiveDateTime),
}

impl Value {
    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// `true` for [`Value::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns the number held by a [`Value::Number`] cell.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text held by a [`Value::Text`] cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Number(_) => 1,
            Self::DateTime(_) => 2,
            Self::Text(_) => 3,
        }
    }

    /// Total order over values: `Missing < Number < DateTime < Text`, then by content.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

// Folds -0.0 into 0.0 and every NaN payload into one, so equality and hashing agree.
fn canonical(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Missing => {}
            Self::Number(v) => canonical(*v).to_bits().hash(state),
            Self::Text(s) => s.hash(state),
            Self::DateTime(dt) => dt.hash(state),
        }
    }
}

/// Serialized form used by the cleaned CSV and report previews.
///
/// Numbers print as decimal text, timestamps as ISO-8601, text as-is and `Missing` as nothing.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// In-memory table.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] columns. Row order is
/// insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Iterate the cells of column `idx` in row order.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Replace (if `column.name` exists) or append a column.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the row count.
    pub fn set_column(&mut self, column: Column, values: Vec<Value>) {
        assert!(
            values.len() == self.rows.len(),
            "column length {} does not match row count {}",
            values.len(),
            self.rows.len()
        );
        match self.schema.index_of(&column.name) {
            Some(idx) => {
                self.schema.columns[idx] = column;
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                self.schema.columns.push(column);
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
    }

    /// First `n` rows as a new table.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// One rollup row produced by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedRow {
    /// Shared value of the grouping key column.
    pub group_key: Value,
    /// Sum of `total` over the group.
    pub total_sales: f64,
    /// Mean of `total` over the group.
    pub avg_total: f64,
    /// Rows in the group.
    pub count_rows: usize,
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Column, ColumnType, Schema, Table, Value};

    fn sample_table() -> Table {
        Table::new(
            Schema::from_names(["id", "name"]),
            vec![
                vec![Value::Number(1.0), Value::text("a")],
                vec![Value::Number(2.0), Value::text("b")],
            ],
        )
    }

    #[test]
    fn number_equality_ignores_sign_of_zero_but_not_type() {
        assert_eq!(Value::Number(0.0), Value::Number(-0.0));
        assert_ne!(Value::Number(1.0), Value::text("1"));
        assert_ne!(Value::Missing, Value::text(""));
        assert_ne!(Value::Missing, Value::Number(0.0));

        let set: HashSet<Value> = [Value::Number(0.0), Value::Number(-0.0)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn display_matches_csv_serialization() {
        assert_eq!(Value::Number(20.0).to_string(), "20");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Missing.to_string(), "");
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap();
        assert_eq!(Value::DateTime(dt).to_string(), "2024-03-01T08:30:00");
    }

    #[test]
    fn total_cmp_orders_across_variants() {
        let mut values = vec![
            Value::text("b"),
            Value::Number(3.0),
            Value::Missing,
            Value::text("a"),
            Value::Number(-1.0),
        ];
        values.sort_by(Value::total_cmp);
        assert_eq!(
            values,
            vec![
                Value::Missing,
                Value::Number(-1.0),
                Value::Number(3.0),
                Value::text("a"),
                Value::text("b"),
            ]
        );
    }

    #[test]
    fn set_column_appends_then_replaces() {
        let mut t = sample_table();
        t.set_column(
            Column::typed("total", ColumnType::Numeric),
            vec![Value::Number(1.0), Value::Number(1.0)],
        );
        assert_eq!(t.schema.index_of("total"), Some(2));

        t.set_column(
            Column::typed("total", ColumnType::Numeric),
            vec![Value::Number(5.0), Value::Number(6.0)],
        );
        assert_eq!(t.column_count(), 3);
        assert_eq!(t.rows[1][2], Value::Number(6.0));
    }

    #[test]
    fn head_truncates() {
        let t = sample_table();
        assert_eq!(t.head(1).row_count(), 1);
        assert_eq!(t.head(10).row_count(), 2);
    }
}
