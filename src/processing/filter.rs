//! Row filtering for [`crate::types::Table`].

use crate::types::{Table, Value};

/// Returns a new [`Table`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`Table::filter_rows`].
pub fn filter<F>(table: &Table, predicate: F) -> Table
where
    F: FnMut(&[Value]) -> bool,
{
    table.filter_rows(predicate)
}

#[cfg(test)]
mod tests {
    use super::filter;
    use crate::types::{Schema, Table, Value};

    fn sample_table() -> Table {
        Table::new(
            Schema::from_names(["id", "name"]),
            vec![
                vec![Value::Number(1.0), Value::text("a")],
                vec![Value::Number(2.0), Value::text("b")],
                vec![Value::Number(3.0), Value::Missing],
            ],
        )
    }

    #[test]
    fn filter_rows_by_numeric_predicate() {
        let t = sample_table();
        let id_idx = t.schema.index_of("id").unwrap();

        let out = filter(&t, |row| matches!(row.get(id_idx), Some(Value::Number(v)) if *v > 1.0));

        assert_eq!(out.schema, t.schema);
        assert_eq!(
            out.rows,
            vec![
                vec![Value::Number(2.0), Value::text("b")],
                vec![Value::Number(3.0), Value::Missing],
            ]
        );
        // Original unchanged
        assert_eq!(t.row_count(), 3);
    }

    #[test]
    fn filter_rows_can_return_empty_table() {
        let t = sample_table();
        let out = filter(&t, |_| false);
        assert_eq!(out.schema, t.schema);
        assert!(out.rows.is_empty());
    }
}
