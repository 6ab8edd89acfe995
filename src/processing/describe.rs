//! Per-column summary statistics.

use std::collections::HashSet;

use crate::types::{ColumnType, Table, Value};

use super::reduce::{mode, reduce_numbers, ReduceOp};

/// Summary of one column; the variant follows the column's inferred type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSummary {
    Numeric {
        count: usize,
        mean: Option<f64>,
        min: Option<f64>,
        median: Option<f64>,
        max: Option<f64>,
    },
    Text {
        count: usize,
        unique: usize,
        top: Option<Value>,
        freq: usize,
    },
    DateTime {
        count: usize,
        min: Option<Value>,
        max: Option<Value>,
    },
}

/// Describe every column of `table`. Untyped columns are summarised as text.
pub fn describe(table: &Table) -> Vec<(String, ColumnSummary)> {
    table
        .schema
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let present: Vec<&Value> = table.column_values(idx).filter(|v| !v.is_missing()).collect();
            let summary = match column.inferred_type {
                Some(ColumnType::Numeric) => {
                    let numbers: Vec<f64> = present.iter().filter_map(|v| v.as_number()).collect();
                    ColumnSummary::Numeric {
                        count: numbers.len(),
                        mean: reduce_numbers(&numbers, ReduceOp::Mean),
                        min: reduce_numbers(&numbers, ReduceOp::Min),
                        median: reduce_numbers(&numbers, ReduceOp::Median),
                        max: reduce_numbers(&numbers, ReduceOp::Max),
                    }
                }
                Some(ColumnType::DateTime) => ColumnSummary::DateTime {
                    count: present.len(),
                    min: present.iter().copied().min_by(|a, b| a.total_cmp(b)).cloned(),
                    max: present.iter().copied().max_by(|a, b| a.total_cmp(b)).cloned(),
                },
                Some(ColumnType::Text) | None => {
                    let unique: HashSet<&Value> = present.iter().copied().collect();
                    let top = mode(present.iter().copied());
                    ColumnSummary::Text {
                        count: present.len(),
                        unique: unique.len(),
                        top: top.map(|(v, _)| v.clone()),
                        freq: top.map_or(0, |(_, n)| n),
                    }
                }
            };
            (column.name.clone(), summary)
        })
        .collect()
}

/// Render a [`describe`] result as a markdown table.
pub fn describe_markdown(table: &Table) -> String {
    let mut out = String::from("| column | type | count | stats |\n|---|---|---|---|\n");
    for (name, summary) in describe(table) {
        let name = markdown_cell(&name);
        let line = match summary {
            ColumnSummary::Numeric {
                count,
                mean,
                min,
                median,
                max,
            } => format!(
                "| {name} | numeric | {count} | mean={} min={} median={} max={} |",
                fmt_opt(mean),
                fmt_opt(min),
                fmt_opt(median),
                fmt_opt(max)
            ),
            ColumnSummary::Text {
                count,
                unique,
                top,
                freq,
            } => format!(
                "| {name} | text | {count} | unique={unique} top={} freq={freq} |",
                markdown_cell(&top.unwrap_or(Value::Missing).to_string())
            ),
            ColumnSummary::DateTime { count, min, max } => format!(
                "| {name} | datetime | {count} | min={} max={} |",
                min.unwrap_or(Value::Missing),
                max.unwrap_or(Value::Missing)
            ),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Escape text for a markdown table cell: `|` is escaped and line breaks become spaces.
pub fn markdown_cell(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(String::new, |x| format!("{x:.2}"))
}

#[cfg(test)]
mod tests {
    use super::{describe, describe_markdown, markdown_cell, ColumnSummary};
    use crate::types::{Column, ColumnType, Schema, Table, Value};

    fn typed_table() -> Table {
        Table::new(
            Schema::new(vec![
                Column::typed("price", ColumnType::Numeric),
                Column::typed("product", ColumnType::Text),
            ]),
            vec![
                vec![Value::Number(10.0), Value::text("pen")],
                vec![Value::Number(20.0), Value::text("pen")],
                vec![Value::Missing, Value::text("ink")],
            ],
        )
    }

    #[test]
    fn numeric_and_text_columns_are_summarised() {
        let d = describe(&typed_table());
        assert_eq!(
            d[0].1,
            ColumnSummary::Numeric {
                count: 2,
                mean: Some(15.0),
                min: Some(10.0),
                median: Some(15.0),
                max: Some(20.0),
            }
        );
        assert_eq!(
            d[1].1,
            ColumnSummary::Text {
                count: 3,
                unique: 2,
                top: Some(Value::text("pen")),
                freq: 2,
            }
        );
    }

    #[test]
    fn markdown_has_one_line_per_column() {
        let md = describe_markdown(&typed_table());
        assert_eq!(md.lines().count(), 4);
        assert!(md.contains("| price | numeric | 2 | mean=15.00"));
    }

    #[test]
    fn markdown_cells_escape_pipes_and_line_breaks() {
        assert_eq!(markdown_cell("a|b\r\nc\nd"), "a\\|b c d");
    }
}
