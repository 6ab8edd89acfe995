//! Prompt construction.

use std::fmt::Write as _;

use crate::processing::{describe_markdown, markdown_cell};
use crate::types::{GroupedRow, Table};

/// Rows of the table preview included in the prompt.
pub const PREVIEW_ROWS: usize = 5;
/// Rollup rows included in the prompt.
pub const GROUPED_ROWS: usize = 20;

const INSTRUCTIONS: &str = "You are a data analyst. I will provide a dataset and some aggregated statistics.
Generate a concise professional report that includes:
- A high-level dataset summary
- Key patterns or insights
- Any anomalies or data quality issues you notice
- Business recommendations based on the grouped/aggregated data";

/// Full analysis prompt: instructions, a table preview, per-column statistics and the top
/// rollups.
pub fn build_prompt(table: &Table, grouped: &[GroupedRow]) -> String {
    format!(
        "{INSTRUCTIONS}\n\nDataset head (first rows):\n{}\nDataset summary statistics:\n{}\nGrouped / aggregated data (top groups):\n{}",
        rows_markdown(&table.head(PREVIEW_ROWS)),
        describe_markdown(table),
        grouped_markdown(&grouped[..grouped.len().min(GROUPED_ROWS)]),
    )
}

/// Markdown table of every row of `table`.
pub fn rows_markdown(table: &Table) -> String {
    let header: Vec<&str> = table.schema.column_names().collect();
    let mut out = markdown_header(&header);
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        markdown_line(&mut out, &cells);
    }
    out
}

/// Markdown table of rollup rows.
pub fn grouped_markdown(grouped: &[GroupedRow]) -> String {
    let mut out = markdown_header(&["group_key", "total_sales", "avg_total", "count_rows"]);
    for g in grouped {
        markdown_line(
            &mut out,
            &[
                g.group_key.to_string(),
                format!("{:.2}", g.total_sales),
                format!("{:.2}", g.avg_total),
                g.count_rows.to_string(),
            ],
        );
    }
    out
}

fn markdown_header(names: &[&str]) -> String {
    let mut out = String::new();
    let names: Vec<String> = names.iter().map(|n| markdown_cell(n)).collect();
    let _ = writeln!(out, "| {} |", names.join(" | "));
    let _ = writeln!(out, "|{}", "---|".repeat(names.len().max(1)));
    out
}

fn markdown_line<S: AsRef<str>>(out: &mut String, cells: &[S]) {
    let cells: Vec<String> = cells.iter().map(|c| markdown_cell(c.as_ref())).collect();
    let _ = writeln!(out, "| {} |", cells.join(" | "));
}

#[cfg(test)]
mod tests {
    use super::{build_prompt, grouped_markdown, rows_markdown};
    use crate::types::{GroupedRow, Schema, Table, Value};

    #[test]
    fn rows_render_as_markdown() {
        let t = Table::new(
            Schema::from_names(["product", "total"]),
            vec![vec![Value::text("pen"), Value::Number(20.0)]],
        );
        assert_eq!(
            rows_markdown(&t),
            "| product | total |\n|---|---|\n| pen | 20 |\n"
        );
    }

    #[test]
    fn cell_text_cannot_break_the_table() {
        let t = Table::new(
            Schema::from_names(["note"]),
            vec![vec![Value::text("red|blue\nlarge")]],
        );
        assert_eq!(rows_markdown(&t), "| note |\n|---|\n| red\\|blue large |\n");
    }

    #[test]
    fn prompt_limits_preview_and_rollups() {
        let rows = (0..10).map(|i| vec![Value::Number(f64::from(i))]).collect();
        let t = Table::new(Schema::from_names(["n"]), rows);
        let grouped: Vec<GroupedRow> = (0..30)
            .map(|i| GroupedRow {
                group_key: Value::Number(f64::from(i)),
                total_sales: 1.0,
                avg_total: 1.0,
                count_rows: 1,
            })
            .collect();

        let prompt = build_prompt(&t, &grouped);
        assert!(prompt.starts_with("You are a data analyst."));
        assert!(prompt.contains("| 4 |"));
        assert!(!prompt.contains("| 5 |\n| 6 |"));
        assert!(grouped_markdown(&grouped).contains("| 29 |"));
        assert!(prompt.contains("| 19 | 1.00"));
        assert!(!prompt.contains("| 20 | 1.00"));
    }
}
