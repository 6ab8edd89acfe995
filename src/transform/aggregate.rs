//! Group-by rollups over the `total` column.

use std::collections::HashMap;

use crate::observability::{PipelineContext, PipelineEvent, Stage};
use crate::processing::{reduce_numbers, ReduceOp};
use crate::types::{GroupedRow, Table, Value};

use super::derive::TOTAL_COLUMN;

/// Grouping column: the first group-key alias present, else the table's first column.
pub fn choose_group_key<'a>(table: &'a Table, ctx: &PipelineContext) -> Option<&'a str> {
    let names: Vec<&'a str> = table.schema.column_names().collect();
    ctx.aliases
        .find_group_key(&names)
        .or_else(|| names.first().copied())
}

/// Group `table` by `key` and compute `total_sales`, `avg_total` and `count_rows` per group.
///
/// Groups come back in order of first appearance. Rows whose key is missing form one group of
/// their own, so every row is counted in exactly one group. Returns an empty list when either
/// `key` or the `total` column is absent.
pub fn aggregate_by(table: &Table, key: &str) -> Vec<GroupedRow> {
    let (Some(key_idx), Some(total_idx)) = (
        table.schema.index_of(key),
        table.schema.index_of(TOTAL_COLUMN),
    ) else {
        return Vec::new();
    };

    let mut slots: HashMap<&Value, usize> = HashMap::new();
    let mut groups: Vec<(&Value, Vec<f64>, usize)> = Vec::new();
    for row in &table.rows {
        let Some(group_key) = row.get(key_idx) else {
            continue;
        };
        let slot = *slots.entry(group_key).or_insert_with(|| {
            groups.push((group_key, Vec::new(), 0));
            groups.len() - 1
        });
        let (_, totals, count) = &mut groups[slot];
        *count += 1;
        if let Some(total) = row.get(total_idx).and_then(Value::as_number) {
            totals.push(total);
        }
    }

    groups
        .into_iter()
        .map(|(group_key, totals, count_rows)| GroupedRow {
            group_key: group_key.clone(),
            total_sales: reduce_numbers(&totals, ReduceOp::Sum).unwrap_or(0.0),
            avg_total: reduce_numbers(&totals, ReduceOp::Mean).unwrap_or(0.0),
            count_rows,
        })
        .collect()
}

/// Pick the grouping column and aggregate.
pub fn aggregate(table: &Table, ctx: &PipelineContext) -> Vec<GroupedRow> {
    let grouped = match choose_group_key(table, ctx) {
        Some(key) => aggregate_by(table, key),
        None => Vec::new(),
    };
    ctx.emit(PipelineEvent::StageFinished {
        stage: Stage::Aggregate,
        rows: grouped.len(),
    });
    grouped
}
