//! Rollup filtering and ordering.

use std::cmp::Ordering;

use crate::observability::{PipelineContext, PipelineEvent, Stage};
use crate::types::GroupedRow;

/// Keep groups with positive `total_sales`, ordered by `total_sales` descending.
///
/// Equal totals are ordered by `group_key` ascending, so the result does not depend on the input
/// order.
pub fn filter_and_sort(mut grouped: Vec<GroupedRow>) -> Vec<GroupedRow> {
    grouped.retain(|g| g.total_sales > 0.0);
    grouped.sort_by(rollup_order);
    grouped
}

fn rollup_order(a: &GroupedRow, b: &GroupedRow) -> Ordering {
    b.total_sales
        .total_cmp(&a.total_sales)
        .then_with(|| a.group_key.total_cmp(&b.group_key))
}

/// [`filter_and_sort`], reporting the surviving row count.
pub fn finalize_rollup(grouped: Vec<GroupedRow>, ctx: &PipelineContext) -> Vec<GroupedRow> {
    let out = filter_and_sort(grouped);
    ctx.emit(PipelineEvent::StageFinished {
        stage: Stage::Rollup,
        rows: out.len(),
    });
    out
}

#[cfg(test)]
mod tests {
    use super::filter_and_sort;
    use crate::types::{GroupedRow, Value};

    fn g(key: &str, total: f64) -> GroupedRow {
        GroupedRow {
            group_key: Value::text(key),
            total_sales: total,
            avg_total: total,
            count_rows: 1,
        }
    }

    fn keys(rows: &[GroupedRow]) -> Vec<String> {
        rows.iter().map(|r| r.group_key.to_string()).collect()
    }

    #[test]
    fn sorts_descending_by_total_sales() {
        let out = filter_and_sort(vec![g("b", 30.0), g("a", 80.0)]);
        assert_eq!(keys(&out), ["a", "b"]);
    }

    #[test]
    fn drops_zero_and_negative_totals() {
        let out = filter_and_sort(vec![g("z", 0.0), g("n", -4.0), g("p", 0.5)]);
        assert_eq!(keys(&out), ["p"]);
    }

    #[test]
    fn ties_break_on_group_key() {
        let out = filter_and_sort(vec![g("pen", 10.0), g("ink", 10.0), g("cap", 12.0)]);
        assert_eq!(keys(&out), ["cap", "ink", "pen"]);
    }
}
