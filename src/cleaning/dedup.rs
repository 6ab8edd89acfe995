//! Exact-duplicate row removal.

use std::collections::HashSet;

use crate::observability::{PipelineContext, PipelineEvent, Stage};
use crate::summary::SummaryRecorder;
use crate::types::Table;

/// Drop every row that is cell-for-cell equal (value and type) to an earlier row.
///
/// Keeps first occurrences in row order. Returns the number of rows removed.
pub fn remove_duplicates(table: &mut Table, recorder: &mut SummaryRecorder, ctx: &PipelineContext) -> usize {
    let before = table.row_count();
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(before);
        table.rows.iter().map(|row| seen.insert(row.as_slice())).collect()
    };
    let mut flags = keep.into_iter();
    table.rows.retain(|_| flags.next().unwrap_or(true));

    let removed = before - table.row_count();
    recorder.record_duplicates(removed);
    ctx.emit(PipelineEvent::StageFinished {
        stage: Stage::Deduplicate,
        rows: table.row_count(),
    });
    removed
}

#[cfg(test)]
mod tests {
    use super::remove_duplicates;
    use crate::observability::PipelineContext;
    use crate::summary::SummaryRecorder;
    use crate::types::{Schema, Table, Value};

    #[test]
    fn keeps_first_occurrence_and_respects_cell_types() {
        let mut t = Table::new(
            Schema::from_names(["a", "b"]),
            vec![
                vec![Value::text("x"), Value::text("1")],
                vec![Value::text("x"), Value::Number(1.0)],
                vec![Value::text("x"), Value::text("1")],
                vec![Value::Missing, Value::Missing],
                vec![Value::Missing, Value::Missing],
            ],
        );
        let mut rec = SummaryRecorder::new(5);
        let removed = remove_duplicates(&mut t, &mut rec, &PipelineContext::default());

        assert_eq!(removed, 2);
        assert_eq!(
            t.rows,
            vec![
                vec![Value::text("x"), Value::text("1")],
                vec![Value::text("x"), Value::Number(1.0)],
                vec![Value::Missing, Value::Missing],
            ]
        );
        assert_eq!(rec.finish(3).duplicates_removed(), 2);
    }
}
