//! Whole-row removal of negative numeric values.
//!
//! A row is dropped when any numeric cell in it is below zero, even if the other cells are fine.
//! Legitimately negative measures (refunds, adjustments) are lost along with it; callers that need
//! them must keep those rows out of numeric columns before cleaning.

use crate::observability::{PipelineContext, PipelineEvent, Stage};
use crate::processing::filter;
use crate::summary::SummaryRecorder;
use crate::types::{ColumnType, Table, Value};

/// Remove rows holding a negative number in any numeric column. Returns the number removed.
pub fn remove_invalid_rows(table: &mut Table, recorder: &mut SummaryRecorder, ctx: &PipelineContext) -> usize {
    let numeric_idxs: Vec<usize> = table
        .schema
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.inferred_type == Some(ColumnType::Numeric))
        .map(|(idx, _)| idx)
        .collect();

    let before = table.row_count();
    if !numeric_idxs.is_empty() {
        *table = filter(table, |row| {
            !numeric_idxs
                .iter()
                .any(|&idx| matches!(row.get(idx), Some(Value::Number(v)) if *v < 0.0))
        });
    }

    let removed = before - table.row_count();
    recorder.record_invalid(removed);
    ctx.emit(PipelineEvent::StageFinished {
        stage: Stage::FilterInvalid,
        rows: table.row_count(),
    });
    removed
}
