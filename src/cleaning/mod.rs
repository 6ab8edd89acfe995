//! Cleaning stages.
//!
//! [`clean`] runs the stages in a fixed order and returns the cleaned table with its frozen
//! [`ProcessingSummary`]:
//!
//! 1. [`normalize`]: canonical column identifiers
//! 2. [`dedup`]: exact-duplicate removal (before typing, so statistics see unique rows)
//! 3. [`classify`]: per-column type inference and coercion
//! 4. [`impute`]: median/mode fills
//! 5. [`invalid`]: whole-row removal of negative numeric values
//! 6. [`dedup`] again: coercion and imputation can make distinct raw rows equal
//!
//! ## Example
//!
//! ```rust
//! use data_ai_automator::cleaning::clean;
//! use data_ai_automator::observability::PipelineContext;
//! use data_ai_automator::types::{Schema, Table, Value};
//!
//! let raw = Table::new(
//!     Schema::from_names(["Product", "Unit Price"]),
//!     vec![
//!         vec![Value::text("Pen"), Value::text("2.5")],
//!         vec![Value::text("Pen"), Value::text("2.5")],
//!         vec![Value::text("Ink"), Value::Missing],
//!     ],
//! );
//!
//! let (cleaned, summary) = clean(raw, &PipelineContext::default());
//! assert_eq!(cleaned.schema.column_names().collect::<Vec<_>>(), ["product", "unit_price"]);
//! assert_eq!(summary.duplicates_removed(), 1);
//! assert_eq!(summary.missing_numeric_filled(), 1);
//! assert_eq!(cleaned.rows[1][0], Value::text("ink"));
//! ```

pub mod classify;
pub mod dedup;
pub mod impute;
pub mod invalid;
pub mod normalize;

pub use classify::{classify_columns, classify_columns_with, parse_datetime, parse_number};
pub use dedup::remove_duplicates;
pub use impute::{impute_columns, impute_numeric, impute_text, FillCounts, UNKNOWN_TEXT};
pub use invalid::remove_invalid_rows;
pub use normalize::{normalize_column_name, normalize_column_names};

use crate::observability::{PipelineContext, PipelineEvent, Stage};
use crate::summary::{ProcessingSummary, SummaryRecorder};
use crate::types::{ColumnType, Table, Value};

/// Rewrite every column name of `table` to its normalized, collision-free identifier.
pub fn normalize_headers(table: &mut Table, ctx: &PipelineContext) {
    let raw: Vec<&str> = table.schema.column_names().collect();
    let normalized = normalize_column_names(&raw);
    for (column, name) in table.schema.columns.iter_mut().zip(normalized) {
        column.name = name;
    }
    ctx.emit(PipelineEvent::StageFinished {
        stage: Stage::Normalize,
        rows: table.row_count(),
    });
}

/// Run every cleaning stage over `table`.
pub fn clean(mut table: Table, ctx: &PipelineContext) -> (Table, ProcessingSummary) {
    let mut recorder = SummaryRecorder::new(table.row_count());

    normalize_headers(&mut table, ctx);
    remove_duplicates(&mut table, &mut recorder, ctx);
    classify_columns(&mut table, ctx);
    impute_columns(&mut table, &mut recorder, ctx);
    remove_invalid_rows(&mut table, &mut recorder, ctx);
    remove_duplicates(&mut table, &mut recorder, ctx);

    let summary = recorder.finish(table.row_count());
    (table, summary)
}

/// Prepare an already-cleaned table for transformation: normalized headers and typed columns,
/// with no rows removed or filled.
///
/// Columns listed in `known` keep the type recorded by the cleaning run; the rest are inferred.
pub fn reclassify(
    mut table: Table,
    known: &[(String, ColumnType)],
    ctx: &PipelineContext,
) -> (Table, ProcessingSummary) {
    normalize_headers(&mut table, ctx);
    classify_columns_with(&mut table, known, ctx);
    let summary = ProcessingSummary::passthrough(table.row_count());
    (table, summary)
}

// Drains the rows into column-major storage. Short rows yield `Missing` for absent cells.
pub(crate) fn split_columns(table: &mut Table) -> Vec<Vec<Value>> {
    let width = table.column_count();
    let mut columns: Vec<Vec<Value>> = (0..width)
        .map(|_| Vec::with_capacity(table.row_count()))
        .collect();
    for row in table.rows.drain(..) {
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            column.push(cells.next().unwrap_or(Value::Missing));
        }
    }
    columns
}

// Inverse of `split_columns`; every column must have the same length.
pub(crate) fn join_columns(table: &mut Table, columns: Vec<Vec<Value>>) {
    let height = columns.first().map_or(0, Vec::len);
    let mut rows: Vec<Vec<Value>> = (0..height)
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for column in columns {
        for (row, value) in rows.iter_mut().zip(column) {
            row.push(value);
        }
    }
    table.rows = rows;
}
