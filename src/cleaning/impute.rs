//! Missing-value imputation.
//!
//! - Numeric columns: median of the column's numbers, computed once before any cell is filled.
//!   A column with no numbers is left untouched and nothing is counted.
//! - Text columns: the most frequent value, ties going to the first value to reach the top count;
//!   [`UNKNOWN_TEXT`] when the column has no text at all.
//! - DateTime columns are not imputed.

use rayon::prelude::*;

use crate::observability::{PipelineContext, PipelineEvent, Stage};
use crate::processing::{median, mode};
use crate::summary::SummaryRecorder;
use crate::types::{ColumnType, Table, Value};

use super::{join_columns, split_columns};

/// Fill text used when a text column has no values to take a mode from.
pub const UNKNOWN_TEXT: &str = "unknown";

/// Replace missing cells with the column median. Returns the number of cells filled.
pub fn impute_numeric(values: &mut [Value]) -> usize {
    let numbers: Vec<f64> = values.iter().filter_map(Value::as_number).collect();
    let Some(fill) = median(&numbers) else {
        return 0;
    };
    fill_missing(values, &Value::Number(fill))
}

/// Replace missing cells with the column mode (or [`UNKNOWN_TEXT`]). Returns the number of cells
/// filled.
pub fn impute_text(values: &mut [Value]) -> usize {
    let fill = mode(values.iter()).map_or_else(|| Value::text(UNKNOWN_TEXT), |(v, _)| v.clone());
    fill_missing(values, &fill)
}

fn fill_missing(values: &mut [Value], fill: &Value) -> usize {
    let mut filled = 0;
    for v in values.iter_mut().filter(|v| v.is_missing()) {
        *v = fill.clone();
        filled += 1;
    }
    filled
}

/// Fill counts produced by one imputation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillCounts {
    pub numeric: usize,
    pub text: usize,
}

/// Impute every typed column of `table` in place and record the fills.
pub fn impute_columns(table: &mut Table, recorder: &mut SummaryRecorder, ctx: &PipelineContext) -> FillCounts {
    let types: Vec<Option<ColumnType>> = table.schema.columns.iter().map(|c| c.inferred_type).collect();
    let mut columns = split_columns(table);

    let per_column: Vec<FillCounts> = columns
        .par_iter_mut()
        .zip(types.par_iter())
        .map(|(values, column_type)| match column_type {
            Some(ColumnType::Numeric) => FillCounts {
                numeric: impute_numeric(values),
                text: 0,
            },
            Some(ColumnType::Text) => FillCounts {
                numeric: 0,
                text: impute_text(values),
            },
            Some(ColumnType::DateTime) | None => FillCounts::default(),
        })
        .collect();

    join_columns(table, columns);

    let counts = per_column.iter().fold(FillCounts::default(), |acc, c| FillCounts {
        numeric: acc.numeric + c.numeric,
        text: acc.text + c.text,
    });
    recorder.record_numeric_fills(counts.numeric);
    recorder.record_text_fills(counts.text);
    ctx.emit(PipelineEvent::StageFinished {
        stage: Stage::Impute,
        rows: table.row_count(),
    });
    counts
}

#[cfg(test)]
mod tests {
    use super::{impute_columns, impute_numeric, impute_text, FillCounts};
    use crate::observability::PipelineContext;
    use crate::summary::SummaryRecorder;
    use crate::types::{Column, ColumnType, Schema, Table, Value};

    #[test]
    fn numeric_missing_takes_median_of_present_values() {
        let mut values = vec![Value::Number(1.0), Value::Number(2.0), Value::Missing, Value::Number(4.0)];
        assert_eq!(impute_numeric(&mut values), 1);
        assert_eq!(
            values,
            vec![Value::Number(1.0), Value::Number(2.0), Value::Number(2.0), Value::Number(4.0)]
        );
    }

    #[test]
    fn median_is_computed_before_filling() {
        let mut values = vec![Value::Missing, Value::Number(1.0), Value::Missing, Value::Number(3.0)];
        assert_eq!(impute_numeric(&mut values), 2);
        assert_eq!(values[0], Value::Number(2.0));
        assert_eq!(values[2], Value::Number(2.0));
    }

    #[test]
    fn all_missing_numeric_column_is_left_alone() {
        let mut values = vec![Value::Missing, Value::Missing];
        assert_eq!(impute_numeric(&mut values), 0);
        assert!(values.iter().all(Value::is_missing));
    }

    #[test]
    fn text_missing_takes_mode() {
        let mut values = vec![Value::text("a"), Value::text("a"), Value::text("b"), Value::Missing];
        assert_eq!(impute_text(&mut values), 1);
        assert_eq!(values[3], Value::text("a"));
    }

    #[test]
    fn text_without_values_uses_unknown() {
        let mut values = vec![Value::Missing];
        assert_eq!(impute_text(&mut values), 1);
        assert_eq!(values[0], Value::text("unknown"));
    }

    #[test]
    fn impute_columns_records_counts_and_skips_datetime() {
        let mut t = Table::new(
            Schema::new(vec![
                Column::typed("price", ColumnType::Numeric),
                Column::typed("product", ColumnType::Text),
                Column::typed("order_date", ColumnType::DateTime),
            ]),
            vec![
                vec![Value::Number(10.0), Value::Missing, Value::Missing],
                vec![Value::Missing, Value::text("pen"), Value::Missing],
            ],
        );
        let mut rec = SummaryRecorder::new(2);
        let counts = impute_columns(&mut t, &mut rec, &PipelineContext::default());

        assert_eq!(counts, FillCounts { numeric: 1, text: 1 });
        assert_eq!(t.rows[1][0], Value::Number(10.0));
        assert_eq!(t.rows[0][1], Value::text("pen"));
        assert!(t.rows[0][2].is_missing());

        let s = rec.finish(2);
        assert_eq!(s.missing_numeric_filled(), 1);
        assert_eq!(s.missing_text_filled(), 1);
    }
}
