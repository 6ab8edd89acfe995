//! Numeric reductions and the mode of a value sequence.

use std::collections::HashMap;

use crate::types::Value;

/// Built-in reductions over a slice of numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Number of values.
    Count,
    /// Sum numeric values.
    Sum,
    /// Arithmetic mean of numeric values.
    Mean,
    /// Minimum numeric value.
    Min,
    /// Maximum numeric value.
    Max,
    /// Median of numeric values.
    Median,
}

/// Apply a numeric [`ReduceOp`] to a slice; `None` for an empty slice (except `Count`).
pub fn reduce_numbers(values: &[f64], op: ReduceOp) -> Option<f64> {
    if op == ReduceOp::Count {
        return Some(values.len() as f64);
    }
    if values.is_empty() {
        return None;
    }
    match op {
        ReduceOp::Sum => Some(values.iter().sum()),
        ReduceOp::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
        ReduceOp::Min => values.iter().copied().reduce(f64::min),
        ReduceOp::Max => values.iter().copied().reduce(f64::max),
        ReduceOp::Median => median(values),
        ReduceOp::Count => unreachable!("count handled above"),
    }
}

/// Median of `values`; the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent non-missing value and its count.
///
/// Ties go to the value that reached the winning count first while scanning in order, so
/// `[b, a, a, b]` yields `a`.
pub fn mode<'a, I>(values: I) -> Option<(&'a Value, usize)>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut counts: HashMap<&Value, usize> = HashMap::new();
    let mut best: Option<(&Value, usize)> = None;
    for v in values.into_iter().filter(|v| !v.is_missing()) {
        let n = counts.entry(v).or_insert(0);
        *n += 1;
        if best.is_none_or(|(_, c)| *n > c) {
            best = Some((v, *n));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::{median, mode, reduce_numbers, ReduceOp};
    use crate::types::Value;

    #[test]
    fn numeric_reductions() {
        let values = [10.0, 5.5, 2.0];
        assert_eq!(reduce_numbers(&values, ReduceOp::Count), Some(3.0));
        assert_eq!(reduce_numbers(&values, ReduceOp::Sum), Some(17.5));
        assert_eq!(reduce_numbers(&[10.0, 5.5], ReduceOp::Mean), Some(7.75));
        assert_eq!(reduce_numbers(&values, ReduceOp::Min), Some(2.0));
        assert_eq!(reduce_numbers(&values, ReduceOp::Max), Some(10.0));
        assert_eq!(reduce_numbers(&values, ReduceOp::Median), Some(5.5));
    }

    #[test]
    fn empty_input_has_no_value_except_count() {
        assert_eq!(reduce_numbers(&[], ReduceOp::Count), Some(0.0));
        assert_eq!(reduce_numbers(&[], ReduceOp::Sum), None);
        assert_eq!(reduce_numbers(&[], ReduceOp::Median), None);
    }

    #[test]
    fn mode_prefers_first_value_to_reach_max_count() {
        let values = [
            Value::text("b"),
            Value::text("a"),
            Value::text("a"),
            Value::text("b"),
            Value::Missing,
            Value::Missing,
            Value::Missing,
        ];
        assert_eq!(mode(&values), Some((&Value::text("a"), 2)));
        assert_eq!(mode(&[Value::Missing]), None);
    }

    #[test]
    fn median_of_even_length_averages_middle_pair() {
        assert_eq!(median(&[4.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }
}
