//! Provenance counters for one cleaning run.
//!
//! The cleaning stages write into a [`SummaryRecorder`]; once cleaning completes the recorder is
//! consumed by [`SummaryRecorder::finish`] and the resulting [`ProcessingSummary`] cannot change.

use std::fmt;

use serde::Serialize;

/// Immutable record of what cleaning did to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessingSummary {
    rows_before: usize,
    rows_after_cleaning: usize,
    rows_after_transform: usize,
    duplicates_removed: usize,
    missing_numeric_filled: usize,
    missing_text_filled: usize,
    invalid_removed: usize,
}

impl ProcessingSummary {
    /// Summary for a table that was already clean (nothing removed or filled).
    pub fn passthrough(rows: usize) -> Self {
        SummaryRecorder::new(rows).finish(rows)
    }

    pub fn rows_before(&self) -> usize {
        self.rows_before
    }

    pub fn rows_after_cleaning(&self) -> usize {
        self.rows_after_cleaning
    }

    /// Rows of the transformed table. The derived column never drops rows, so this always equals
    /// [`Self::rows_after_cleaning`].
    pub fn rows_after_transform(&self) -> usize {
        self.rows_after_transform
    }

    pub fn duplicates_removed(&self) -> usize {
        self.duplicates_removed
    }

    pub fn missing_numeric_filled(&self) -> usize {
        self.missing_numeric_filled
    }

    pub fn missing_text_filled(&self) -> usize {
        self.missing_text_filled
    }

    pub fn invalid_removed(&self) -> usize {
        self.invalid_removed
    }

    /// The seven counters as `(label, value)` pairs, in report order.
    pub fn lines(&self) -> [(&'static str, usize); 7] {
        [
            ("Rows before", self.rows_before),
            ("Rows after cleaning", self.rows_after_cleaning),
            ("Rows after transformations", self.rows_after_transform),
            ("Removed duplicates", self.duplicates_removed),
            ("Filled missing numeric", self.missing_numeric_filled),
            ("Filled missing text", self.missing_text_filled),
            ("Removed invalid rows", self.invalid_removed),
        ]
    }
}

impl fmt::Display for ProcessingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.lines() {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}

/// Mutable counters, written by reference while cleaning runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRecorder {
    rows_before: usize,
    duplicates_removed: usize,
    missing_numeric_filled: usize,
    missing_text_filled: usize,
    invalid_removed: usize,
}

impl SummaryRecorder {
    /// Start recording for a table of `rows_before` rows.
    pub fn new(rows_before: usize) -> Self {
        Self {
            rows_before,
            duplicates_removed: 0,
            missing_numeric_filled: 0,
            missing_text_filled: 0,
            invalid_removed: 0,
        }
    }

    pub fn record_duplicates(&mut self, n: usize) {
        self.duplicates_removed += n;
    }

    pub fn record_numeric_fills(&mut self, n: usize) {
        self.missing_numeric_filled += n;
    }

    pub fn record_text_fills(&mut self, n: usize) {
        self.missing_text_filled += n;
    }

    pub fn record_invalid(&mut self, n: usize) {
        self.invalid_removed += n;
    }

    /// Freeze the counters.
    ///
    /// # Panics
    ///
    /// Panics (debug builds) if the removal counters do not account for the shrink from
    /// `rows_before` to `rows_after_cleaning`.
    pub fn finish(self, rows_after_cleaning: usize) -> ProcessingSummary {
        debug_assert_eq!(
            self.duplicates_removed + self.invalid_removed,
            self.rows_before.saturating_sub(rows_after_cleaning),
            "removal counters must account for every dropped row"
        );
        ProcessingSummary {
            rows_before: self.rows_before,
            rows_after_cleaning,
            rows_after_transform: rows_after_cleaning,
            duplicates_removed: self.duplicates_removed,
            missing_numeric_filled: self.missing_numeric_filled,
            missing_text_filled: self.missing_text_filled,
            invalid_removed: self.invalid_removed,
        }
    }
}
