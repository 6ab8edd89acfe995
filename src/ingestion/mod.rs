//! The loader: reads a file of unknown shape into an untyped [`crate::types::Table`].
//!
//! Most callers should use [`load_table`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`LoadOptions`])
//! - reads every column, keeping header order and raw header text
//! - reports success/failure to the run's [`crate::observability::PipelineContext`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`]
//! - `excel` (behind the `excel` feature)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod parquet;
pub mod unified;

pub use unified::{load_table, LoadFormat, LoadOptions};
