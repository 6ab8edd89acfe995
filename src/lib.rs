//! `data-ai-automator` cleans tabular files of unknown shape and rolls them up.
//!
//! A run loads a table (CSV, JSON/NDJSON, Parquet or Excel), then:
//!
//! 1. normalizes column names to unique `[a-z0-9_]+` identifiers,
//! 2. drops exact-duplicate rows,
//! 3. types every column as numeric, text or datetime from its name and content,
//! 4. fills missing numbers with the column median and missing text with the column mode,
//! 5. drops rows holding a negative number,
//! 6. derives `total = price × quantity` (or `1` when those roles are absent),
//! 7. groups by the first product/item/category column and keeps positive rollups, largest first.
//!
//! Every removal and fill is counted in a [`summary::ProcessingSummary`]. Around that core the
//! crate writes the cleaned CSV, asks Gemini for an analysis, draws a bar chart and assembles a PDF
//! report; those collaborators degrade gracefully when they fail.
//!
//! ## Modules
//!
//! - [`ingestion`]: format detection and loaders
//! - [`cleaning`]: normalize / dedup / classify / impute / invalid-row stages
//! - [`transform`]: derived `total`, aggregation, rollup ordering
//! - [`summary`]: provenance counters
//! - [`processing`]: row filtering, numeric reductions and per-column statistics over a [`types::Table`]
//! - [`observability`]: run context and event observers
//! - [`config`]: column-role aliases and output locations
//! - [`output`], [`ai`], [`chart`], [`report`]: collaborators
//! - [`pipeline`]: the full run and the regenerate modes
//!
//! ## Example
//!
//! ```rust
//! use data_ai_automator::observability::PipelineContext;
//! use data_ai_automator::pipeline::process_table;
//! use data_ai_automator::types::{Schema, Table, Value};
//!
//! let raw = Table::new(
//!     Schema::from_names(["Product", "Price", "Qty"]),
//!     vec![
//!         vec![Value::text("Pen"), Value::text("10"), Value::text("2")],
//!         vec![Value::text("Pen"), Value::text("20"), Value::text("3")],
//!         vec![Value::text("Ink"), Value::text("4"), Value::text("1")],
//!     ],
//! );
//!
//! let out = process_table(raw, &PipelineContext::default());
//! assert_eq!(out.grouped[0].group_key, Value::text("pen"));
//! assert_eq!(out.grouped[0].total_sales, 80.0);
//! assert_eq!(out.summary.rows_after_cleaning(), 3);
//! ```

pub mod ai;
pub mod chart;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod observability;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod summary;
pub mod transform;
pub mod types;

pub use error::{ChartError, ExportError, LoadError, LoadResult, PipelineError, ReportError};
