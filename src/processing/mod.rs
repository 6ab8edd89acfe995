//! In-memory table primitives.
//!
//! The processing layer operates on [`crate::types::Table`] values and is what the cleaning and
//! transform stages are built from.
//!
//! - [`filter()`]: row filtering by predicate
//! - [`reduce_numbers()`]: count/sum/mean/min/max/median over numbers, plus [`mode()`]
//! - [`describe()`]: per-column summary statistics
//!
//! ## Example: filter → reduce
//!
//! ```rust
//! use data_ai_automator::processing::{filter, reduce_numbers, ReduceOp};
//! use data_ai_automator::types::{Schema, Table, Value};
//!
//! let t = Table::new(
//!     Schema::from_names(["product", "total"]),
//!     vec![
//!         vec![Value::text("pen"), Value::Number(20.0)],
//!         vec![Value::text("ink"), Value::Number(5.0)],
//!         vec![Value::text("pen"), Value::Number(60.0)],
//!     ],
//! );
//!
//! let pens = filter(&t, |row| row[0] == Value::text("pen"));
//! let totals: Vec<f64> = pens.column_values(1).filter_map(Value::as_number).collect();
//! assert_eq!(reduce_numbers(&totals, ReduceOp::Sum), Some(80.0));
//! assert_eq!(reduce_numbers(&totals, ReduceOp::Mean), Some(40.0));
//! ```

pub mod describe;
pub mod filter;
pub mod reduce;

pub use describe::{describe, describe_markdown, markdown_cell, ColumnSummary};
pub use filter::filter;
pub use reduce::{median, mode, reduce_numbers, ReduceOp};
