//! Transformation stages applied to a cleaned table.
//!
//! - [`derive`]: the `total` metric column
//! - [`aggregate`]: group-by rollups
//! - [`rollup`]: positive-only filtering and ordering

pub mod aggregate;
pub mod derive;
pub mod rollup;

pub use aggregate::{aggregate, aggregate_by, choose_group_key};
pub use derive::{add_total_column, detect_total_roles, total_values, TotalRoles, TOTAL_COLUMN};
pub use rollup::{filter_and_sort, finalize_rollup};

use crate::observability::PipelineContext;
use crate::types::{GroupedRow, Table};

/// Derive `total`, group and finalize the rollup.
///
/// Returns the transformed table (the cleaned table plus `total`) and the ordered rollups.
pub fn transform(mut table: Table, ctx: &PipelineContext) -> (Table, Vec<GroupedRow>) {
    add_total_column(&mut table, ctx);
    let grouped = aggregate(&table, ctx);
    let grouped = finalize_rollup(grouped, ctx);
    (table, grouped)
}
