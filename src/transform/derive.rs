//! Derived `total` column.

use crate::observability::{PipelineContext, PipelineEvent, Stage};
use crate::types::{Column, ColumnType, Table, Value};

/// Name of the derived metric column.
pub const TOTAL_COLUMN: &str = "total";

/// Price and quantity column names found by the role aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalRoles {
    pub price: String,
    pub quantity: String,
}

/// Locate the price and quantity columns; `None` unless both are present.
pub fn detect_total_roles(table: &Table, ctx: &PipelineContext) -> Option<TotalRoles> {
    let names: Vec<&str> = table.schema.column_names().collect();
    let price = ctx.aliases.find_price(&names)?;
    let quantity = ctx.aliases.find_quantity(&names)?;
    Some(TotalRoles {
        price: price.to_owned(),
        quantity: quantity.to_owned(),
    })
}

/// Compute `total` per row: `price × quantity` when both roles exist, otherwise the constant `1`.
///
/// A price or quantity cell that does not hold a number contributes `0`.
pub fn total_values(table: &Table, roles: Option<&TotalRoles>) -> Vec<Value> {
    let idxs = roles.and_then(|r| {
        Some((
            table.schema.index_of(&r.price)?,
            table.schema.index_of(&r.quantity)?,
        ))
    });
    match idxs {
        Some((p, q)) => table
            .rows
            .iter()
            .map(|row| {
                let cell = |idx: usize| row.get(idx).and_then(Value::as_number).unwrap_or(0.0);
                Value::Number(cell(p) * cell(q))
            })
            .collect(),
        None => vec![Value::Number(1.0); table.row_count()],
    }
}

/// Append (or overwrite) the numeric `total` column of `table`.
pub fn add_total_column(table: &mut Table, ctx: &PipelineContext) {
    let roles = detect_total_roles(table, ctx);
    if roles.is_none() {
        tracing::debug!(
            target: "data_ai_automator",
            "price/quantity columns not found; total defaults to 1"
        );
    }
    let values = total_values(table, roles.as_ref());
    table.set_column(Column::typed(TOTAL_COLUMN, ColumnType::Numeric), values);
    ctx.emit(PipelineEvent::StageFinished {
        stage: Stage::DeriveTotal,
        rows: table.row_count(),
    });
}

#[cfg(test)]
mod tests {
    use super::{add_total_column, detect_total_roles, TOTAL_COLUMN};
    use crate::config::RoleAliases;
    use crate::observability::PipelineContext;
    use crate::types::{Column, ColumnType, Schema, Table, Value};

    fn priced() -> Table {
        Table::new(
            Schema::new(vec![
                Column::typed("price", ColumnType::Numeric),
                Column::typed("quantity", ColumnType::Numeric),
            ]),
            vec![
                vec![Value::Number(10.0), Value::Number(2.0)],
                vec![Value::Number(20.0), Value::Number(3.0)],
            ],
        )
    }

    fn totals(t: &Table) -> Vec<Value> {
        let idx = t.schema.index_of(TOTAL_COLUMN).unwrap();
        t.column_values(idx).cloned().collect()
    }

    #[test]
    fn total_is_price_times_quantity() {
        let mut t = priced();
        add_total_column(&mut t, &PipelineContext::default());
        assert_eq!(totals(&t), vec![Value::Number(20.0), Value::Number(60.0)]);
        assert_eq!(t.schema.columns[2].inferred_type, Some(ColumnType::Numeric));
    }

    #[test]
    fn missing_role_gives_constant_one() {
        let mut t = Table::new(
            Schema::from_names(["product", "price"]),
            vec![vec![Value::text("pen"), Value::Number(5.0)]],
        );
        add_total_column(&mut t, &PipelineContext::default());
        assert_eq!(totals(&t), vec![Value::Number(1.0)]);
    }

    #[test]
    fn non_numeric_cells_contribute_zero_and_existing_total_is_replaced() {
        let mut t = Table::new(
            Schema::from_names(["total", "qty", "unit_price"]),
            vec![vec![Value::text("old"), Value::Missing, Value::Number(4.0)]],
        );
        add_total_column(&mut t, &PipelineContext::default());
        assert_eq!(t.column_count(), 3);
        assert_eq!(totals(&t), vec![Value::Number(0.0)]);
    }

    #[test]
    fn custom_aliases_are_honoured() {
        let ctx = PipelineContext {
            aliases: RoleAliases {
                price: vec!["cost".into()],
                quantity: vec!["units".into()],
                ..RoleAliases::default()
            },
            ..PipelineContext::default()
        };
        let t = Table::new(Schema::from_names(["units", "cost"]), vec![]);
        let roles = detect_total_roles(&t, &ctx).unwrap();
        assert_eq!((roles.price.as_str(), roles.quantity.as_str()), ("cost", "units"));
    }
}
