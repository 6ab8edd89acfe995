use data_ai_automator::config::RoleAliases;
use data_ai_automator::observability::PipelineContext;
use data_ai_automator::transform::{filter_and_sort, transform, TOTAL_COLUMN};
use data_ai_automator::types::{Column, ColumnType, GroupedRow, Schema, Table, Value};

fn typed(columns: &[(&str, ColumnType)], rows: Vec<Vec<Value>>) -> Table {
    Table::new(
        Schema::new(columns.iter().map(|(n, t)| Column::typed(*n, *t)).collect()),
        rows,
    )
}

#[test]
fn derived_total_and_aggregation() {
    let t = typed(
        &[
            ("product", ColumnType::Text),
            ("price", ColumnType::Numeric),
            ("quantity", ColumnType::Numeric),
        ],
        vec![
            vec![Value::text("pen"), Value::Number(10.0), Value::Number(2.0)],
            vec![Value::text("pen"), Value::Number(20.0), Value::Number(3.0)],
        ],
    );
    let (table, grouped) = transform(t, &PipelineContext::default());

    let idx = table.schema.index_of(TOTAL_COLUMN).unwrap();
    let totals: Vec<Value> = table.column_values(idx).cloned().collect();
    assert_eq!(totals, vec![Value::Number(20.0), Value::Number(60.0)]);
    assert_eq!(
        grouped,
        vec![GroupedRow {
            group_key: Value::text("pen"),
            total_sales: 80.0,
            avg_total: 40.0,
            count_rows: 2,
        }]
    );
}

#[test]
fn without_price_and_quantity_groups_count_rows() {
    let t = typed(
        &[("region", ColumnType::Text), ("category", ColumnType::Text)],
        vec![
            vec![Value::text("north"), Value::text("tools")],
            vec![Value::text("south"), Value::text("tools")],
            vec![Value::text("south"), Value::text("toys")],
        ],
    );
    let (_, grouped) = transform(t, &PipelineContext::default());
    let summary: Vec<(String, f64)> = grouped
        .iter()
        .map(|g| (g.group_key.to_string(), g.total_sales))
        .collect();
    assert_eq!(summary, [("tools".to_string(), 2.0), ("toys".to_string(), 1.0)]);
}

#[test]
fn configured_group_key_wins() {
    let ctx = PipelineContext {
        aliases: RoleAliases {
            group_key: vec!["region".into()],
            ..RoleAliases::default()
        },
        ..PipelineContext::default()
    };
    let t = typed(
        &[("product", ColumnType::Text), ("region", ColumnType::Text)],
        vec![
            vec![Value::text("pen"), Value::text("north")],
            vec![Value::text("ink"), Value::text("north")],
        ],
    );
    let (_, grouped) = transform(t, &ctx);
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].group_key, Value::text("north"));
    assert_eq!(grouped[0].count_rows, 2);
}

#[test]
fn rollup_sorted_and_positive_only() {
    let g = |k: &str, total: f64| GroupedRow {
        group_key: Value::text(k),
        total_sales: total,
        avg_total: total,
        count_rows: 1,
    };
    let out = filter_and_sort(vec![g("b", 30.0), g("zero", 0.0), g("a", 80.0), g("neg", -1.0)]);
    let keys: Vec<String> = out.iter().map(|r| r.group_key.to_string()).collect();
    assert_eq!(keys, ["a", "b"]);
}
