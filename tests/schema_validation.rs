use dash_forge::format::CellFormat;
use dash_forge::schema::{self, ChartKind, KpiValue, ValidationError, WidgetBody};
use serde_json::{json, Value};

fn sample_payload() -> Value {
    json!({
        "dataset_title": "Quarterly Sales",
        "dataset_summary": "Revenue is trending up.",
        "kpis": [
            {
                "id": "kpi_1",
                "label": "Total Revenue",
                "value": "$4.2M",
                "subValue": "vs last quarter",
                "trend": "up",
                "trendValue": "+15%",
                "iconHint": "money"
            },
            { "id": "kpi_2", "label": "Orders", "value": 1250 }
        ],
        "widgets": [
            {
                "id": "w1",
                "tab": "Overview",
                "title": "Monthly Revenue",
                "description": "Last six months",
                "type": "area",
                "xAxisKey": "month",
                "data": [
                    { "month": "Jan", "sales": 100 },
                    { "month": "Feb", "sales": 160 }
                ],
                "series": [ { "key": "sales", "name": "Sales", "color": "#3B82F6" } ]
            },
            {
                "id": "w2",
                "tab": "Details",
                "title": "Top Products",
                "type": "table",
                "columns": [
                    { "key": "name", "label": "Product", "format": "string" },
                    { "key": "revenue", "label": "Revenue", "format": "currency" }
                ],
                "data": [ { "name": "Item A", "revenue": 5000 } ]
            }
        ],
        "insights": [
            { "title": "Growth", "description": "Up and to the right.", "type": "positive" }
        ]
    })
}

#[test]
fn well_formed_payload_round_trips() {
    let (payload, warnings) = schema::validate(&sample_payload()).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let serialized = serde_json::to_value(&payload).unwrap();
    let (again, warnings) = schema::validate(&serialized).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(payload, again);
}

#[test]
fn missing_widgets_array_is_fatal() {
    let err = schema::validate(&json!({ "dataset_title": "x" })).unwrap_err();
    assert_eq!(err, ValidationError::MissingWidgets);

    let err = schema::validate(&json!({ "widgets": "not-a-list" })).unwrap_err();
    assert_eq!(err, ValidationError::MissingWidgets);

    let err = schema::validate(&json!([1, 2, 3])).unwrap_err();
    assert_eq!(err, ValidationError::NotAnObject);
}

#[test]
fn unknown_widget_type_is_dropped_not_fatal() {
    let raw = json!({
        "widgets": [
            { "id": "w1", "type": "scatter", "title": "Nope", "data": [] },
            { "id": "w2", "type": "bar", "title": "Ok", "data": [], "series": [] }
        ]
    });
    let (payload, warnings) = schema::validate(&raw).unwrap();
    assert_eq!(payload.widgets.len(), 1);
    assert_eq!(payload.widgets[0].id, "w2");
    assert!(warnings.iter().any(|w| w.contains("scatter")));
}

#[test]
fn chart_without_series_gets_an_empty_list() {
    let raw = json!({
        "widgets": [ { "id": "w1", "type": "line", "title": "t", "data": [ { "name": "a", "v": 1 } ] } ]
    });
    let (payload, _) = schema::validate(&raw).unwrap();
    match &payload.widgets[0].body {
        WidgetBody::Chart(cfg) => {
            assert_eq!(cfg.kind, ChartKind::Line);
            assert!(cfg.series.is_empty());
            assert_eq!(cfg.x_axis_key, "name");
        }
        WidgetBody::Table(_) => panic!("expected a chart"),
    }
}

#[test]
fn table_without_columns_infers_them_from_data() {
    let raw = json!({
        "widgets": [ {
            "id": "w1", "type": "table", "title": "t",
            "data": [ { "product": "A", "revenue": 5000 } ]
        } ]
    });
    let (payload, warnings) = schema::validate(&raw).unwrap();
    match &payload.widgets[0].body {
        WidgetBody::Table(cfg) => {
            let keys: Vec<&str> = cfg.columns.iter().map(|c| c.key.as_str()).collect();
            assert_eq!(keys, vec!["product", "revenue"]);
            assert!(cfg.columns.iter().all(|c| c.format == CellFormat::String));
        }
        WidgetBody::Chart(_) => panic!("expected a table"),
    }
    assert!(warnings.iter().any(|w| w.contains("inferring")));
}

#[test]
fn duplicate_widget_ids_keep_first_occurrence() {
    let raw = json!({
        "widgets": [
            { "id": "w1", "type": "bar", "title": "first", "data": [], "series": [] },
            { "id": "w1", "type": "line", "title": "second", "data": [], "series": [] }
        ]
    });
    let (payload, warnings) = schema::validate(&raw).unwrap();
    assert_eq!(payload.widgets.len(), 1);
    assert_eq!(payload.widgets[0].title, "first");
    assert!(warnings.iter().any(|w| w.contains("duplicate")));
}

#[test]
fn widget_without_id_gets_a_positional_one() {
    let raw = json!({
        "widgets": [ { "type": "bar", "title": "t", "data": [], "series": [] } ]
    });
    let (payload, _) = schema::validate(&raw).unwrap();
    assert_eq!(payload.widgets[0].id, "w1");
}

#[test]
fn kpi_values_accept_strings_and_numbers() {
    let (payload, _) = schema::validate(&sample_payload()).unwrap();
    assert_eq!(payload.kpis[0].value, KpiValue::Text("$4.2M".into()));
    assert_eq!(payload.kpis[1].value, KpiValue::Number(1250.0));
}

#[test]
fn malformed_kpis_are_dropped_with_warnings() {
    let raw = json!({
        "kpis": [ { "id": "k1", "label": "ok", "value": "1" }, 42 ],
        "widgets": [ { "id": "w1", "type": "bar", "title": "t", "data": [], "series": [] } ]
    });
    let (payload, warnings) = schema::validate(&raw).unwrap();
    assert_eq!(payload.kpis.len(), 1);
    assert!(warnings.iter().any(|w| w.contains("KPI")));
}
