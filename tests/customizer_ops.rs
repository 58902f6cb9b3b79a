use dash_forge::customizer::{
    add_series, change_kind, change_x_axis, remove_series, update_series_field, KindChoice,
    SeriesField,
};
use dash_forge::format::CellFormat;
use dash_forge::palette::PRESET_COLORS;
use dash_forge::schema::{
    ChartConfig, ChartKind, Column, Row, Series, TableConfig, Widget, WidgetBody,
};
use serde_json::json;

fn data_rows() -> Vec<Row> {
    ["Jan", "Feb", "Mar"]
        .iter()
        .enumerate()
        .map(|(i, month)| {
            let mut row = Row::new();
            row.insert("month".into(), json!(month));
            row.insert("sales".into(), json!(100 + i * 20));
            row.insert("cost".into(), json!(40 + i * 5));
            row
        })
        .collect()
}

fn line_widget() -> Widget {
    Widget {
        id: "w1".into(),
        title: "Revenue".into(),
        description: None,
        tab: "Overview".into(),
        data: data_rows(),
        body: WidgetBody::Chart(ChartConfig {
            kind: ChartKind::Line,
            x_axis_key: "month".into(),
            series: vec![Series {
                key: "sales".into(),
                name: "Sales".into(),
                color: Some("#3B82F6".into()),
            }],
        }),
    }
}

fn table_widget() -> Widget {
    Widget {
        id: "t1".into(),
        title: "Products".into(),
        description: None,
        tab: "Details".into(),
        data: data_rows(),
        body: WidgetBody::Table(TableConfig {
            columns: vec![Column {
                key: "month".into(),
                label: "Month".into(),
                format: CellFormat::String,
            }],
        }),
    }
}

fn chart(widget: &Widget) -> &ChartConfig {
    widget.as_chart().expect("chart widget")
}

#[test]
fn remove_never_drops_below_one_series() {
    let widget = line_widget();
    let after = remove_series(&widget, 0);
    assert_eq!(after, widget);
}

#[test]
fn add_then_remove_restores_the_series_list() {
    let widget = line_widget();
    let grown = add_series(&widget);
    assert_eq!(chart(&grown).series.len(), 2);
    let shrunk = remove_series(&grown, 1);
    assert_eq!(shrunk, widget);
    // The palette index derives from the current length, so a second add
    // reproduces the first exactly.
    assert_eq!(add_series(&shrunk), grown);
}

#[test]
fn added_series_uses_first_numeric_key_and_next_palette_color() {
    let widget = line_widget();
    let grown = add_series(&widget);
    let added = &chart(&grown).series[1];
    assert_eq!(added.key, "sales");
    assert_eq!(added.name, "sales");
    assert_eq!(added.color.as_deref(), Some(PRESET_COLORS[1]));
}

#[test]
fn palette_wraps_around() {
    let mut widget = line_widget();
    for _ in 0..7 {
        widget = add_series(&widget);
    }
    assert_eq!(chart(&widget).series.len(), 8);
    let wrapped = add_series(&widget);
    assert_eq!(
        chart(&wrapped).series[8].color.as_deref(),
        Some(PRESET_COLORS[0])
    );
}

#[test]
fn table_to_chart_synthesizes_a_series() {
    let widget = table_widget();
    let as_bar = change_kind(&widget, KindChoice::Chart(ChartKind::Bar));
    let cfg = chart(&as_bar);
    assert_eq!(cfg.kind, ChartKind::Bar);
    assert!(!cfg.series.is_empty());
    assert_eq!(cfg.series[0].key, "sales");
    assert_eq!(cfg.x_axis_key, "month");
}

#[test]
fn chart_to_chart_preserves_series_and_axis() {
    let widget = line_widget();
    let as_area = change_kind(&widget, KindChoice::Chart(ChartKind::Area));
    let cfg = chart(&as_area);
    assert_eq!(cfg.kind, ChartKind::Area);
    assert_eq!(cfg.series, chart(&widget).series);
    assert_eq!(cfg.x_axis_key, "month");
}

#[test]
fn chart_to_table_synthesizes_columns() {
    let widget = line_widget();
    let as_table = change_kind(&widget, KindChoice::Table);
    match &as_table.body {
        WidgetBody::Table(cfg) => {
            let keys: Vec<&str> = cfg.columns.iter().map(|c| c.key.as_str()).collect();
            assert_eq!(keys, vec!["month", "sales", "cost"]);
        }
        WidgetBody::Chart(_) => panic!("expected a table"),
    }
}

#[test]
fn change_x_axis_only_touches_the_axis() {
    let widget = line_widget();
    let moved = change_x_axis(&widget, "cost");
    assert_eq!(chart(&moved).x_axis_key, "cost");
    assert_eq!(chart(&moved).series, chart(&widget).series);
}

#[test]
fn series_fields_update_individually() {
    let widget = line_widget();
    let renamed = update_series_field(&widget, 0, SeriesField::Name, "Net Sales");
    assert_eq!(chart(&renamed).series[0].name, "Net Sales");

    let rekeyed = update_series_field(&widget, 0, SeriesField::Key, "cost");
    assert_eq!(chart(&rekeyed).series[0].key, "cost");

    let recolored = update_series_field(&widget, 0, SeriesField::Color, "#EC4899");
    assert_eq!(chart(&recolored).series[0].color.as_deref(), Some("#EC4899"));
}

#[test]
fn out_of_range_series_edit_is_a_noop() {
    let widget = line_widget();
    assert_eq!(
        update_series_field(&widget, 5, SeriesField::Name, "x"),
        widget
    );
    assert_eq!(remove_series(&widget, 5), widget);
}
