//! Grid placement for the widget area.
//!
//! The dashboard lays widgets out on a two-column grid. Span is a pure
//! function of the widget and its tab, recomputed every frame so edits that
//! change a widget's type or tab take effect immediately.

use crate::schema::{ChartKind, Widget, WidgetBody};

/// Columns a widget occupies: 2 when it is alone in its tab or when its
/// chart kind wants the full row, 1 otherwise.
pub fn slot_span(widget: &Widget, widgets_in_tab: usize) -> u8 {
    if widgets_in_tab == 1 {
        return 2;
    }
    match &widget.body {
        WidgetBody::Chart(cfg) if matches!(cfg.kind, ChartKind::Area | ChartKind::Composed) => 2,
        _ => 1,
    }
}

/// One rendered row of the grid: either a full-width widget or up to two
/// half-width ones, referenced by index into the tab's widget list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridRow {
    Full(usize),
    Halves(usize, Option<usize>),
}

/// Pack the tab's widgets into rows, preserving order. A half-width widget
/// pairs with the next widget only when that one is also half-width.
pub fn pack_rows(widgets: &[&Widget]) -> Vec<GridRow> {
    let count = widgets.len();
    let mut rows = Vec::new();
    let mut idx = 0;
    while idx < count {
        if slot_span(widgets[idx], count) == 2 {
            rows.push(GridRow::Full(idx));
            idx += 1;
        } else if idx + 1 < count && slot_span(widgets[idx + 1], count) == 1 {
            rows.push(GridRow::Halves(idx, Some(idx + 1)));
            idx += 2;
        } else {
            rows.push(GridRow::Halves(idx, None));
            idx += 1;
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ChartConfig, TableConfig};

    fn chart(kind: ChartKind) -> Widget {
        Widget {
            id: "w".into(),
            title: String::new(),
            description: None,
            tab: "Overview".into(),
            data: Vec::new(),
            body: WidgetBody::Chart(ChartConfig {
                kind,
                x_axis_key: "name".into(),
                series: Vec::new(),
            }),
        }
    }

    fn table() -> Widget {
        Widget {
            id: "t".into(),
            title: String::new(),
            description: None,
            tab: "Overview".into(),
            data: Vec::new(),
            body: WidgetBody::Table(TableConfig { columns: Vec::new() }),
        }
    }

    #[test]
    fn lone_widget_fills_the_row() {
        assert_eq!(slot_span(&chart(ChartKind::Bar), 1), 2);
        assert_eq!(slot_span(&table(), 1), 2);
    }

    #[test]
    fn wide_kinds_fill_the_row_even_with_company() {
        assert_eq!(slot_span(&chart(ChartKind::Area), 3), 2);
        assert_eq!(slot_span(&chart(ChartKind::Composed), 3), 2);
        assert_eq!(slot_span(&chart(ChartKind::Bar), 3), 1);
        assert_eq!(slot_span(&table(), 3), 1);
    }

    #[test]
    fn packing_pairs_half_width_neighbours() {
        let a = chart(ChartKind::Bar);
        let b = chart(ChartKind::Pie);
        let c = chart(ChartKind::Area);
        let d = chart(ChartKind::Line);
        let widgets = vec![&a, &b, &c, &d];
        assert_eq!(
            pack_rows(&widgets),
            vec![
                GridRow::Halves(0, Some(1)),
                GridRow::Full(2),
                GridRow::Halves(3, None),
            ]
        );
    }
}
