//! Pure widget edit operations.
//!
//! Every operation takes the current widget by reference and returns a new
//! value for the caller to pass to `DashboardState::update_widget`. Edits
//! that would break a widget invariant (removing a chart's last series,
//! indexing past the series list) return the widget unchanged.

use crate::palette::PRESET_COLORS;
use crate::schema::{
    infer_columns, ChartConfig, ChartKind, Series, TableConfig, Widget, WidgetBody,
    DEFAULT_X_AXIS_KEY,
};
use serde_json::Value;

/// Target of a type change: one of the chart kinds, or the table variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindChoice {
    Chart(ChartKind),
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesField {
    Key,
    Name,
    Color,
}

/// Field names available in the widget's data, in row order.
pub fn data_keys(widget: &Widget) -> Vec<String> {
    widget
        .data
        .first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// The first numeric field of the first row, falling back to the first
/// field. Charts need at least one plottable key and this is the best
/// guess available.
pub fn first_numeric_key(widget: &Widget) -> Option<String> {
    let row = widget.data.first()?;
    row.iter()
        .find(|(_, v)| v.is_number())
        .map(|(k, _)| k.clone())
        .or_else(|| row.keys().next().cloned())
}

fn first_text_key(widget: &Widget) -> Option<String> {
    let row = widget.data.first()?;
    row.iter()
        .find(|(_, v)| matches!(v, Value::String(_)))
        .map(|(k, _)| k.clone())
}

/// Swap the widget's variant. Chart-to-chart keeps axis and series;
/// switching a table to a chart synthesizes one series (charts cannot
/// render without a metric); switching to a table synthesizes columns from
/// the data.
pub fn change_kind(widget: &Widget, choice: KindChoice) -> Widget {
    let mut next = widget.clone();
    next.body = match (&widget.body, choice) {
        (WidgetBody::Chart(cfg), KindChoice::Chart(kind)) => WidgetBody::Chart(ChartConfig {
            kind,
            x_axis_key: cfg.x_axis_key.clone(),
            series: cfg.series.clone(),
        }),
        (WidgetBody::Table(_), KindChoice::Chart(kind)) => {
            let series = first_numeric_key(widget)
                .map(|key| {
                    vec![Series {
                        name: key.clone(),
                        key,
                        color: Some(PRESET_COLORS[0].to_string()),
                    }]
                })
                .unwrap_or_default();
            let x_axis_key =
                first_text_key(widget).unwrap_or_else(|| DEFAULT_X_AXIS_KEY.to_string());
            WidgetBody::Chart(ChartConfig {
                kind,
                x_axis_key,
                series,
            })
        }
        (_, KindChoice::Table) => WidgetBody::Table(TableConfig {
            columns: infer_columns(&widget.data),
        }),
    };
    next
}

pub fn change_x_axis(widget: &Widget, field: &str) -> Widget {
    let mut next = widget.clone();
    if let WidgetBody::Chart(cfg) = &mut next.body {
        cfg.x_axis_key = field.to_string();
    }
    next
}

/// Append a series keyed on the first numeric field, colored with the next
/// preset palette entry. `color = PRESET_COLORS[len % len(palette)]` at
/// append time, so add/remove/add sequences are reproducible.
pub fn add_series(widget: &Widget) -> Widget {
    let mut next = widget.clone();
    if let WidgetBody::Chart(cfg) = &mut next.body {
        let Some(key) = first_numeric_key(widget) else {
            return next;
        };
        let color = PRESET_COLORS[cfg.series.len() % PRESET_COLORS.len()];
        cfg.series.push(Series {
            name: key.clone(),
            key,
            color: Some(color.to_string()),
        });
    }
    next
}

/// Remove the series at `index`. A chart always keeps at least one series,
/// so removing the last one is a no-op.
pub fn remove_series(widget: &Widget, index: usize) -> Widget {
    let mut next = widget.clone();
    if let WidgetBody::Chart(cfg) = &mut next.body {
        if cfg.series.len() > 1 && index < cfg.series.len() {
            cfg.series.remove(index);
        }
    }
    next
}

pub fn update_series_field(widget: &Widget, index: usize, field: SeriesField, value: &str) -> Widget {
    let mut next = widget.clone();
    if let WidgetBody::Chart(cfg) = &mut next.body {
        if let Some(series) = cfg.series.get_mut(index) {
            match field {
                SeriesField::Key => series.key = value.to_string(),
                SeriesField::Name => series.name = value.to_string(),
                SeriesField::Color => series.color = Some(value.to_string()),
            }
        }
    }
    next
}
