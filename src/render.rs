//! Widget, KPI and insight rendering.
//!
//! Charts are painted directly with the egui painter from the geometry in
//! [`crate::chart`]; tables go through `egui_extras`. Rendering is a pure
//! function of the widget value plus the edit flag: nothing here keeps
//! state between frames.

use crate::chart::{
    nice_ticks, pie_slices, series_values, value_bounds, x_positions, y_to_screen, Bounds,
};
use crate::format::{abbreviate, format_value, CellFormat};
use crate::palette;
use crate::schema::{
    ChartConfig, ChartKind, IconHint, Insight, InsightKind, KpiCard, TableConfig, Trend, Widget,
    WidgetBody,
};
use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Vec2,
};

pub const CHART_HEIGHT: f32 = 260.0;
const AXIS_COLOR: Color32 = Color32::from_gray(140);
const GRID_COLOR: Color32 = Color32::from_gray(60);

pub struct WidgetCardResponse {
    pub toggle_edit: bool,
}

/// Card chrome shared by every widget: title, optional description, and the
/// customize toggle for charts. The body is drawn by [`widget_body`].
pub fn widget_card(
    ui: &mut egui::Ui,
    widget: &Widget,
    editing: bool,
    body: impl FnOnce(&mut egui::Ui),
) -> WidgetCardResponse {
    let mut toggle_edit = false;
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(&widget.title).strong().size(16.0));
                    if let Some(desc) = &widget.description {
                        ui.label(RichText::new(desc).weak().size(12.0));
                    }
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    if widget.is_chart() {
                        let button = ui
                            .selectable_label(editing, "⚙")
                            .on_hover_text("Customize chart");
                        if button.clicked() {
                            toggle_edit = true;
                        }
                    }
                });
            });
            ui.add_space(6.0);
            body(ui);
        });
    WidgetCardResponse { toggle_edit }
}

pub fn widget_body(ui: &mut egui::Ui, widget: &Widget) {
    match &widget.body {
        WidgetBody::Chart(cfg) => match cfg.kind {
            ChartKind::Pie => paint_pie(ui, widget, cfg),
            _ => paint_cartesian(ui, widget, cfg),
        },
        WidgetBody::Table(cfg) => table_body(ui, widget, cfg),
    }
}

fn empty_note(ui: &mut egui::Ui, text: &str) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(text).weak());
    });
    ui.add_space(24.0);
}

// ── cartesian charts ─────────────────────────────────────────────────────

fn paint_cartesian(ui: &mut egui::Ui, widget: &Widget, cfg: &ChartConfig) {
    if cfg.series.is_empty() {
        empty_note(ui, "No metric configured.");
        return;
    }
    if widget.data.is_empty() {
        empty_note(ui, "No data points.");
        return;
    }

    let desired = Vec2::new(ui.available_width().max(220.0), CHART_HEIGHT);
    let (rect, _) = ui.allocate_exact_size(desired, Sense::hover());
    let painter = ui.painter_at(rect);

    let plot = egui::Rect::from_min_max(
        Pos2::new(rect.left() + 52.0, rect.top() + 10.0),
        Pos2::new(rect.right() - 12.0, rect.bottom() - 26.0),
    );

    let keys: Vec<&str> = cfg.series.iter().map(|s| s.key.as_str()).collect();
    let bounds = value_bounds(&widget.data, &keys);

    draw_y_axis(&painter, plot, bounds);
    draw_x_labels(&painter, plot, widget, cfg);

    let xs = x_positions(widget.data.len(), plot.left(), plot.right());
    match cfg.kind {
        ChartKind::Bar => {
            draw_bar_groups(&painter, &xs, plot, bounds, widget, &cfg.series);
        }
        ChartKind::Composed => {
            // First series renders as bars, the rest as lines. Fixed,
            // order-dependent convention.
            draw_bar_groups(&painter, &xs, plot, bounds, widget, &cfg.series[..1]);
            for (idx, series) in cfg.series.iter().enumerate().skip(1) {
                let color = palette::series_color(series.color.as_deref(), idx);
                draw_line_series(&painter, &xs, plot, bounds, widget, &series.key, color, true);
            }
        }
        ChartKind::Area => {
            for (idx, series) in cfg.series.iter().enumerate() {
                let color = palette::series_color(series.color.as_deref(), idx);
                draw_area_fill(&painter, &xs, plot, bounds, widget, &series.key, color);
                draw_line_series(&painter, &xs, plot, bounds, widget, &series.key, color, false);
            }
        }
        _ => {
            for (idx, series) in cfg.series.iter().enumerate() {
                let color = palette::series_color(series.color.as_deref(), idx);
                draw_line_series(&painter, &xs, plot, bounds, widget, &series.key, color, true);
            }
        }
    }

    series_legend(ui, cfg);
}

fn draw_y_axis(painter: &egui::Painter, plot: egui::Rect, bounds: Bounds) {
    for tick in nice_ticks(bounds, 4) {
        let y = y_to_screen(tick, bounds, plot.top(), plot.bottom());
        painter.line_segment(
            [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
            Stroke::new(0.5, GRID_COLOR),
        );
        painter.text(
            Pos2::new(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            abbreviate(tick),
            FontId::proportional(10.0),
            AXIS_COLOR,
        );
    }
}

fn draw_x_labels(painter: &egui::Painter, plot: egui::Rect, widget: &Widget, cfg: &ChartConfig) {
    let xs = x_positions(widget.data.len(), plot.left(), plot.right());
    let step = (widget.data.len() / 8).max(1);
    for (idx, row) in widget.data.iter().enumerate().step_by(step) {
        let label = row
            .get(&cfg.x_axis_key)
            .map(crate::format::display_scalar)
            .unwrap_or_default();
        painter.text(
            Pos2::new(xs[idx], plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            label,
            FontId::proportional(10.0),
            AXIS_COLOR,
        );
    }
}

fn draw_bar_groups(
    painter: &egui::Painter,
    xs: &[f32],
    plot: egui::Rect,
    bounds: Bounds,
    widget: &Widget,
    series: &[crate::schema::Series],
) {
    if series.is_empty() || xs.is_empty() {
        return;
    }
    let slot = (plot.width() / xs.len() as f32).max(1.0);
    let group = (slot * 0.6).min(48.0 * series.len() as f32);
    let bar_w = group / series.len() as f32;
    let baseline = y_to_screen(0.0, bounds, plot.top(), plot.bottom());

    for (s_idx, s) in series.iter().enumerate() {
        let color = palette::series_color(s.color.as_deref(), s_idx);
        for (i, value) in series_values(&widget.data, &s.key).into_iter().enumerate() {
            let Some(value) = value else { continue };
            let y = y_to_screen(value, bounds, plot.top(), plot.bottom());
            let left = xs[i] - group / 2.0 + bar_w * s_idx as f32;
            let (top, bottom) = if y <= baseline { (y, baseline) } else { (baseline, y) };
            painter.rect_filled(
                egui::Rect::from_min_max(Pos2::new(left, top), Pos2::new(left + bar_w - 1.0, bottom)),
                2.0,
                color,
            );
        }
    }
}

fn draw_line_series(
    painter: &egui::Painter,
    xs: &[f32],
    plot: egui::Rect,
    bounds: Bounds,
    widget: &Widget,
    key: &str,
    color: Color32,
    dots: bool,
) {
    let points: Vec<Option<Pos2>> = series_values(&widget.data, key)
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.map(|v| Pos2::new(xs[i], y_to_screen(v, bounds, plot.top(), plot.bottom()))))
        .collect();

    for pair in points.windows(2) {
        if let [Some(a), Some(b)] = pair {
            painter.line_segment([*a, *b], Stroke::new(2.0, color));
        }
    }
    if dots {
        for point in points.into_iter().flatten() {
            painter.circle_filled(point, 2.5, color);
        }
    }
}

fn draw_area_fill(
    painter: &egui::Painter,
    xs: &[f32],
    plot: egui::Rect,
    bounds: Bounds,
    widget: &Widget,
    key: &str,
    color: Color32,
) {
    let fill = color.gamma_multiply(0.25);
    let baseline = y_to_screen(0.0f64.max(bounds.min), bounds, plot.top(), plot.bottom());
    let points: Vec<Option<Pos2>> = series_values(&widget.data, key)
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.map(|v| Pos2::new(xs[i], y_to_screen(v, bounds, plot.top(), plot.bottom()))))
        .collect();

    // One trapezoid per segment keeps every polygon convex.
    for pair in points.windows(2) {
        if let [Some(a), Some(b)] = pair {
            painter.add(Shape::convex_polygon(
                vec![
                    *a,
                    *b,
                    Pos2::new(b.x, baseline),
                    Pos2::new(a.x, baseline),
                ],
                fill,
                Stroke::NONE,
            ));
        }
    }
}

fn series_legend(ui: &mut egui::Ui, cfg: &ChartConfig) {
    ui.add_space(4.0);
    ui.horizontal_wrapped(|ui| {
        for (idx, series) in cfg.series.iter().enumerate() {
            let color = palette::series_color(series.color.as_deref(), idx);
            ui.colored_label(color, "●");
            ui.label(RichText::new(&series.name).size(11.0));
            ui.add_space(8.0);
        }
    });
}

// ── pie charts ───────────────────────────────────────────────────────────

fn paint_pie(ui: &mut egui::Ui, widget: &Widget, cfg: &ChartConfig) {
    // Pie charts plot series[0] only.
    let Some(series) = cfg.series.first() else {
        empty_note(ui, "No metric configured.");
        return;
    };
    let slices = pie_slices(&widget.data, &series.key, &cfg.x_axis_key);
    if slices.is_empty() {
        empty_note(ui, "No plottable values.");
        return;
    }

    let desired = Vec2::new(ui.available_width().max(220.0), CHART_HEIGHT);
    let (rect, _) = ui.allocate_exact_size(desired, Sense::hover());
    let painter = ui.painter_at(rect);

    let center = rect.center();
    let outer = (rect.width().min(rect.height()) / 2.0 - 24.0).max(40.0);
    let inner = outer * 0.55;
    const PAD: f32 = 0.02;
    const STEP: f32 = 0.05;

    for (idx, slice) in slices.iter().enumerate() {
        let color = palette::pie_color(idx);
        let start = slice.start_angle + PAD;
        let end = (slice.end_angle - PAD).max(start);
        let mut a = start;
        while a < end {
            let b = (a + STEP).min(end);
            painter.add(Shape::convex_polygon(
                vec![
                    ring_point(center, inner, a),
                    ring_point(center, outer, a),
                    ring_point(center, outer, b),
                    ring_point(center, inner, b),
                ],
                color,
                Stroke::NONE,
            ));
            a = b;
        }
    }

    ui.add_space(4.0);
    ui.horizontal_wrapped(|ui| {
        for (idx, slice) in slices.iter().enumerate() {
            ui.colored_label(palette::pie_color(idx), "●");
            ui.label(
                RichText::new(format!("{} ({:.0}%)", slice.label, slice.fraction * 100.0))
                    .size(11.0),
            );
            ui.add_space(8.0);
        }
    });
}

/// Point on a circle, angle measured clockwise from 12 o'clock.
fn ring_point(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    Pos2::new(
        center.x + radius * angle.sin(),
        center.y - radius * angle.cos(),
    )
}

// ── tables ───────────────────────────────────────────────────────────────

fn table_body(ui: &mut egui::Ui, widget: &Widget, cfg: &TableConfig) {
    use egui_extras::{Column, TableBuilder};

    if cfg.columns.is_empty() {
        empty_note(ui, "No columns detected.");
        return;
    }

    ui.push_id(&widget.id, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::remainder().at_least(70.0), cfg.columns.len())
            .max_scroll_height(280.0)
            .header(22.0, |mut header| {
                for column in &cfg.columns {
                    header.col(|ui| {
                        ui.label(RichText::new(column.label.to_uppercase()).strong().size(11.0));
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, widget.data.len(), |mut row| {
                    let data_row = &widget.data[row.index()];
                    for (c_idx, column) in cfg.columns.iter().enumerate() {
                        row.col(|ui| {
                            let value = data_row.get(&column.key);
                            let text = value
                                .map(|v| format_value(v, column.format))
                                .unwrap_or_default();
                            if column.format == CellFormat::Percent {
                                let positive =
                                    value.and_then(|v| v.as_f64()).is_some_and(|n| n > 0.0);
                                let color = if positive {
                                    Color32::from_rgb(16, 185, 129)
                                } else {
                                    ui.visuals().text_color()
                                };
                                ui.colored_label(color, text);
                            } else if c_idx == 0 {
                                ui.label(RichText::new(text).strong());
                            } else {
                                ui.label(text);
                            }
                        });
                    }
                });
            });
    });
}

// ── KPI cards ────────────────────────────────────────────────────────────

pub fn kpi_row(ui: &mut egui::Ui, kpis: &[KpiCard]) {
    ui.horizontal_wrapped(|ui| {
        for kpi in kpis {
            kpi_card(ui, kpi);
        }
    });
}

fn kpi_card(ui: &mut egui::Ui, kpi: &KpiCard) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.set_min_width(200.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new(icon_glyph(kpi.icon_hint)).size(18.0));
                ui.label(RichText::new(&kpi.label).weak().size(12.0));
            });
            ui.label(RichText::new(kpi.value.to_string()).strong().size(22.0));
            ui.horizontal(|ui| {
                if let Some(trend) = kpi.trend {
                    let (glyph, color) = trend_badge(trend);
                    let badge = match &kpi.trend_value {
                        Some(v) => format!("{glyph} {v}"),
                        None => glyph.to_string(),
                    };
                    ui.colored_label(color, RichText::new(badge).size(12.0));
                }
                if let Some(sub) = &kpi.sub_value {
                    ui.label(RichText::new(sub).weak().size(11.0));
                }
            });
        });
}

fn trend_badge(trend: Trend) -> (&'static str, Color32) {
    match trend {
        Trend::Up => ("▲", Color32::from_rgb(16, 185, 129)),
        Trend::Down => ("▼", Color32::from_rgb(239, 68, 68)),
        Trend::Neutral => ("–", Color32::from_gray(150)),
    }
}

fn icon_glyph(hint: Option<IconHint>) -> &'static str {
    match hint {
        Some(IconHint::Money) => "💰",
        Some(IconHint::Users) => "👥",
        Some(IconHint::Box) => "📦",
        Some(IconHint::Time) => "🕒",
        Some(IconHint::Chart) => "📊",
        Some(IconHint::Alert) => "⚠",
        Some(IconHint::Activity) | None => "⚡",
    }
}

// ── insights ─────────────────────────────────────────────────────────────

pub fn insight_section(ui: &mut egui::Ui, insights: &[Insight]) {
    if insights.is_empty() {
        return;
    }
    ui.add_space(12.0);
    ui.heading("Strategic Insights");
    ui.add_space(6.0);
    ui.columns(2, |cols| {
        for (idx, insight) in insights.iter().enumerate() {
            insight_card(&mut cols[idx % 2], insight);
        }
    });
}

fn insight_card(ui: &mut egui::Ui, insight: &Insight) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(10.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(insight_color(insight.kind), "●");
                ui.label(RichText::new(&insight.title).strong());
            });
            ui.label(RichText::new(&insight.description).weak().size(12.0));
        });
    ui.add_space(6.0);
}

fn insight_color(kind: InsightKind) -> Color32 {
    match kind {
        InsightKind::Positive => Color32::from_rgb(16, 185, 129),
        InsightKind::Negative => Color32::from_rgb(239, 68, 68),
        InsightKind::Neutral => Color32::from_rgb(59, 130, 246),
    }
}

/// Tab strip glyph chosen by name keyword, same spirit as the tabs the
/// analysis prompt suggests.
pub fn tab_glyph(name: &str) -> &'static str {
    let n = name.to_lowercase();
    if n.contains("overview") {
        "▦"
    } else if n.contains("trend") || n.contains("time") {
        "📈"
    } else if n.contains("breakdown") || n.contains("dist") {
        "◔"
    } else if n.contains("detail") || n.contains("table") {
        "☰"
    } else if n.contains("geo") || n.contains("region") {
        "🌍"
    } else {
        "▤"
    }
}
