//! The widget customizer panel.
//!
//! Drawn inside a widget card while that widget is the edit target. Every
//! control maps onto one pure operation from [`crate::customizer`]; the
//! panel itself keeps no state, so the widget value handed back to the
//! store is always the single source of truth.

use crate::customizer::{
    add_series, change_kind, change_x_axis, data_keys, remove_series, update_series_field,
    KindChoice, SeriesField,
};
use crate::palette;
use crate::schema::{ChartKind, Widget};
use eframe::egui::{self, RichText};

#[derive(Default)]
pub struct CustomizerResponse {
    /// Replacement widget value, when a control changed something.
    pub updated: Option<Widget>,
    pub close: bool,
}

pub fn customizer_panel(ui: &mut egui::Ui, widget: &Widget) -> CustomizerResponse {
    let mut response = CustomizerResponse::default();
    let Some(chart) = widget.as_chart() else {
        return response;
    };
    let keys = data_keys(widget);

    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(8.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("CONFIGURATION").weak().size(10.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").clicked() {
                        response.close = true;
                    }
                });
            });
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Chart type");
                let mut kind = chart.kind;
                egui::ComboBox::from_id_source(("kind", &widget.id))
                    .selected_text(kind.label())
                    .show_ui(ui, |ui| {
                        for candidate in ChartKind::ALL {
                            ui.selectable_value(&mut kind, candidate, candidate.label());
                        }
                    });
                if kind != chart.kind {
                    response.updated = Some(change_kind(widget, KindChoice::Chart(kind)));
                }

                ui.label("X axis");
                let mut axis = chart.x_axis_key.clone();
                egui::ComboBox::from_id_source(("axis", &widget.id))
                    .selected_text(axis.clone())
                    .show_ui(ui, |ui| {
                        for key in &keys {
                            ui.selectable_value(&mut axis, key.clone(), key);
                        }
                    });
                if axis != chart.x_axis_key {
                    response.updated = Some(change_x_axis(widget, &axis));
                }
            });

            ui.add_space(4.0);
            ui.label(RichText::new("Series (metrics)").weak().size(11.0));

            let removable = chart.series.len() > 1;
            for (idx, series) in chart.series.iter().enumerate() {
                ui.horizontal(|ui| {
                    let mut color = palette::series_color(series.color.as_deref(), idx);
                    if ui.color_edit_button_srgba(&mut color).changed() {
                        response.updated = Some(update_series_field(
                            widget,
                            idx,
                            SeriesField::Color,
                            &palette::to_hex(color),
                        ));
                    }

                    let mut key = series.key.clone();
                    egui::ComboBox::from_id_source(("series-key", &widget.id, idx))
                        .selected_text(key.clone())
                        .width(110.0)
                        .show_ui(ui, |ui| {
                            for candidate in &keys {
                                ui.selectable_value(&mut key, candidate.clone(), candidate);
                            }
                        });
                    if key != series.key {
                        response.updated =
                            Some(update_series_field(widget, idx, SeriesField::Key, &key));
                    }

                    let mut name = series.name.clone();
                    if ui
                        .add(egui::TextEdit::singleline(&mut name).desired_width(120.0))
                        .changed()
                    {
                        response.updated =
                            Some(update_series_field(widget, idx, SeriesField::Name, &name));
                    }

                    if ui
                        .add_enabled(removable, egui::Button::new("🗑").small())
                        .clicked()
                    {
                        response.updated = Some(remove_series(widget, idx));
                    }
                });
            }

            if ui.small_button("➕ Add metric").clicked() {
                response.updated = Some(add_series(widget));
            }
        });
    ui.add_space(6.0);
    response
}
