use crate::settings::Settings;
use eframe::egui;

/// Buffered edit state for the settings window. Values only reach the live
/// [`Settings`] (and disk) when the user hits Save.
pub struct SettingsEditor {
    api_key: String,
    api_endpoint: String,
    model: String,
    request_timeout_secs: u64,
    debug_logging: bool,
    enable_toasts: bool,
    toast_duration: f32,
}

pub enum SettingsEditorEvent {
    Open,
    Saved,
    Cancelled,
}

impl SettingsEditor {
    pub fn new(settings: &Settings) -> Self {
        Self {
            api_key: settings.api_key.clone().unwrap_or_default(),
            api_endpoint: settings.api_endpoint.clone(),
            model: settings.model.clone(),
            request_timeout_secs: settings.request_timeout_secs,
            debug_logging: settings.debug_logging,
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration,
        }
    }

    fn to_settings(&self, current: &Settings) -> Settings {
        Settings {
            api_key: if self.api_key.trim().is_empty() {
                None
            } else {
                Some(self.api_key.trim().to_string())
            },
            api_endpoint: self.api_endpoint.trim().to_string(),
            model: self.model.trim().to_string(),
            request_timeout_secs: self.request_timeout_secs.max(1),
            debug_logging: self.debug_logging,
            enable_toasts: self.enable_toasts,
            toast_duration: self.toast_duration,
            window_size: current.window_size,
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context, settings: &mut Settings, path: &str) -> SettingsEditorEvent {
        let mut event = SettingsEditorEvent::Open;
        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("settings-grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("API key");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.api_key)
                                .password(true)
                                .desired_width(220.0),
                        );
                        ui.end_row();

                        ui.label("Endpoint");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.api_endpoint).desired_width(220.0),
                        );
                        ui.end_row();

                        ui.label("Model");
                        ui.add(egui::TextEdit::singleline(&mut self.model).desired_width(220.0));
                        ui.end_row();

                        ui.label("Request timeout (s)");
                        ui.add(egui::Slider::new(&mut self.request_timeout_secs, 5..=300));
                        ui.end_row();

                        ui.label("Debug logging");
                        ui.checkbox(&mut self.debug_logging, "");
                        ui.end_row();

                        ui.label("Toasts");
                        ui.checkbox(&mut self.enable_toasts, "");
                        ui.end_row();

                        ui.label("Toast duration (s)");
                        ui.add(egui::Slider::new(&mut self.toast_duration, 1.0..=10.0));
                        ui.end_row();
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        *settings = self.to_settings(settings);
                        if let Err(e) = settings.save(path) {
                            tracing::error!("failed to save settings: {e}");
                        }
                        event = SettingsEditorEvent::Saved;
                    }
                    if ui.button("Cancel").clicked() {
                        event = SettingsEditorEvent::Cancelled;
                    }
                });
            });
        event
    }
}
