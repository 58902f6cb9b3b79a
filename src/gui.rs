//! The three-step wizard: upload, preview, dashboard.
//!
//! All state transitions happen here as reactions to user input or to the
//! one in-flight analysis settling. The `analysis_rx` receiver doubles as
//! the concurrency guard: while it exists, no second analysis can start.

use crate::analysis::{spawn_analysis, Analyzer, AnalysisOutcome};
use crate::layout::{pack_rows, GridRow};
use crate::render;
use crate::schema::Widget;
use crate::settings::Settings;
use crate::settings_editor::{SettingsEditor, SettingsEditorEvent};
use crate::sniffer::{sniff, ColumnType, SniffReport};
use crate::store::DashboardState;
use crate::widget_editor;
use eframe::egui::{self, Color32, RichText};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Upload,
    Preview,
    Dashboard,
}

/// Accept a file as CSV when either the reported MIME type or the file name
/// suffix says so.
pub fn is_csv_file(name: &str, mime: &str) -> bool {
    mime == "text/csv" || name.to_lowercase().ends_with(".csv")
}

pub struct DashApp {
    settings: Settings,
    settings_path: String,
    step: Step,
    csv_content: String,
    file_name: String,
    report: Option<SniffReport>,
    state: Option<DashboardState>,
    analysis_rx: Option<Receiver<AnalysisOutcome>>,
    settings_editor: Option<SettingsEditor>,
    toasts: Toasts,
}

impl DashApp {
    pub fn new(settings: Settings, settings_path: impl Into<String>) -> Self {
        let toasts = Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]);
        Self {
            settings,
            settings_path: settings_path.into(),
            step: Step::Upload,
            csv_content: String::new(),
            file_name: String::new(),
            report: None,
            state: None,
            analysis_rx: None,
            settings_editor: None,
            toasts,
        }
    }

    fn toast(&mut self, kind: ToastKind, text: impl Into<String>) {
        let text = text.into();
        match kind {
            ToastKind::Error => tracing::error!("{text}"),
            ToastKind::Warning => tracing::warn!("{text}"),
            _ => tracing::info!("{text}"),
        }
        if !self.settings.enable_toasts {
            return;
        }
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default()
                .duration_in_seconds(self.settings.toast_duration as f64),
        });
    }

    // ── file intake ──────────────────────────────────────────────────────

    fn load_path(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match std::fs::read_to_string(&path) {
            Ok(content) => self.load_file(name, "", content),
            Err(e) => self.toast(ToastKind::Error, format!("Could not read {name}: {e}")),
        }
    }

    fn load_file(&mut self, name: String, mime: &str, content: String) {
        if !is_csv_file(&name, mime) {
            self.toast(ToastKind::Error, "Please choose a CSV file.");
            return;
        }
        if content.trim().is_empty() {
            self.toast(ToastKind::Error, "File appears to be empty.");
            return;
        }
        tracing::info!(file = %name, bytes = content.len(), "loaded CSV file");
        // Replace everything belonging to the previous session at once,
        // including any widget still in edit mode.
        self.report = Some(sniff(&content));
        self.csv_content = content;
        self.file_name = name;
        self.state = None;
        self.step = Step::Preview;
    }

    fn poll_dropped_files(&mut self, ctx: &egui::Context) {
        let files = ctx.input(|i| i.raw.dropped_files.clone());
        for file in files {
            if self.analysis_rx.is_some() {
                break;
            }
            if let Some(path) = file.path {
                self.load_path(path);
            } else if let Some(bytes) = file.bytes {
                let content = String::from_utf8_lossy(&bytes).to_string();
                self.load_file(file.name.clone(), &file.mime, content);
            }
        }
    }

    // ── analysis ─────────────────────────────────────────────────────────

    fn start_analysis(&mut self, ctx: &egui::Context) {
        if self.analysis_rx.is_some() {
            return;
        }
        let analyzer = Analyzer::from_settings(&self.settings);
        self.analysis_rx = Some(spawn_analysis(
            analyzer,
            self.csv_content.clone(),
            ctx.clone(),
        ));
    }

    fn poll_analysis(&mut self) {
        let polled = match self.analysis_rx.as_ref() {
            Some(rx) => rx.try_recv(),
            None => return,
        };
        match polled {
            Ok(outcome) => {
                self.analysis_rx = None;
                self.finish_analysis(outcome);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.analysis_rx = None;
                self.toast(ToastKind::Error, "Analysis worker disappeared.");
            }
        }
    }

    fn finish_analysis(&mut self, outcome: AnalysisOutcome) {
        match outcome {
            Ok((payload, warnings)) => {
                if payload.widgets.is_empty() {
                    self.toast(ToastKind::Error, "The analysis returned no widgets.");
                    return;
                }
                if !warnings.is_empty() {
                    self.toast(
                        ToastKind::Warning,
                        format!("{} item(s) could not be displayed.", warnings.len()),
                    );
                }
                self.state = Some(DashboardState::new(payload, self.file_name.clone()));
                self.step = Step::Dashboard;
            }
            Err(e) => self.toast(ToastKind::Error, format!("Analysis failed: {e}")),
        }
    }

    fn close_analysis(&mut self) {
        self.state = None;
        self.report = None;
        self.csv_content.clear();
        self.file_name.clear();
        self.step = Step::Upload;
    }

    // ── chrome ───────────────────────────────────────────────────────────

    fn header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("DashForge").strong().size(18.0));
                if self.step != Step::Dashboard && self.analysis_rx.is_none() {
                    ui.separator();
                    for (step, label) in [(Step::Upload, "1 Upload"), (Step::Preview, "2 Preview")]
                    {
                        let active = self.step == step;
                        let text = if active {
                            RichText::new(label).strong()
                        } else {
                            RichText::new(label).weak()
                        };
                        ui.label(text);
                    }
                    ui.label(RichText::new("3 Dashboard").weak());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").on_hover_text("Settings").clicked()
                        && self.settings_editor.is_none()
                    {
                        self.settings_editor = Some(SettingsEditor::new(&self.settings));
                    }
                    if self.step == Step::Dashboard && ui.button("✕ Close analysis").clicked() {
                        self.close_analysis();
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn loading_ui(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.add(egui::Spinner::new().size(48.0));
            ui.add_space(12.0);
            ui.heading("Generating dashboard…");
            ui.label(
                RichText::new(format!(
                    "Analyzing {} for insights, trends, and KPIs.",
                    self.file_name
                ))
                .weak(),
            );
        });
    }

    // ── upload step ──────────────────────────────────────────────────────

    fn upload_ui(&mut self, ui: &mut egui::Ui) {
        let mut picked: Option<PathBuf> = None;
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);
            ui.heading("AI-powered dashboard in seconds");
            ui.label(
                RichText::new(
                    "Upload raw CSV data. DashForge identifies variables, detects patterns, \
                     and generates a professional dashboard.",
                )
                .weak(),
            );
            ui.add_space(20.0);
            if ui
                .add(egui::Button::new(RichText::new("📂 Browse for CSV…").size(16.0)))
                .clicked()
            {
                picked = rfd::FileDialog::new()
                    .add_filter("CSV files", &["csv"])
                    .pick_file();
            }
            ui.add_space(8.0);
            ui.label(RichText::new("…or drop a .csv file anywhere in this window").weak());
        });
        if let Some(path) = picked {
            self.load_path(path);
        }
    }

    // ── preview step ─────────────────────────────────────────────────────

    fn preview_ui(&mut self, ui: &mut egui::Ui) {
        let Some(report) = self.report.clone() else {
            self.step = Step::Upload;
            return;
        };

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Data Preview");
                ui.label(RichText::new(&self.file_name).weak());
            });
            ui.label(RichText::new("Review the data structure before analysis.").weak());
            ui.add_space(8.0);

            ui.label(RichText::new("Variable Detection").strong());
            variable_table(ui, &report);
            ui.add_space(12.0);

            ui.label(
                RichText::new(format!(
                    "Raw Data Sample (first {} rows)",
                    report.sample_rows.len()
                ))
                .strong(),
            );
            sample_table(ui, &report);
            ui.add_space(16.0);

            ui.horizontal(|ui| {
                if ui.button("⬅ Back to Upload").clicked() {
                    self.close_analysis();
                }
                let generate = ui.add_enabled(
                    self.analysis_rx.is_none(),
                    egui::Button::new(RichText::new("▶ Generate Dashboard").strong()),
                );
                if generate.clicked() {
                    self.start_analysis(ui.ctx());
                }
            });
        });
    }

    // ── dashboard step ───────────────────────────────────────────────────

    fn dashboard_ui(&mut self, ui: &mut egui::Ui) {
        let Some(state) = self.state.as_mut() else {
            self.step = Step::Upload;
            return;
        };

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(&state.title);
            ui.horizontal(|ui| {
                ui.label(RichText::new(&state.file_name).weak().size(11.0));
                ui.label(RichText::new(&state.summary).weak());
            });
            ui.add_space(8.0);

            let tabs = state.tabs();
            let active = state.active_tab().unwrap_or_default().to_string();
            let mut selected: Option<String> = None;
            ui.horizontal_wrapped(|ui| {
                for tab in &tabs {
                    let label = format!("{} {}", render::tab_glyph(tab), tab);
                    if ui.selectable_label(*tab == active, label).clicked() {
                        selected = Some(tab.clone());
                    }
                }
            });
            if let Some(tab) = selected {
                state.set_active_tab(&tab);
            }
            ui.separator();

            render::kpi_row(ui, &state.kpis);
            ui.add_space(10.0);

            let widgets: Vec<Widget> = state.active_widgets().into_iter().cloned().collect();
            let editing = state.edit_target().map(str::to_string);

            let mut toggled: Option<String> = None;
            let mut updated: Option<Widget> = None;
            let mut close_edit = false;
            {
                let mut cell = |ui: &mut egui::Ui, widget: &Widget| {
                    let is_editing = editing.as_deref() == Some(widget.id.as_str());
                    let card = render::widget_card(ui, widget, is_editing, |ui| {
                        if is_editing {
                            let panel = widget_editor::customizer_panel(ui, widget);
                            if panel.close {
                                close_edit = true;
                            }
                            if panel.updated.is_some() {
                                updated = panel.updated;
                            }
                        }
                        render::widget_body(ui, widget);
                    });
                    if card.toggle_edit {
                        toggled = Some(widget.id.clone());
                    }
                };

                let refs: Vec<&Widget> = widgets.iter().collect();
                for row in pack_rows(&refs) {
                    match row {
                        GridRow::Full(idx) => cell(ui, refs[idx]),
                        GridRow::Halves(a, b) => {
                            ui.columns(2, |cols| {
                                cell(&mut cols[0], refs[a]);
                                if let Some(b) = b {
                                    cell(&mut cols[1], refs[b]);
                                }
                            });
                        }
                    }
                    ui.add_space(8.0);
                }
            }

            if let Some(id) = toggled {
                state.toggle_edit(&id);
            }
            if close_edit {
                state.set_edit_target(None);
            }
            if let Some(widget) = updated {
                state.update_widget(widget);
            }

            render::insight_section(ui, &state.insights);
        });
    }
}

fn type_badge(ui: &mut egui::Ui, inferred: ColumnType) {
    let color = match inferred {
        ColumnType::Numerical => Color32::from_rgb(16, 185, 129),
        ColumnType::DateTime => Color32::from_rgb(245, 158, 11),
        ColumnType::Categorical => Color32::from_gray(150),
    };
    ui.colored_label(color, inferred.to_string());
}

fn variable_table(ui: &mut egui::Ui, report: &SniffReport) {
    use egui_extras::{Column, TableBuilder};
    ui.push_id("variables", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder().at_least(120.0))
            .column(Column::exact(110.0))
            .column(Column::remainder().at_least(160.0))
            .header(22.0, |mut header| {
                for title in ["Variable Name", "Detected Type", "Sample Values"] {
                    header.col(|ui| {
                        ui.label(RichText::new(title).strong().size(11.0));
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, report.columns.len(), |mut row| {
                    let column = &report.columns[row.index()];
                    row.col(|ui| {
                        ui.label(RichText::new(&column.name).strong());
                    });
                    row.col(|ui| type_badge(ui, column.inferred));
                    row.col(|ui| {
                        ui.label(RichText::new(column.samples.join(", ")).weak());
                    });
                });
            });
    });
}

fn sample_table(ui: &mut egui::Ui, report: &SniffReport) {
    use egui_extras::{Column, TableBuilder};
    if report.headers.is_empty() {
        return;
    }
    ui.push_id("samples", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::remainder().at_least(70.0), report.headers.len())
            .header(22.0, |mut header| {
                for name in &report.headers {
                    header.col(|ui| {
                        ui.label(RichText::new(name).strong().size(11.0));
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, report.sample_rows.len(), |mut row| {
                    let cells = &report.sample_rows[row.index()];
                    for idx in 0..report.headers.len() {
                        row.col(|ui| {
                            ui.label(cells.get(idx).map(String::as_str).unwrap_or(""));
                        });
                    }
                });
            });
    });
}

impl eframe::App for DashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_analysis();
        self.poll_dropped_files(ctx);
        self.header(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.analysis_rx.is_some() {
                self.loading_ui(ui);
            } else {
                match self.step {
                    Step::Upload => self.upload_ui(ui),
                    Step::Preview => self.preview_ui(ui),
                    Step::Dashboard => self.dashboard_ui(ui),
                }
            }
        });

        if let Some(editor) = &mut self.settings_editor {
            match editor.ui(ctx, &mut self.settings, &self.settings_path) {
                SettingsEditorEvent::Saved | SettingsEditorEvent::Cancelled => {
                    self.settings_editor = None;
                }
                SettingsEditorEvent::Open => {}
            }
        }

        self.toasts.show(ctx);
    }
}
