use dash_forge::gui::DashApp;
use dash_forge::logging;
use dash_forge::settings::Settings;

use eframe::egui;

const SETTINGS_FILE: &str = "settings.json";

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    let _guard = logging::init(settings.debug_logging);

    let (width, height) = settings.window_size.unwrap_or((1200.0, 800.0));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "DashForge",
        native_options,
        Box::new(move |_cc| Box::new(DashApp::new(settings, SETTINGS_FILE))),
    ) {
        tracing::error!("failed to start UI: {e}");
    }
    Ok(())
}
