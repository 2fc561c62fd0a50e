mod backend_bridge;
mod controller;
mod ui;

use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{
    theme::{ThemePreference, THEME_STORAGE_KEY},
    SolverApp,
};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = client_core::load_settings();
    let stale_policy = settings
        .as_ref()
        .map(|settings| settings.stale_policy)
        .unwrap_or_default();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Differential Equation Solver")
            .with_inner_size([760.0, 520.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Differential Equation Solver",
        options,
        Box::new(move |cc| {
            let theme = ThemePreference::load(
                cc.storage
                    .and_then(|storage| storage.get_string(THEME_STORAGE_KEY))
                    .as_deref(),
            );
            Ok(Box::new(SolverApp::new(
                cmd_tx,
                ui_rx,
                cc.egui_ctx.clone(),
                theme,
                stale_policy,
            )))
        }),
    )
}
