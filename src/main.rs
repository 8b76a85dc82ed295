mod app;
mod color;
mod config;
mod data;
mod export;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use app::DashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load(std::env::args_os().nth(1).map(PathBuf::from))?;

    // No partial dashboard: a dataset that fails to load aborts startup.
    let dataset = match data::loader::load(&config.data_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load {}: {e}", config.data_path.display());
            return Err(e)
                .with_context(|| format!("loading dataset {}", config.data_path.display()));
        }
    };
    let state = AppState::new(Arc::new(dataset), &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "USDA Production Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
