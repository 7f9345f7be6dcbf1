mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;
mod view;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::TrendsApp;
use config::Config;
use data::registry::SeriesRegistry;
use state::AppState;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // Everything is aggregated before the window opens; bad data stops here.
    let state = match build_state(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Startup failed: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let title = config.window_title();
    let heading = title.clone();
    let result = eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(TrendsApp::new(state, heading)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("UI error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_state(config: &Config) -> Result<AppState> {
    let paths = config.dataset_paths();
    let sources = data::loader::load_sources(paths.iter().map(|(k, p)| (*k, p.as_path())))?;

    let registry = SeriesRegistry::build(sources, config.parse_mode())
        .context("aggregating annual series")?;
    let loaded: Vec<String> = registry.keys().map(|k| k.to_string()).collect();
    log::info!("Annual series ready: {}", loaded.join(", "));

    AppState::new(Arc::new(registry), config.region.clone(), config.initial)
        .context("composing initial view")
}
