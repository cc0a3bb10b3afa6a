use anyhow::Context;
use bikeshare_dashboard::app::DashboardApp;
use bikeshare_dashboard::config::{DashboardConfig, MIN_WINDOW_SIZE, WINDOW_SIZE};
use bikeshare_dashboard::data;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env();
    let table = data::loader::load(&config.data_path)
        .with_context(|| format!("loading dataset from {}", config.data_path.display()))?;

    match data::filter::date_bounds(&table) {
        Some((min, max)) => log::info!("Loaded {} rows spanning {min} to {max}", table.len()),
        None => log::warn!("Dataset {} has no rows", config.data_path.display()),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE),
        ..Default::default()
    };

    let source = config.data_path;
    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(table, source)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
