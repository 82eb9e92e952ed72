use eframe::egui;

use repo_orbit::config::AppConfig;

mod app;
mod ui;

use app::OrbitApp;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!("Using API at {}", config.api.base_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Repo Orbit"),
        ..Default::default()
    };

    eframe::run_native(
        "Repo Orbit",
        options,
        Box::new(move |_cc| Ok(Box::new(OrbitApp::new(config)))),
    )
}
