mod app;
mod data;
mod state;
mod ui;

use app::PredictorApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "JEE Main College Predictor",
        options,
        Box::new(|_cc| Ok(Box::new(PredictorApp::default()))),
    )
}
