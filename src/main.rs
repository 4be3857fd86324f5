mod analysis;
mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::ExamAnalyticsApp;
use clap::Parser;
use config::Cli;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let cli = Cli::parse();
    let mut app = ExamAnalyticsApp::new(cli.analysis_config());
    if let Some(path) = &cli.file {
        app.state.load_file(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([1000.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Exam Analytics",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
