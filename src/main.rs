mod ui;

use std::path::PathBuf;

use clap::Parser;
use egui::Vec2;
use log::warn;
use pitwall::{TARGET_RACE_NAME, TARGET_SEASON};
use ui::DashboardApp;
use ui::config::AppConfig;

const DEFAULT_DATA_DIR: &str = "f1-data";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the timing CSV exports (races.csv,
    /// lap_times.csv, drivers.csv, constructors.csv, results.csv)
    #[arg(short, long)]
    data: Option<PathBuf>,
}

fn main() {
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let config = AppConfig::from_local_file().unwrap_or_default();
    let data_dir = cli
        .data
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    if !data_dir.is_dir() {
        warn!(
            "Data directory {:?} does not exist, pick one from the dashboard",
            data_dir
        );
    }

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options.viewport.with_inner_size(Vec2::new(1200., 850.));

    eframe::run_native(
        &format!("Pitwall — {} {}", TARGET_SEASON, TARGET_RACE_NAME),
        native_options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(data_dir, config, cc)))),
    )
    .expect("could not start app");
}
