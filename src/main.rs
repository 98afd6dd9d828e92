// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! boxlabel - bounding box labeling for a fixed image sequence.
//!
//! Draw, select, move, resize and delete rectangles over each image, save
//! them per image, and submit the saved set as `annotations.json`.

mod app;
mod config;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::LabelerApp;
use config::LabelerConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = LabelerConfig::from_args(&args)?;
    log::info!("Labeling {} images", config.images.len());

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("boxlabel"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "boxlabel",
        options,
        Box::new(|_cc| Ok(Box::new(LabelerApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
