//! Window Recorder: record a single on-screen window to a video file.

mod app;
mod config;
mod error;
mod recording_state;
mod status;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::RecorderApp,
    error::{AppError, Result as AppResult},
    recording_state::RecordingState,
    status::Status,
};

use crate::config::Config;

use std::panic::Location;

use eframe::egui;
use error_location::ErrorLocation;
use tracing::{error, info};
use window_recorder_core::CaptureController;

const APP_TITLE: &str = "Screen Recorder";

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("window_recorder=debug,window_recorder_core=debug")
        .init();

    if let Err(e) = run() {
        error!(error = ?e, "Window Recorder failed");
        std::process::exit(1);
    }
}

#[track_caller]
fn run() -> AppResult<()> {
    let config_path = Config::default_path()?;
    let config = Config::load_from(&config_path)?;
    let output_dir = config.prepare_output_dir()?;

    info!(output_dir = ?output_dir, "Window Recorder starting");

    let controller = CaptureController::desktop(output_dir);
    let app = RecorderApp::new(controller, config, Some(config_path));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([350.0, 400.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(APP_TITLE, options, Box::new(|_cc| Ok(Box::new(app)))).map_err(|e| {
        AppError::UiError {
            reason: format!("Failed to run recorder window: {}", e),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    info!("Window Recorder shut down");

    Ok(())
}
