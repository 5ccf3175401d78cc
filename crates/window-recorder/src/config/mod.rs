#[allow(clippy::module_inception)]
mod config;
mod output_config;
mod ui_config;

pub(crate) use {config::Config, output_config::OutputConfig, ui_config::UiConfig};

use std::path::PathBuf;

/// Recordings land in the process working directory unless configured otherwise.
pub(crate) const DEFAULT_OUTPUT_DIR: &str = ".";

pub(crate) fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}
