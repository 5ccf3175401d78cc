use window_recorder_core::CaptureError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the window-recorder binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Capture subsystem error from window-recorder-core.
    #[error("Capture error: {source} {location}")]
    Capture {
        /// The underlying capture error.
        #[source]
        source: CaptureError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The GUI could not be started.
    #[error("UI error: {reason} {location}")]
    UiError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From<CaptureError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<CaptureError> for AppError {
    #[track_caller]
    fn from(source: CaptureError) -> Self {
        AppError::Capture {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl AppError {
    /// Short message for the status line, without source locations.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Capture { source, .. } => match source {
                CaptureError::WindowNotFound { .. } => "Window not found".to_string(),
                CaptureError::SessionActive { .. } => "A recording is already running".to_string(),
                CaptureError::InvalidTitle { .. } => "Enter a window title".to_string(),
                CaptureError::EncoderOpenFailed { path, reason, .. } => {
                    format!("Cannot create {}: {}", path.display(), reason)
                }
                CaptureError::BackendFailure { reason, .. }
                | CaptureError::CaptureFailed { reason, .. }
                | CaptureError::EncodeFailed { reason, .. }
                | CaptureError::WorkerSpawnFailed { reason, .. } => {
                    format!("Recording failed: {}", reason)
                }
            },
            AppError::ConfigError { reason, .. } | AppError::UiError { reason, .. } => {
                reason.clone()
            }
            AppError::IoError { source, .. } => source.to_string(),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
