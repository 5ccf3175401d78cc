use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Capture session errors with source location tracking.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No window matched the requested title.
    #[error("Window not found: {title:?} {location}")]
    WindowNotFound {
        /// Title that was searched for.
        title: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A session is already recording on this controller.
    #[error("A recording session is already active {location}")]
    SessionActive {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The window title was empty.
    #[error("Window title must not be empty {location}")]
    InvalidTitle {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Window enumeration or window manipulation failed.
    #[error("Window backend error: {reason} {location}")]
    BackendFailure {
        /// Description of the backend failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Acquiring or converting a screenshot failed.
    #[error("Capture failed: {reason} {location}")]
    CaptureFailed {
        /// Description of the capture failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The output file or video sink could not be created.
    #[error("Failed to open output {path:?}: {reason} {location}")]
    EncoderOpenFailed {
        /// Path of the output file.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Appending a frame or finalizing the output failed.
    #[error("Encoding failed: {reason} {location}")]
    EncodeFailed {
        /// Description of the encoding failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The background capture worker could not be launched.
    #[error("Failed to spawn capture worker: {reason} {location}")]
    WorkerSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CaptureError`].
pub type Result<T> = std::result::Result<T, CaptureError>;
