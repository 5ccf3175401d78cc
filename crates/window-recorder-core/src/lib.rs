//! Window Recorder Core Library
//!
//! Records a single on-screen window, located by title, into a Motion-JPEG
//! AVI file at a fixed 20 frames per second.
//!
//! # Example
//!
//! ```no_run
//! use window_recorder_core::{CaptureController, CoreResult};
//!
//! use std::{thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let controller = CaptureController::desktop(".");
//!
//!     let session = controller.start("Notepad")?;
//!     sleep(Duration::from_secs(5));
//!     controller.stop();
//!
//!     let report = session.blocking_wait()?;
//!     println!("Wrote {} frames to {:?}", report.frames_written, report.path);
//!     Ok(())
//! }
//! ```

mod capture;
mod controller;
mod encoder;
mod error;

pub use {
    capture::{
        CaptureBackend, CaptureRegion, Frame, PixelFormat, RgbFrame, TargetWindow, XcapBackend,
        XcapWindow,
    },
    controller::{CaptureController, SessionHandle, SessionOutcome, SessionReport},
    encoder::{
        AviPipeline, AviSinkFactory, FRAME_RATE, FourCc, OUTPUT_EXTENSION, SinkFactory, SinkSpec,
        SinkSummary, VideoSink, file_stem, reserve_output,
    },
    error::{CaptureError, Result as CoreResult},
};
