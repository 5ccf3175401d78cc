#[allow(clippy::module_inception)]
mod controller;
mod session;
pub(crate) mod worker;

pub use {
    controller::CaptureController,
    session::{SessionHandle, SessionOutcome, SessionReport},
};
