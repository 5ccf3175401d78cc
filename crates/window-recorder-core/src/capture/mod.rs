mod frame;
mod region;
mod source;
pub(crate) mod xcap_backend;

pub use {
    frame::{Frame, PixelFormat, RgbFrame},
    region::CaptureRegion,
    source::{CaptureBackend, TargetWindow},
    xcap_backend::{XcapBackend, XcapWindow},
};
