use crate::{CaptureRegion, CoreResult, Frame};

/// A resolved on-screen window that can be recorded.
pub trait TargetWindow: Send {
    /// Window title as reported by the windowing system.
    fn title(&self) -> &str;

    /// Whether the window is currently minimized.
    fn is_minimized(&self) -> bool;

    /// Ask the windowing system to restore a minimized window.
    fn restore(&mut self) -> CoreResult<()>;

    /// Top-left corner and size of the window.
    fn region(&self) -> CaptureRegion;
}

/// Window lookup and screenshot services a capture session depends on.
///
/// Implementations must be shareable with the background capture worker.
pub trait CaptureBackend: Send + Sync + 'static {
    /// Window type produced by [`CaptureBackend::find_windows`].
    type Window: TargetWindow;

    /// Find windows whose title contains `title`, in windowing-system order.
    fn find_windows(&self, title: &str) -> CoreResult<Vec<Self::Window>>;

    /// Capture exactly `region` of the screen.
    fn screenshot(&self, region: CaptureRegion) -> CoreResult<Frame>;
}
