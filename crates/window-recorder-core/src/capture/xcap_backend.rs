//! Desktop capture backend built on `xcap`.
//!
//! Window geometry is snapshotted at lookup time. Screenshots capture the
//! monitor the region sits on and crop the region out of it; pixels that
//! fall outside that monitor are left black so every frame has exactly the
//! region's dimensions.

use crate::{
    CaptureError, CaptureRegion, CoreResult, Frame, PixelFormat,
    capture::{CaptureBackend, TargetWindow},
};

use std::{panic::Location, process::Command};

use error_location::ErrorLocation;
use image::{RgbaImage, imageops::{self, FilterType}};
use tracing::{debug, instrument, warn};
use xcap::{Monitor, Window};

/// Capture backend for the local desktop session.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapBackend;

impl XcapBackend {
    /// Create a backend for the current desktop session.
    pub fn new() -> Self {
        Self
    }
}

/// A window resolved through `xcap`.
#[derive(Debug, Clone)]
pub struct XcapWindow {
    id: u32,
    title: String,
    app_name: String,
    minimized: bool,
    region: CaptureRegion,
}

impl XcapWindow {
    #[track_caller]
    fn from_xcap(window: &Window) -> CoreResult<Self> {
        let caller = Location::caller();
        let backend_err = |e: xcap::XCapError| CaptureError::BackendFailure {
            reason: format!("Failed to read window properties: {}", e),
            location: ErrorLocation::from(caller),
        };

        Ok(Self {
            id: window.id().map_err(backend_err)?,
            title: window.title().map_err(backend_err)?,
            app_name: window.app_name().unwrap_or_default(),
            minimized: window.is_minimized().map_err(backend_err)?,
            region: CaptureRegion::new(
                window.x().map_err(backend_err)?,
                window.y().map_err(backend_err)?,
                window.width().map_err(backend_err)?,
                window.height().map_err(backend_err)?,
            ),
        })
    }

    /// Re-read geometry after the window manager has moved or restored the window.
    #[track_caller]
    fn refresh(&mut self) -> CoreResult<()> {
        let windows = all_windows()?;

        if let Some(current) = windows.iter().find(|w| w.id().ok() == Some(self.id)) {
            let fresh = Self::from_xcap(current)?;
            self.minimized = fresh.minimized;
            self.region = fresh.region;
        }

        Ok(())
    }
}

impl TargetWindow for XcapWindow {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_minimized(&self) -> bool {
        self.minimized
    }

    #[instrument(skip(self), fields(window_id = self.id))]
    fn restore(&mut self) -> CoreResult<()> {
        request_restore(self.id, &self.app_name)?;
        self.refresh()?;

        debug!(region = %self.region, minimized = self.minimized, "Window restored");

        Ok(())
    }

    fn region(&self) -> CaptureRegion {
        self.region
    }
}

impl CaptureBackend for XcapBackend {
    type Window = XcapWindow;

    #[track_caller]
    #[instrument(skip(self))]
    fn find_windows(&self, title: &str) -> CoreResult<Vec<XcapWindow>> {
        let mut matches = Vec::new();

        for window in all_windows()? {
            if !window.title().is_ok_and(|t| t.contains(title)) {
                continue;
            }

            match XcapWindow::from_xcap(&window) {
                Ok(info) => matches.push(info),
                Err(e) => warn!(error = %e, "Skipping window with unreadable properties"),
            }
        }

        debug!(match_count = matches.len(), "Window lookup complete");

        Ok(matches)
    }

    #[track_caller]
    fn screenshot(&self, region: CaptureRegion) -> CoreResult<Frame> {
        let caller = Location::caller();
        let capture_err = |e: xcap::XCapError| CaptureError::CaptureFailed {
            reason: e.to_string(),
            location: ErrorLocation::from(caller),
        };

        let monitors = Monitor::all().map_err(capture_err)?;
        let mut bounds = Vec::with_capacity(monitors.len());
        for monitor in &monitors {
            bounds.push(CaptureRegion::new(
                monitor.x().map_err(capture_err)?,
                monitor.y().map_err(capture_err)?,
                monitor.width().map_err(capture_err)?,
                monitor.height().map_err(capture_err)?,
            ));
        }

        let (monitor, monitor_bounds) = pick_monitor(&bounds, region)
            .and_then(|i| monitors.get(i).zip(bounds.get(i)))
            .ok_or_else(|| CaptureError::CaptureFailed {
                reason: format!("Region {} is not on any monitor", region),
                location: ErrorLocation::from(caller),
            })?;

        let screen = monitor.capture_image().map_err(capture_err)?;
        let image = crop_to_region(&screen, *monitor_bounds, region);

        Ok(Frame::new(
            image.width(),
            image.height(),
            PixelFormat::Rgba8,
            image.into_raw(),
        ))
    }
}

/// Index of the monitor to capture `region` from.
///
/// The monitor containing the region's centre wins; otherwise the one it
/// overlaps most. Window frames commonly hang a few pixels off-screen, so
/// the top-left corner alone is not reliable.
pub(crate) fn pick_monitor(monitors: &[CaptureRegion], region: CaptureRegion) -> Option<usize> {
    let centre_x = i64::from(region.x) + i64::from(region.width) / 2;
    let centre_y = i64::from(region.y) + i64::from(region.height) / 2;

    let contains_centre = |m: &CaptureRegion| {
        let (left, top) = (i64::from(m.x), i64::from(m.y));
        (left..left + i64::from(m.width)).contains(&centre_x)
            && (top..top + i64::from(m.height)).contains(&centre_y)
    };

    monitors.iter().position(contains_centre).or_else(|| {
        monitors
            .iter()
            .enumerate()
            .map(|(i, m)| (i, overlap_area(*m, region)))
            .filter(|(_, area)| *area > 0)
            .max_by_key(|(_, area)| *area)
            .map(|(i, _)| i)
    })
}

fn overlap_area(a: CaptureRegion, b: CaptureRegion) -> u64 {
    let span = |a0: i32, a_len: u32, b0: i32, b_len: u32| {
        let start = i64::from(a0).max(i64::from(b0));
        let end = (i64::from(a0) + i64::from(a_len)).min(i64::from(b0) + i64::from(b_len));
        u64::try_from(end - start).unwrap_or(0)
    };
    span(a.x, a.width, b.x, b.width) * span(a.y, a.height, b.y, b.height)
}

/// Cut `region` out of the image of a monitor with desktop bounds `monitor`,
/// padding anything off-monitor with black.
///
/// The monitor image may be larger than its desktop bounds on scaled
/// displays; the crop is taken at image resolution and resized back to the
/// region's size so every frame matches the video dimensions.
pub(crate) fn crop_to_region(
    screen: &RgbaImage,
    monitor: CaptureRegion,
    region: CaptureRegion,
) -> RgbaImage {
    let scale_x = f64::from(screen.width()) / f64::from(monitor.width.max(1));
    let scale_y = f64::from(screen.height()) / f64::from(monitor.height.max(1));

    let offset_x = ((i64::from(region.x) - i64::from(monitor.x)) as f64 * scale_x).round() as i64;
    let offset_y = ((i64::from(region.y) - i64::from(monitor.y)) as f64 * scale_y).round() as i64;
    let width = (f64::from(region.width) * scale_x).round().max(1.0) as u32;
    let height = (f64::from(region.height) * scale_y).round().max(1.0) as u32;

    let mut canvas = RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]));

    // Place the monitor image so that the region's origin lands on (0, 0).
    imageops::overlay(&mut canvas, screen, -offset_x, -offset_y);

    if (width, height) == (region.width, region.height) {
        canvas
    } else {
        imageops::resize(&canvas, region.width, region.height, FilterType::Triangle)
    }
}

#[track_caller]
fn all_windows() -> CoreResult<Vec<Window>> {
    Window::all().map_err(|e| CaptureError::BackendFailure {
        reason: format!("Failed to list windows: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn request_restore(window_id: u32, app_name: &str) -> CoreResult<()> {
    let output = restore_command(window_id, app_name)
        .ok_or_else(|| CaptureError::BackendFailure {
            reason: "Restoring minimized windows is not supported on this platform".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?
        .output()
        .map_err(|e| CaptureError::BackendFailure {
            reason: format!("Failed to run restore command: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    if !output.status.success() {
        return Err(CaptureError::BackendFailure {
            reason: format!(
                "Restore command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(())
}

#[cfg(target_os = "linux")]
fn restore_command(window_id: u32, _app_name: &str) -> Option<Command> {
    let mut cmd = Command::new("xdotool");
    cmd.args(["windowactivate", "--sync", &window_id.to_string()]);
    Some(cmd)
}

#[cfg(target_os = "macos")]
fn restore_command(_window_id: u32, app_name: &str) -> Option<Command> {
    if app_name.is_empty() {
        return None;
    }
    let mut cmd = Command::new("osascript");
    cmd.args([
        "-e",
        &format!("tell application \"{}\" to activate", app_name.replace('"', "\\\"")),
    ]);
    Some(cmd)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn restore_command(_window_id: u32, _app_name: &str) -> Option<Command> {
    None
}
