use crate::{
    CaptureBackend, CaptureRegion, XcapBackend,
    capture::xcap_backend::{crop_to_region, pick_monitor},
};

use image::{Rgba, RgbaImage};

/// WHAT: Region inside the monitor is cut out at the right offset
/// WHY: Frames must show the window, not the top-left of the screen
#[test]
fn given_region_inside_monitor_when_cropping_then_pixels_match_source() {
    // Given: A 4x4 monitor at (100, 50) with a marker pixel at local (2, 1)
    let mut screen = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    screen.put_pixel(2, 1, Rgba([200, 100, 50, 255]));
    let region = CaptureRegion::new(102, 51, 2, 2);

    // When: Cropping the region in virtual desktop coordinates
    let cropped = crop_to_region(&screen, CaptureRegion::new(100, 50, 4, 4), region);

    // Then: The marker lands at the region's origin
    assert_eq!(cropped.dimensions(), (2, 2));
    assert_eq!(cropped.get_pixel(0, 0), &Rgba([200, 100, 50, 255]));
}

/// WHAT: Parts of the region past the monitor edge are black, size preserved
/// WHY: The video has fixed dimensions; a smaller frame would abort the session
#[test]
fn given_region_overhanging_monitor_when_cropping_then_frame_keeps_region_size() {
    // Given: A white 4x4 monitor at the origin and a region hanging off its right edge
    let screen = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
    let region = CaptureRegion::new(3, 0, 3, 1);

    // When: Cropping
    let cropped = crop_to_region(&screen, CaptureRegion::new(0, 0, 4, 4), region);

    // Then: First column is from the monitor, the rest is black padding
    assert_eq!(cropped.dimensions(), (3, 1));
    assert_eq!(cropped.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    assert_eq!(cropped.get_pixel(1, 0), &Rgba([0, 0, 0, 255]));
    assert_eq!(cropped.get_pixel(2, 0), &Rgba([0, 0, 0, 255]));
}

/// WHAT: On a 2x display the crop covers the window's area and keeps its size
/// WHY: Monitor images are in physical pixels while window geometry may not be
#[test]
fn given_double_scale_monitor_when_cropping_then_window_area_scaled_to_region_size() {
    // Given: A 100x100 monitor at (100, 0) captured as a 200x200 image,
    // blue except a red square covering the window at image pixels 20..60
    let mut screen = RgbaImage::from_pixel(200, 200, Rgba([0, 0, 255, 255]));
    for y in 20..60 {
        for x in 20..60 {
            screen.put_pixel(x, y, Rgba([255, 0, 0, 255]));
        }
    }
    let monitor = CaptureRegion::new(100, 0, 100, 100);
    let region = CaptureRegion::new(110, 10, 20, 20);

    // When: Cropping
    let cropped = crop_to_region(&screen, monitor, region);

    // Then: Region-sized frame showing only the window
    assert_eq!(cropped.dimensions(), (20, 20));
    assert!(cropped.pixels().all(|p| *p == Rgba([255, 0, 0, 255])));
}

/// WHAT: A maximized window whose frame starts off-screen still maps to its monitor
/// WHY: Maximized windows report a top-left a few pixels outside every monitor
#[test]
fn given_window_origin_off_screen_when_picking_monitor_then_centre_monitor_chosen() {
    // Given: Two side-by-side monitors and a window maximized on the first
    let monitors = [
        CaptureRegion::new(0, 0, 1920, 1080),
        CaptureRegion::new(1920, 0, 1920, 1080),
    ];
    let maximized = CaptureRegion::new(-8, -8, 1936, 1056);

    // When: Picking the monitor
    let picked = pick_monitor(&monitors, maximized);

    // Then: The first monitor
    assert_eq!(picked, Some(0));
}

/// WHAT: A window straddling two monitors is captured from the one holding its centre
/// WHY: The larger part of the window is what the user sees
#[test]
fn given_window_straddling_monitors_when_picking_then_monitor_with_centre_chosen() {
    // Given: A window mostly on the second monitor
    let monitors = [
        CaptureRegion::new(0, 0, 1920, 1080),
        CaptureRegion::new(1920, 0, 1920, 1080),
    ];
    let window = CaptureRegion::new(1800, 100, 800, 600);

    // When/Then: Second monitor
    assert_eq!(pick_monitor(&monitors, window), Some(1));
}

/// WHAT: Falls back to overlap when the centre is off every monitor; None when off-screen
/// WHY: Partly visible windows are still recordable; invisible ones are an error
#[test]
fn given_centre_off_screen_when_picking_then_overlap_decides_or_none() {
    // Given: One monitor, a window hanging off its bottom edge and one fully off-screen
    let monitors = [CaptureRegion::new(0, 0, 1920, 1080)];
    let hanging = CaptureRegion::new(100, 1000, 400, 400);
    let gone = CaptureRegion::new(5000, 5000, 400, 400);

    // When/Then: Overlapping window maps to the monitor, the other to none
    assert_eq!(pick_monitor(&monitors, hanging), Some(0));
    assert_eq!(pick_monitor(&monitors, gone), None);
}

/// WHAT: A title no window carries resolves to no windows
/// WHY: The controller maps an empty lookup to WindowNotFound
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_unknown_title_when_finding_windows_then_no_matches() {
    // Given: The desktop backend
    let backend = XcapBackend::new();

    // When: Looking up a title no real window has
    let windows = backend
        .find_windows("window-recorder-no-such-window-7f3a")
        .unwrap();

    // Then: Nothing matches
    assert!(windows.is_empty());
}
