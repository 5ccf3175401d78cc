use crate::{CaptureError, Frame, PixelFormat};

/// WHAT: BGRA screenshots are reordered to packed RGB
/// WHY: The encoder consumes RGB; swapped channels tint the whole video
#[test]
fn given_bgra_frame_when_converting_then_channels_reordered_and_alpha_dropped() {
    // Given: A 2x1 BGRA frame (blue pixel, red pixel)
    let frame = Frame::new(2, 1, PixelFormat::Bgra8, vec![255, 0, 0, 255, 0, 0, 255, 255]);

    // When: Converting to RGB
    let rgb = frame.into_rgb().unwrap();

    // Then: Pixels are blue then red in RGB order
    assert_eq!((rgb.width, rgb.height), (2, 1));
    assert_eq!(rgb.data, vec![0, 0, 255, 255, 0, 0]);
}

/// WHAT: RGBA screenshots keep channel order and lose alpha
/// WHY: xcap delivers RGBA; only the alpha channel must go
#[test]
fn given_rgba_frame_when_converting_then_alpha_dropped() {
    // Given: A 1x2 RGBA frame
    let frame = Frame::new(1, 2, PixelFormat::Rgba8, vec![1, 2, 3, 4, 5, 6, 7, 8]);

    // When: Converting to RGB
    let rgb = frame.into_rgb().unwrap();

    // Then: RGB triplets are preserved
    assert_eq!(rgb.data, vec![1, 2, 3, 5, 6, 7]);
}

/// WHAT: BGR frames are swapped, RGB frames pass through untouched
/// WHY: Three-channel backends must not be mangled by the alpha path
#[test]
fn given_three_channel_frames_when_converting_then_only_bgr_swapped() {
    // Given: The same bytes labelled BGR and RGB
    let bgr = Frame::new(1, 1, PixelFormat::Bgr8, vec![10, 20, 30]);
    let rgb = Frame::new(1, 1, PixelFormat::Rgb8, vec![10, 20, 30]);

    // When: Converting both
    let from_bgr = bgr.into_rgb().unwrap();
    let from_rgb = rgb.into_rgb().unwrap();

    // Then: Only the BGR buffer is reversed
    assert_eq!(from_bgr.data, vec![30, 20, 10]);
    assert_eq!(from_rgb.data, vec![10, 20, 30]);
}

/// WHAT: Truncated buffers are rejected
/// WHY: A short buffer would otherwise shift every following row in the video
#[test]
fn given_truncated_buffer_when_converting_then_capture_failed_error() {
    // Given: A 2x2 RGBA frame missing its last pixel
    let frame = Frame::new(2, 2, PixelFormat::Rgba8, vec![0; 12]);

    // When: Converting to RGB
    let result = frame.into_rgb();

    // Then: Returns CaptureFailed
    assert!(matches!(result, Err(CaptureError::CaptureFailed { .. })));
}
