use crate::{CaptureError, CoreResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// Channel layout of a captured pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit red, green, blue, alpha.
    Rgba8,
    /// 8-bit blue, green, red, alpha.
    Bgra8,
    /// 8-bit red, green, blue.
    Rgb8,
    /// 8-bit blue, green, red.
    Bgr8,
}

impl PixelFormat {
    /// Bytes used by a single pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
        }
    }
}

/// A screenshot as returned by a capture backend, in the backend's channel order.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel layout of `data`.
    pub format: PixelFormat,
    /// Tightly packed rows, top to bottom.
    pub data: Vec<u8>,
}

/// A frame in packed RGB order, the layout video sinks consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed RGB triplets, top to bottom.
    pub data: Vec<u8>,
}

impl Frame {
    /// Create a frame from a raw buffer.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            data,
        }
    }

    /// Convert the buffer to packed RGB, reordering and dropping channels as needed.
    ///
    /// # Errors
    ///
    /// Returns `CaptureFailed` if the buffer length does not match the dimensions.
    #[track_caller]
    pub fn into_rgb(self) -> CoreResult<RgbFrame> {
        let bpp = self.format.bytes_per_pixel();
        let expected = self.width as usize * self.height as usize * bpp;

        if self.data.len() != expected {
            return Err(CaptureError::CaptureFailed {
                reason: format!(
                    "Frame buffer is {} bytes, expected {} for {}x{} {:?}",
                    self.data.len(),
                    expected,
                    self.width,
                    self.height,
                    self.format
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let data = match self.format {
            PixelFormat::Rgb8 => self.data,
            PixelFormat::Bgr8 => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect(),
            PixelFormat::Rgba8 => self
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
            PixelFormat::Bgra8 => self
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect(),
        };

        Ok(RgbFrame {
            width: self.width,
            height: self.height,
            data,
        })
    }
}
