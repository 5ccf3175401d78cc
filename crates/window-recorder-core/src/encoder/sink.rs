use crate::{CoreResult, RgbFrame};

use std::{fmt, fs::File, path::PathBuf};

/// Fixed capture and playback rate of every recording, in frames per second.
pub const FRAME_RATE: u32 = 20;

/// Four-character code identifying a video codec inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    /// Motion JPEG: every frame is an independent JPEG image.
    pub const MJPG: FourCc = FourCc(*b"MJPG");

    /// Raw bytes as written to the container.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Parameters a video sink is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSpec {
    /// Output file path.
    pub path: PathBuf,
    /// Codec identifier.
    pub codec: FourCc,
    /// Target frame rate.
    pub fps: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

/// What a sink wrote once it has been finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSummary {
    /// Number of frames in the finalized file.
    pub frames: u64,
    /// Final file size in bytes.
    pub bytes: u64,
}

/// An open video output accepting one RGB frame at a time.
pub trait VideoSink: Send {
    /// Append a frame. Its dimensions must match the sink's spec.
    fn write_frame(&mut self, frame: &RgbFrame) -> CoreResult<()>;

    /// Flush and close the output. Consumes the sink so it cannot be finalized twice.
    fn finish(self: Box<Self>) -> CoreResult<SinkSummary>;
}

/// Opens video sinks on freshly reserved output files.
pub trait SinkFactory: Send + Sync + 'static {
    /// Wrap `file`, which was created empty at `spec.path`, in a sink.
    fn open(&self, file: File, spec: &SinkSpec) -> CoreResult<Box<dyn VideoSink>>;
}
