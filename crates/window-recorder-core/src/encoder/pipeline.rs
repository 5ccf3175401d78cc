//! GStreamer encode pipeline writing Motion-JPEG AVI files.
//!
//! # Pipeline
//!
//! ```text
//! appsrc (RGB, fixed size, 20/1)
//!   → videoconvert
//!   → jpegenc
//!   → avimux
//!   → filesink (reserved output path)
//! ```
//!
//! Frames are timestamped from their index, so playback runs at the
//! configured rate regardless of how long each capture took.

use crate::{
    CaptureError, CoreResult, RgbFrame,
    encoder::{FourCc, SinkFactory, SinkSpec, SinkSummary, VideoSink},
};

use std::{fs, fs::File, panic::Location};

use error_location::ErrorLocation;
use gstreamer::{ClockTime, MessageType, MessageView, State, prelude::*};
use gstreamer_app::AppSrc;
use gstreamer_video::{VideoFormat, VideoInfo};
use tracing::{debug, info, instrument, warn};

/// JPEG quality for every frame.
pub(crate) const JPEG_QUALITY: u8 = 85;

/// How long `finish` waits for the muxer to write its index, in seconds.
const EOS_TIMEOUT_SECS: u64 = 10;

/// Elements every pipeline needs besides the codec's encoder.
const REQUIRED_ELEMENTS: [&str; 4] = ["appsrc", "videoconvert", "avimux", "filesink"];

/// GStreamer element and properties encoding `codec`, if supported.
pub(crate) fn encoder_for(codec: FourCc) -> Option<(&'static str, String)> {
    if codec == FourCc::MJPG {
        Some(("jpegenc", format!("quality={}", JPEG_QUALITY)))
    } else {
        None
    }
}

/// Packed RGB rows copied into a buffer whose rows are `stride` bytes apart.
///
/// GStreamer pads RGB rows to a multiple of four bytes.
pub(crate) fn copy_rows(frame: &RgbFrame, stride: usize, dst: &mut [u8]) {
    let row = frame.width as usize * 3;
    if row == 0 {
        return;
    }
    for (dst_row, src_row) in dst.chunks_mut(stride).zip(frame.data.chunks_exact(row)) {
        dst_row[..row].copy_from_slice(src_row);
    }
}

/// A running encode pipeline fed one RGB frame at a time.
pub struct AviPipeline {
    pipeline: gstreamer::Pipeline,
    appsrc: AppSrc,
    bus: gstreamer::Bus,
    info: VideoInfo,
    spec: SinkSpec,
    frames: u64,
}

impl AviPipeline {
    /// Build the pipeline for `spec` and start it.
    ///
    /// Must be called after `gstreamer::init()`.
    ///
    /// # Errors
    ///
    /// Returns `EncoderOpenFailed` if the spec is unusable, a required
    /// GStreamer element is missing, or the pipeline cannot start.
    #[track_caller]
    #[instrument(skip_all, fields(path = ?spec.path))]
    pub fn start(spec: &SinkSpec) -> CoreResult<Self> {
        let caller = Location::caller();
        let open_err = |reason: String| CaptureError::EncoderOpenFailed {
            path: spec.path.clone(),
            reason,
            location: ErrorLocation::from(caller),
        };

        if spec.width == 0 || spec.height == 0 || spec.fps == 0 {
            return Err(open_err(format!(
                "Invalid video parameters {}x{} @ {} fps",
                spec.width, spec.height, spec.fps
            )));
        }

        let (enc_name, enc_props) = encoder_for(spec.codec)
            .ok_or_else(|| open_err(format!("Unsupported codec {}", spec.codec)))?;

        if let Some(missing) = REQUIRED_ELEMENTS
            .into_iter()
            .chain([enc_name])
            .find(|name| gstreamer::ElementFactory::find(name).is_none())
        {
            return Err(open_err(format!(
                "GStreamer element '{}' is not installed",
                missing
            )));
        }

        let location = spec
            .path
            .to_str()
            .ok_or_else(|| open_err("Output path is not valid UTF-8".to_string()))?;

        let fps = i32::try_from(spec.fps).map_err(|e| open_err(e.to_string()))?;
        let info = VideoInfo::builder(VideoFormat::Rgb, spec.width, spec.height)
            .fps(gstreamer::Fraction::new(fps, 1))
            .build()
            .map_err(|e| open_err(format!("Invalid video format: {}", e)))?;
        let caps = info
            .to_caps()
            .map_err(|e| open_err(format!("Invalid video caps: {}", e)))?;

        let desc = format!(
            "appsrc name=src format=time block=true \
             ! videoconvert \
             ! {enc_name} {enc_props} \
             ! avimux \
             ! filesink name=sink sync=false"
        );
        debug!("Encoder pipeline: {}", desc);

        let pipeline = gstreamer::parse::launch(&desc)
            .map_err(|e| open_err(format!("Failed to parse encoder pipeline: {}", e)))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| open_err("Expected a pipeline".to_string()))?;

        let appsrc = pipeline
            .by_name("src")
            .and_then(|e| e.downcast::<AppSrc>().ok())
            .ok_or_else(|| open_err("Pipeline has no appsrc".to_string()))?;
        appsrc.set_caps(Some(&caps));

        let filesink = pipeline
            .by_name("sink")
            .ok_or_else(|| open_err("Pipeline has no filesink".to_string()))?;
        filesink.set_property("location", location);

        let bus = pipeline
            .bus()
            .ok_or_else(|| open_err("Pipeline has no bus".to_string()))?;

        pipeline
            .set_state(State::Playing)
            .map_err(|e| open_err(format!("Failed to start encoder pipeline: {}", e)))?;

        info!(
            codec = %spec.codec,
            encoder = enc_name,
            fps = spec.fps,
            width = spec.width,
            height = spec.height,
            "Encoder pipeline started"
        );

        Ok(Self {
            pipeline,
            appsrc,
            bus,
            info,
            spec: spec.clone(),
            frames: 0,
        })
    }

    #[track_caller]
    fn encode_failed(reason: String) -> CaptureError {
        CaptureError::EncodeFailed {
            reason,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Surface an error the pipeline posted since the last frame.
    fn check_bus(&self) -> CoreResult<()> {
        match self.bus.pop_filtered(&[MessageType::Error]) {
            Some(msg) => match msg.view() {
                MessageView::Error(err) => Err(Self::encode_failed(format!(
                    "Encoder pipeline error: {} ({:?})",
                    err.error(),
                    err.debug()
                ))),
                _ => Ok(()),
            },
            None => Ok(()),
        }
    }

    /// Send EOS and wait until the muxer has written the file trailer.
    fn drain(&self) -> CoreResult<()> {
        self.appsrc
            .end_of_stream()
            .map_err(|e| Self::encode_failed(format!("Failed to end stream: {:?}", e)))?;

        match self
            .bus
            .timed_pop_filtered(
                ClockTime::from_seconds(EOS_TIMEOUT_SECS),
                &[MessageType::Eos, MessageType::Error],
            )
        {
            Some(msg) => match msg.view() {
                MessageView::Error(err) => Err(Self::encode_failed(format!(
                    "Encoder pipeline error while finalizing: {} ({:?})",
                    err.error(),
                    err.debug()
                ))),
                _ => Ok(()),
            },
            None => Err(Self::encode_failed(format!(
                "Encoder pipeline did not finish within {}s",
                EOS_TIMEOUT_SECS
            ))),
        }
    }

    /// Presentation time of frame `index`, in nanoseconds.
    fn frame_ns(&self, index: u64) -> u64 {
        index * 1_000_000_000 / u64::from(self.spec.fps)
    }
}

impl VideoSink for AviPipeline {
    #[track_caller]
    fn write_frame(&mut self, frame: &RgbFrame) -> CoreResult<()> {
        if frame.width != self.spec.width || frame.height != self.spec.height {
            return Err(Self::encode_failed(format!(
                "Frame is {}x{}, video is {}x{}",
                frame.width, frame.height, self.spec.width, self.spec.height
            )));
        }

        self.check_bus()?;

        let stride = usize::try_from(self.info.stride()[0])
            .map_err(|e| Self::encode_failed(format!("Invalid row stride: {}", e)))?;
        let pts = self.frame_ns(self.frames);
        let duration = self.frame_ns(self.frames + 1) - pts;

        let mut buffer = gstreamer::Buffer::with_size(self.info.size())
            .map_err(|e| Self::encode_failed(format!("Failed to allocate buffer: {}", e)))?;
        {
            let buffer = buffer.make_mut();
            buffer.set_pts(ClockTime::from_nseconds(pts));
            buffer.set_duration(ClockTime::from_nseconds(duration));
            let mut map = buffer
                .map_writable()
                .map_err(|e| Self::encode_failed(format!("Failed to map buffer: {}", e)))?;
            copy_rows(frame, stride, map.as_mut_slice());
        }

        self.appsrc
            .push_buffer(buffer)
            .map_err(|e| Self::encode_failed(format!("Encoder rejected frame: {:?}", e)))?;

        self.frames += 1;

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.spec.path))]
    fn finish(self: Box<Self>) -> CoreResult<SinkSummary> {
        // avimux cannot finalize a stream that never carried a buffer.
        let drained = if self.frames == 0 {
            Ok(())
        } else {
            self.drain()
        };

        if let Err(e) = self.pipeline.set_state(State::Null) {
            warn!(error = %e, "Failed to stop encoder pipeline");
        }
        drained?;

        let bytes = fs::metadata(&self.spec.path)
            .map_err(|e| Self::encode_failed(format!("Failed to read output size: {}", e)))?
            .len();

        debug!(frames = self.frames, bytes, "Encoder pipeline finalized");

        Ok(SinkSummary {
            frames: self.frames,
            bytes,
        })
    }
}

impl Drop for AviPipeline {
    fn drop(&mut self) {
        // No-op when `finish` already stopped it.
        if let Err(e) = self.pipeline.set_state(State::Null) {
            warn!(error = %e, "Failed to stop encoder pipeline on drop");
        }
    }
}

/// [`SinkFactory`] producing [`AviPipeline`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct AviSinkFactory;

impl SinkFactory for AviSinkFactory {
    #[track_caller]
    fn open(&self, file: File, spec: &SinkSpec) -> CoreResult<Box<dyn VideoSink>> {
        gstreamer::init().map_err(|e| CaptureError::EncoderOpenFailed {
            path: spec.path.clone(),
            reason: format!("Failed to initialize GStreamer: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // filesink reopens the reserved path itself.
        drop(file);

        Ok(Box::new(AviPipeline::start(spec)?))
    }
}
