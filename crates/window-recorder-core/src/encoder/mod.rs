pub(crate) mod naming;
pub(crate) mod pipeline;
mod sink;

pub use {
    naming::{OUTPUT_EXTENSION, file_stem, reserve_output},
    pipeline::{AviPipeline, AviSinkFactory},
    sink::{FRAME_RATE, FourCc, SinkFactory, SinkSpec, SinkSummary, VideoSink},
};
