//! Pipeline conversions module
//!
//! This module contains the orchestration that turns a raw Bayer dump and its
//! sidecar metadata into a displayable 8-bit RGB image.

mod raw_to_rgb;
mod timing;
pub mod types;


pub use raw_to_rgb::RawToRgbPipeline;
pub use timing::{PipelineTimings, StepTiming, Timer};
pub use types::{DecodeConfig, DecodeConfigBuilder, PipelineStage, RgbImage, SENSOR_INPUT_RANGE};
