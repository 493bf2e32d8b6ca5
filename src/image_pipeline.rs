//! Image processing pipeline module
//!
//! This module turns raw Bayer sensor dumps into displayable RGB images, with
//! separate modules for the typed buffer, the transform library, RAW reading,
//! decode orchestration and TIFF export.

pub mod common;
pub mod conversions;
pub mod cv_core;
pub mod raw;
pub mod raw_array;
pub mod tiff;

pub use common::{ConversionError, DecodeError, Result};

pub use raw_array::{ColorLayout, ElementType, RawArray, Sample};

pub use raw::{RawDumpReader, RawImageReader, RawMetadata};

pub use conversions::{DecodeConfig, DecodeConfigBuilder, PipelineStage, PipelineTimings, RawToRgbPipeline, RgbImage};

pub use self::tiff::{StandardTiffWriter, TiffCompression, TiffConfig, TiffConfigBuilder, TiffWriter};
