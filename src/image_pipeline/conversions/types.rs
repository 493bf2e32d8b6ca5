//! Decode configuration and output types

use std::fmt;

use crate::image_pipeline::raw::DEFAULT_METADATA_FILE_NAME;

/// Black-to-white code range of the 10-bit sensor the dumps come from.
///
/// The parsed black level is not consulted.
pub const SENSOR_INPUT_RANGE: (f32, f32) = (64.0, 1023.0);

/// Stages of a decode, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    ReadMetadata,
    ReadRaw,
    CanonicalizePattern,
    Demosaic,
    NormalizeToFloat,
    ColorCorrect,
    WhiteBalance,
    Quantize,
}

impl PipelineStage {
    /// Short identifier used for spans and timings.
    pub fn name(self) -> &'static str {
        match self {
            PipelineStage::ReadMetadata => "read_metadata",
            PipelineStage::ReadRaw => "read_raw",
            PipelineStage::CanonicalizePattern => "canonicalize_pattern",
            PipelineStage::Demosaic => "demosaic",
            PipelineStage::NormalizeToFloat => "normalize_to_float",
            PipelineStage::ColorCorrect => "color_correct",
            PipelineStage::WhiteBalance => "white_balance",
            PipelineStage::Quantize => "quantize",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            PipelineStage::ReadMetadata => "Failed to read metadata",
            PipelineStage::ReadRaw => "Failed to read RAW file",
            PipelineStage::CanonicalizePattern => "Failed to convert to bayer RGGB",
            PipelineStage::Demosaic => "Failed to convert to RGB",
            PipelineStage::NormalizeToFloat => "Failed to normalize",
            PipelineStage::ColorCorrect => "Failed to apply ccm",
            PipelineStage::WhiteBalance => "Failed to apply rgb gain",
            PipelineStage::Quantize => "Failed to normalize to u8",
        };
        f.write_str(message)
    }
}

/// Decoded 8-bit RGB image
#[derive(Debug, Clone, PartialEq)]
pub struct RgbImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Interleaved [R, G, B, R, G, B, ...], rows packed
    pub data: Vec<u8>,
}

impl RgbImage {
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }
}

/// Configuration for RAW to RGB decoding
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Sidecar file name, looked up in the raw file's directory
    pub metadata_file_name: String,
    /// Code range mapped onto [0, 1] when converting to float
    pub input_range: (f32, f32),
    /// Whether to check declared dimensions against `max_dimension`
    pub validate_dimensions: bool,
    /// Largest accepted width or height
    pub max_dimension: Option<usize>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            metadata_file_name: DEFAULT_METADATA_FILE_NAME.to_string(),
            input_range: SENSOR_INPUT_RANGE,
            validate_dimensions: true,
            max_dimension: Some(65536),
        }
    }
}

impl DecodeConfig {
    pub fn builder() -> DecodeConfigBuilder {
        DecodeConfigBuilder::default()
    }
}

/// Builder for DecodeConfig
#[derive(Default)]
pub struct DecodeConfigBuilder {
    metadata_file_name: Option<String>,
    input_range: Option<(f32, f32)>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl DecodeConfigBuilder {
    pub fn metadata_file_name(mut self, name: impl Into<String>) -> Self {
        self.metadata_file_name = Some(name.into());
        self
    }

    pub fn input_range(mut self, min: f32, max: f32) -> Self {
        self.input_range = Some((min, max));
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> DecodeConfig {
        let default = DecodeConfig::default();
        DecodeConfig {
            metadata_file_name: self.metadata_file_name.unwrap_or(default.metadata_file_name),
            input_range: self.input_range.unwrap_or(default.input_range),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
