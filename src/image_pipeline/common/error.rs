use thiserror::Error;

use crate::image_pipeline::conversions::PipelineStage;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Metadata file not readable: {0}")]
    MetadataMissing(String),

    #[error("Invalid metadata: {0}")]
    MetadataInvalid(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("Invalid Bayer pattern: {0}")]
    PatternInvalid(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid input range: min={min}, max={max}")]
    RangeInvalid { min: f32, max: f32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Allocation failed: {0}")]
    AllocationFailure(String),

    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// A pipeline failure, tagged with the stage that produced it.
#[derive(Error, Debug)]
#[error("{stage}: {source}")]
pub struct DecodeError {
    pub stage: PipelineStage,
    #[source]
    pub source: ConversionError,
}

impl DecodeError {
    pub fn new(stage: PipelineStage, source: ConversionError) -> Self {
        Self { stage, source }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn kind(&self) -> &ConversionError {
        &self.source
    }
}
