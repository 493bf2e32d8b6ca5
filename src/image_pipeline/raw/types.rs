//! RAW capture metadata types

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw_array::ColorLayout;

/// Default sensor bit width when the sidecar omits `bitwidth:`.
pub const DEFAULT_BIT_DEPTH: u32 = 10;

/// Description of one capture, parsed from its sidecar file
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetadata {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Sensor bit width
    pub bit_depth: u32,
    /// Bayer pattern code, 0..=3 for RGGB, BGGR, GRBG, GBRG
    pub bayer_pattern_index: i32,
    /// Per-quadrant black level. Parsed but not used by the decode pipeline.
    pub black_level: [f32; 4],
    /// R, G, B white-balance multipliers
    pub white_balance_gain: [f32; 3],
    /// Row-major 3x3 colour-correction matrix
    pub color_correction_matrix: [f32; 9],
}

impl Default for RawMetadata {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            bit_depth: DEFAULT_BIT_DEPTH,
            bayer_pattern_index: 0,
            black_level: [0.0; 4],
            white_balance_gain: [1.0; 3],
            color_correction_matrix: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl RawMetadata {
    /// Bytes of 16-bit single-channel samples the raw dump must provide.
    pub fn raw_byte_len(&self) -> Option<usize> {
        self.width.checked_mul(self.height)?.checked_mul(2)
    }

    /// Bayer layout named by `bayer_pattern_index`.
    pub fn bayer_layout(&self) -> Result<ColorLayout> {
        let layout = ColorLayout::try_from(self.bayer_pattern_index)?;
        if !layout.is_bayer() {
            return Err(ConversionError::PatternInvalid(format!(
                "pattern index {} is not a Bayer pattern",
                self.bayer_pattern_index
            )));
        }
        Ok(layout)
    }
}
