//! Transform library
//!
//! Stateless functions over [`RawArray`](crate::image_pipeline::raw_array::RawArray)
//! buffers: Bayer pattern remapping, demosaicing, range normalization and
//! colour correction. Every function validates its buffers up front and
//! reports failure through [`Result`](crate::image_pipeline::common::Result);
//! all element access goes through the buffer strides.

mod bayer;
mod color;
mod demosaic;
mod normalize;

#[cfg(test)]
mod tests;

pub use bayer::{bayer_rggb_to_rggb, bayer_to_bayer_rggb, rggb_to_bayer_rggb};
pub use color::{apply_ccm, apply_rgb_gain};
pub use demosaic::bayer_rggb_to_rgb;
pub use normalize::normalize;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw_array::{ColorLayout, ElementType, RawArray};

/// Checks the shape of an in-place RGB float buffer.
fn ensure_rgb_f32(rgb: &RawArray<'_>) -> Result<()> {
    rgb.ensure_valid("rgb")?;
    if rgb.layout() != ColorLayout::Rgb {
        return Err(ConversionError::PatternInvalid(format!(
            "expected RGB layout, got {:?}",
            rgb.layout()
        )));
    }
    if rgb.element_type() != ElementType::F32 || rgb.channels() != 3 {
        return Err(ConversionError::ShapeMismatch(format!(
            "expected 3-channel F32, got {}-channel {:?}",
            rgb.channels(),
            rgb.element_type()
        )));
    }
    Ok(())
}
