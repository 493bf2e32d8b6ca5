use super::ensure_rgb_f32;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw_array::RawArray;

/// Multiplies every pixel by a row-major 3x3 colour-correction matrix.
///
/// Results are not clamped; the following normalize does that.
pub fn apply_ccm(rgb: &mut RawArray<'_>, ccm: &[f32; 9]) -> Result<()> {
    ensure_rgb_f32(rgb)?;

    for y in 0..rgb.height() {
        for x in 0..rgb.width() {
            let px: [f32; 3] = [rgb.get(y, x, 0), rgb.get(y, x, 1), rgb.get(y, x, 2)];
            for (c, row) in ccm.chunks_exact(3).enumerate() {
                let value = row[0] * px[0] + row[1] * px[1] + row[2] * px[2];
                rgb.set(y, x, c, value);
            }
        }
    }
    Ok(())
}

/// Scales the R, G and B channels by the given white-balance gains.
pub fn apply_rgb_gain(rgb: &mut RawArray<'_>, gains: &[f32; 3]) -> Result<()> {
    ensure_rgb_f32(rgb)?;
    if gains.iter().any(|&g| !(g >= 0.0)) {
        return Err(ConversionError::InvalidParameter(format!(
            "white-balance gains must be non-negative, got {gains:?}"
        )));
    }

    for y in 0..rgb.height() {
        for x in 0..rgb.width() {
            for (c, &gain) in gains.iter().enumerate() {
                let value: f32 = rgb.get(y, x, c);
                rgb.set(y, x, c, value * gain);
            }
        }
    }
    Ok(())
}
