use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw_array::{ColorLayout, RawArray};

/// Remaps a single-channel Bayer buffer to RGGB order in place.
///
/// Each pattern is RGGB with its 2x2 unit shifted by one sample horizontally,
/// vertically or both, so the remap exchanges samples within every 2x2 tile.
/// The buffer is left untouched if it is already tagged RGGB.
pub fn bayer_to_bayer_rggb(bayer: &mut RawArray<'_>) -> Result<()> {
    bayer.ensure_valid("bayer")?;

    let pattern = bayer.layout();
    let Some((dy, dx)) = pattern.rggb_offset() else {
        return Err(ConversionError::PatternInvalid(format!(
            "{pattern:?} is not a Bayer pattern"
        )));
    };
    if bayer.channels() != 1 {
        return Err(ConversionError::ShapeMismatch(format!(
            "Bayer buffer must have 1 channel, got {}",
            bayer.channels()
        )));
    }
    if pattern == ColorLayout::Rggb {
        return Ok(());
    }

    let (height, width) = (bayer.height(), bayer.width());
    if height % 2 != 0 || width % 2 != 0 {
        return Err(ConversionError::PatternInvalid(format!(
            "{width}x{height} is not divisible into 2x2 tiles"
        )));
    }

    debug!(?pattern, width, height, "Remapping Bayer pattern to RGGB");

    // Swap pairs inside the tile; the mapping is its own inverse.
    let pairs: &[((usize, usize), (usize, usize))] = match (dy, dx) {
        (1, 1) => &[((0, 0), (1, 1)), ((0, 1), (1, 0))],
        (0, 1) => &[((0, 0), (0, 1)), ((1, 0), (1, 1))],
        _ => &[((0, 0), (1, 0)), ((0, 1), (1, 1))],
    };

    for ty in (0..height).step_by(2) {
        for tx in (0..width).step_by(2) {
            for &((ay, ax), (by, bx)) in pairs {
                bayer.swap_elements((ty + ay, tx + ax, 0), (ty + by, tx + bx, 0));
            }
        }
    }

    bayer.set_layout(ColorLayout::Rggb);
    Ok(())
}

fn ensure_rggb(array: &RawArray<'_>, name: &str) -> Result<()> {
    array.ensure_valid(name)?;
    if array.layout() != ColorLayout::Rggb {
        return Err(ConversionError::PatternInvalid(format!(
            "{name} must be tagged RGGB, got {:?}",
            array.layout()
        )));
    }
    Ok(())
}

/// Splits a packed RGGB mosaic `(H, W, 1)` into quadrant planes `(H/2, W/2, 4)`.
///
/// Channel order of the output is R, G (red row), G (blue row), B.
pub fn bayer_rggb_to_rggb(input: &RawArray<'_>, output: &mut RawArray<'_>) -> Result<()> {
    ensure_rggb(input, "input")?;
    output.ensure_valid("output")?;

    let [in_height, in_width, in_channels] = input.dims();
    if in_channels != 1 {
        return Err(ConversionError::ShapeMismatch(format!(
            "input must be a single-channel mosaic, got {in_channels} channels"
        )));
    }
    if in_height % 2 != 0 || in_width % 2 != 0 {
        return Err(ConversionError::PatternInvalid(format!(
            "input must have even dimensions, got {in_height}x{in_width}"
        )));
    }
    let expected = [in_height / 2, in_width / 2, 4];
    if output.dims() != expected || output.element_type() != input.element_type() {
        return Err(ConversionError::ShapeMismatch(format!(
            "output must be {:?} {:?}, got {:?} {:?}",
            expected,
            input.element_type(),
            output.dims(),
            output.element_type()
        )));
    }

    for y in 0..expected[0] {
        for x in 0..expected[1] {
            let (y2, x2) = (y * 2, x * 2);
            input.copy_element_to((y2, x2, 0), output, (y, x, 0));
            input.copy_element_to((y2, x2 + 1, 0), output, (y, x, 1));
            input.copy_element_to((y2 + 1, x2, 0), output, (y, x, 2));
            input.copy_element_to((y2 + 1, x2 + 1, 0), output, (y, x, 3));
        }
    }

    output.set_layout(ColorLayout::Rggb);
    Ok(())
}

/// Inverse of [`bayer_rggb_to_rggb`]: packs quadrant planes `(H, W, 4)` back
/// into an RGGB mosaic `(2H, 2W, 1)`.
pub fn rggb_to_bayer_rggb(input: &RawArray<'_>, output: &mut RawArray<'_>) -> Result<()> {
    ensure_rggb(input, "input")?;
    output.ensure_valid("output")?;

    let [in_height, in_width, in_channels] = input.dims();
    if in_channels != 4 {
        return Err(ConversionError::ShapeMismatch(format!(
            "input must have 4 channels, got {in_channels}"
        )));
    }
    let expected = [in_height * 2, in_width * 2, 1];
    if output.dims() != expected || output.element_type() != input.element_type() {
        return Err(ConversionError::ShapeMismatch(format!(
            "output must be {:?} {:?}, got {:?} {:?}",
            expected,
            input.element_type(),
            output.dims(),
            output.element_type()
        )));
    }

    for y in 0..in_height {
        for x in 0..in_width {
            let (y2, x2) = (y * 2, x * 2);
            input.copy_element_to((y, x, 0), output, (y2, x2, 0));
            input.copy_element_to((y, x, 1), output, (y2, x2 + 1, 0));
            input.copy_element_to((y, x, 2), output, (y2 + 1, x2, 0));
            input.copy_element_to((y, x, 3), output, (y2 + 1, x2 + 1, 0));
        }
    }

    output.set_layout(ColorLayout::Rggb);
    Ok(())
}
