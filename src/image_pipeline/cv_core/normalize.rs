use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw_array::{ElementType, RawArray, Sample};

fn normalize_typed<I: Sample, O: Sample>(
    input: &RawArray<'_>,
    output: &mut RawArray<'_>,
    input_min: f32,
    scale: f32,
) {
    let [height, width, channels] = input.dims();
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let value = input.get::<I>(y, x, c).to_f32();
                let unit = ((value - input_min) * scale).clamp(0.0, 1.0);
                output.set(y, x, c, O::from_f32(unit * O::FULL_SCALE));
            }
        }
    }
}

/// Maps `[input_min, input_max]` onto the full range of the output type.
///
/// Values are clamped to the range first, so nothing wraps: U8 lands in
/// `0..=255`, U16 in `0..=65535` (both rounded) and F32 in `[0, 1]`. Input
/// and output must have identical dimensions; element types may differ.
pub fn normalize(
    input: &RawArray<'_>,
    output: &mut RawArray<'_>,
    input_min: f32,
    input_max: f32,
) -> Result<()> {
    // Also rejects NaN bounds
    if !(input_max > input_min) {
        return Err(ConversionError::RangeInvalid {
            min: input_min,
            max: input_max,
        });
    }
    input.ensure_valid("input")?;
    output.ensure_valid("output")?;
    if input.dims() != output.dims() {
        return Err(ConversionError::ShapeMismatch(format!(
            "input {:?} does not match output {:?}",
            input.dims(),
            output.dims()
        )));
    }

    let scale = 1.0 / (input_max - input_min);

    use ElementType::*;
    match (input.element_type(), output.element_type()) {
        (U8, U8) => normalize_typed::<u8, u8>(input, output, input_min, scale),
        (U8, U16) => normalize_typed::<u8, u16>(input, output, input_min, scale),
        (U8, F32) => normalize_typed::<u8, f32>(input, output, input_min, scale),
        (U16, U8) => normalize_typed::<u16, u8>(input, output, input_min, scale),
        (U16, U16) => normalize_typed::<u16, u16>(input, output, input_min, scale),
        (U16, F32) => normalize_typed::<u16, f32>(input, output, input_min, scale),
        (F32, U8) => normalize_typed::<f32, u8>(input, output, input_min, scale),
        (F32, U16) => normalize_typed::<f32, u16>(input, output, input_min, scale),
        (F32, F32) => normalize_typed::<f32, f32>(input, output, input_min, scale),
    }
    Ok(())
}
