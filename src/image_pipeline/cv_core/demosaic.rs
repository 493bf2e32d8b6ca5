use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw_array::{BayerColor, ColorLayout, ElementType, RawArray, Sample};

/// Mirrors an out-of-range index back into `0..len`.
///
/// Reflecting about the edge sample (-1 -> 1, len -> len - 2) keeps the
/// colour parity of the mosaic, so a replicated neighbour always samples the
/// same colour as the missing one.
#[inline]
fn reflect(i: isize, len: usize) -> usize {
    let last = len as isize - 1;
    let i = if i < 0 {
        -i
    } else if i > last {
        2 * last - i
    } else {
        i
    };
    i.clamp(0, last.max(0)) as usize
}

struct Mosaic<'b, 'a> {
    input: &'b RawArray<'a>,
    height: usize,
    width: usize,
}

impl Mosaic<'_, '_> {
    #[inline]
    fn at<T: Sample>(&self, y: usize, x: usize, dy: isize, dx: isize) -> f32 {
        let yy = reflect(y as isize + dy, self.height);
        let xx = reflect(x as isize + dx, self.width);
        self.input.get::<T>(yy, xx, 0).to_f32()
    }

    fn mean<T: Sample>(&self, y: usize, x: usize, offsets: &[(isize, isize)]) -> f32 {
        let sum: f32 = offsets.iter().map(|&(dy, dx)| self.at::<T>(y, x, dy, dx)).sum();
        sum / offsets.len() as f32
    }
}

const CROSS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const HORIZONTAL: [(isize, isize); 2] = [(0, -1), (0, 1)];
const VERTICAL: [(isize, isize); 2] = [(-1, 0), (1, 0)];

fn demosaic_typed<T: Sample>(input: &RawArray<'_>, output: &mut RawArray<'_>, pattern: ColorLayout) {
    let mosaic = Mosaic {
        input,
        height: input.height(),
        width: input.width(),
    };

    for y in 0..mosaic.height {
        for x in 0..mosaic.width {
            let own = mosaic.at::<T>(y, x, 0, 0);
            let [r, g, b] = match pattern.bayer_color(y, x) {
                Some(BayerColor::Red) => [
                    own,
                    mosaic.mean::<T>(y, x, &CROSS),
                    mosaic.mean::<T>(y, x, &DIAGONAL),
                ],
                Some(BayerColor::Blue) => [
                    mosaic.mean::<T>(y, x, &DIAGONAL),
                    mosaic.mean::<T>(y, x, &CROSS),
                    own,
                ],
                _ => {
                    // Green sits between red and blue; which axis holds red
                    // depends on the row.
                    let red_row = pattern.bayer_color(y, x ^ 1) == Some(BayerColor::Red);
                    let (r_axis, b_axis) = if red_row {
                        (&HORIZONTAL, &VERTICAL)
                    } else {
                        (&VERTICAL, &HORIZONTAL)
                    };
                    [mosaic.mean::<T>(y, x, r_axis), own, mosaic.mean::<T>(y, x, b_axis)]
                }
            };

            output.set(y, x, 0, T::from_f32(r));
            output.set(y, x, 1, T::from_f32(g));
            output.set(y, x, 2, T::from_f32(b));
        }
    }
}

fn cfa_for(pattern: ColorLayout) -> Option<CFA> {
    match pattern {
        ColorLayout::Rggb => Some(CFA::RGGB),
        ColorLayout::Bggr => Some(CFA::BGGR),
        ColorLayout::Grbg => Some(CFA::GRBG),
        ColorLayout::Gbrg => Some(CFA::GBRG),
        ColorLayout::Rgb => None,
    }
}

fn zeroed(len: usize, what: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|e| ConversionError::AllocationFailure(format!("{len} byte {what}: {e}")))?;
    bytes.resize(len, 0);
    Ok(bytes)
}

/// Runs the `bayer` crate's linear demosaic on an 8 or 16-bit mosaic.
///
/// The crate reads a packed stream (little-endian for 16-bit) and writes a
/// packed native-endian raster, so samples are gathered from and scattered
/// back through the buffer strides on either side.
fn demosaic_linear(input: &RawArray<'_>, output: &mut RawArray<'_>, cfa: CFA) -> Result<()> {
    let (height, width) = (input.height(), input.width());
    let dtype = input.element_type();
    let item = dtype.size();
    let (bayer_depth, raster_depth) = match dtype {
        ElementType::U8 => (BayerDepth::Depth8, RasterDepth::Depth8),
        _ => (BayerDepth::Depth16LE, RasterDepth::Depth16),
    };

    let mut mosaic = zeroed(height * width * item, "packed mosaic")?;
    for y in 0..height {
        for x in 0..width {
            let at = (y * width + x) * item;
            match dtype {
                ElementType::U8 => mosaic[at] = input.get::<u8>(y, x, 0),
                _ => mosaic[at..at + 2].copy_from_slice(&input.get::<u16>(y, x, 0).to_le_bytes()),
            }
        }
    }

    let mut raster = zeroed(height * width * 3 * item, "RGB raster")?;
    {
        let mut dst = RasterMut::new(width, height, raster_depth, &mut raster);
        bayer::run_demosaic(&mut Cursor::new(&mosaic[..]), bayer_depth, cfa, Demosaic::Linear, &mut dst)
            .map_err(|e| ConversionError::ShapeMismatch(format!("{width}x{height} demosaic failed: {e:?}")))?;
    }

    for y in 0..height {
        for x in 0..width {
            for c in 0..3 {
                let at = ((y * width + x) * 3 + c) * item;
                match dtype {
                    ElementType::U8 => output.set(y, x, c, raster[at]),
                    _ => output.set(y, x, c, u16::from_ne_bytes([raster[at], raster[at + 1]])),
                }
            }
        }
    }
    Ok(())
}

/// Bilinear demosaic of a single-channel Bayer buffer into 3-channel RGB.
///
/// Each output pixel keeps the sample measured at its site and averages the
/// nearest same-colour neighbours for the two missing channels. Neighbours
/// outside the image are mirrored back inside. Output has the input's element
/// type, height and width, and is tagged RGB.
///
/// U8 and U16 mosaics go through [`bayer::run_demosaic`] in linear mode, whose
/// integer averages truncate. F32 mosaics, and mosaics narrower than one 2x2
/// tile, are interpolated here in floating point.
pub fn bayer_rggb_to_rgb(input: &RawArray<'_>, output: &mut RawArray<'_>) -> Result<()> {
    input.ensure_valid("input")?;
    output.ensure_valid("output")?;

    let pattern = input.layout();
    let Some(cfa) = cfa_for(pattern) else {
        return Err(ConversionError::PatternInvalid(format!(
            "demosaic input must carry a Bayer tag, got {pattern:?}"
        )));
    };
    if input.channels() != 1 {
        return Err(ConversionError::ShapeMismatch(format!(
            "demosaic input must have 1 channel, got {}",
            input.channels()
        )));
    }
    if output.layout() != ColorLayout::Rgb || output.channels() != 3 {
        return Err(ConversionError::ShapeMismatch(format!(
            "demosaic output must be 3-channel RGB, got {}-channel {:?}",
            output.channels(),
            output.layout()
        )));
    }
    if output.height() != input.height()
        || output.width() != input.width()
        || output.element_type() != input.element_type()
    {
        return Err(ConversionError::ShapeMismatch(format!(
            "input {:?} {:?} does not match output {:?} {:?}",
            input.dims(),
            input.element_type(),
            output.dims(),
            output.element_type()
        )));
    }

    debug!(?pattern, width = input.width(), height = input.height(), "Demosaicing");

    let tiny = input.height() < 2 || input.width() < 2;
    match input.element_type() {
        ElementType::U8 | ElementType::U16 if !tiny => demosaic_linear(input, output, cfa)?,
        ElementType::U8 => demosaic_typed::<u8>(input, output, pattern),
        ElementType::U16 => demosaic_typed::<u16>(input, output, pattern),
        ElementType::F32 => demosaic_typed::<f32>(input, output, pattern),
    }
    Ok(())
}
