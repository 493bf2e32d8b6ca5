//! Element and layout descriptors for raw buffers

use crate::image_pipeline::common::error::ConversionError;

/// Storage type of a single sample.
///
/// Discriminants are the stable numeric codes used when a buffer crosses a
/// language boundary; codes from outside are checked with `TryFrom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementType {
    U8 = 0,
    U16 = 1,
    F32 = 2,
}

impl ElementType {
    /// Byte size of one sample.
    pub const fn size(self) -> usize {
        match self {
            ElementType::U8 => 1,
            ElementType::U16 => 2,
            ElementType::F32 => 4,
        }
    }
}

impl TryFrom<u32> for ElementType {
    type Error = ConversionError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ElementType::U8),
            1 => Ok(ElementType::U16),
            2 => Ok(ElementType::F32),
            other => Err(ConversionError::AllocationFailure(format!(
                "unrecognized element type code {other}"
            ))),
        }
    }
}

/// Sample arrangement tag.
///
/// Single-channel buffers carry one of the four Bayer tags, three-channel
/// buffers carry `Rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColorLayout {
    Rggb = 0,
    Bggr = 1,
    Grbg = 2,
    Gbrg = 3,
    Rgb = 4,
}

/// Colour sampled at one site of a Bayer mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerColor {
    Red,
    Green,
    Blue,
}

impl ColorLayout {
    pub const fn is_bayer(self) -> bool {
        !matches!(self, ColorLayout::Rgb)
    }

    /// Offset `(dy, dx)` of this pattern's 2x2 unit relative to RGGB.
    ///
    /// Sample `(y, x)` of this pattern holds the colour RGGB has at
    /// `(y ^ dy, x ^ dx)`.
    pub const fn rggb_offset(self) -> Option<(usize, usize)> {
        match self {
            ColorLayout::Rggb => Some((0, 0)),
            ColorLayout::Bggr => Some((1, 1)),
            ColorLayout::Grbg => Some((0, 1)),
            ColorLayout::Gbrg => Some((1, 0)),
            ColorLayout::Rgb => None,
        }
    }

    /// Colour of the mosaic site at `(y, x)`, `None` for non-Bayer layouts.
    pub fn bayer_color(self, y: usize, x: usize) -> Option<BayerColor> {
        let (dy, dx) = self.rggb_offset()?;
        let color = match ((y ^ dy) & 1, (x ^ dx) & 1) {
            (0, 0) => BayerColor::Red,
            (1, 1) => BayerColor::Blue,
            _ => BayerColor::Green,
        };
        Some(color)
    }
}

impl TryFrom<i32> for ColorLayout {
    type Error = ConversionError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ColorLayout::Rggb),
            1 => Ok(ColorLayout::Bggr),
            2 => Ok(ColorLayout::Grbg),
            3 => Ok(ColorLayout::Gbrg),
            4 => Ok(ColorLayout::Rgb),
            other => Err(ConversionError::PatternInvalid(format!(
                "unknown colour layout code {other}"
            ))),
        }
    }
}
