use std::fmt::Debug;

use super::types::ElementType;

/// A scalar type that can live inside a [`RawArray`](super::RawArray).
///
/// Samples are stored in native byte order at arbitrary byte offsets, so
/// reads and writes go through byte arrays and never require alignment.
pub trait Sample: Copy + Debug + PartialEq + 'static {
    const ELEMENT_TYPE: ElementType;

    /// Largest value of the type's display range (`1.0` for floats).
    const FULL_SCALE: f32;

    fn load(bytes: &[u8]) -> Self;

    fn store(self, bytes: &mut [u8]);

    fn to_f32(self) -> f32;

    /// Converts back from `f32`, rounding and saturating for integer types.
    fn from_f32(value: f32) -> Self;
}

macro_rules! impl_integer_sample {
    ($ty:ty, $element:expr) => {
        impl Sample for $ty {
            const ELEMENT_TYPE: ElementType = $element;
            const FULL_SCALE: f32 = <$ty>::MAX as f32;

            #[inline]
            fn load(bytes: &[u8]) -> Self {
                let mut raw = [0u8; size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..size_of::<$ty>()]);
                <$ty>::from_ne_bytes(raw)
            }

            #[inline]
            fn store(self, bytes: &mut [u8]) {
                bytes[..size_of::<$ty>()].copy_from_slice(&self.to_ne_bytes());
            }

            #[inline]
            fn to_f32(self) -> f32 {
                self as f32
            }

            #[inline]
            fn from_f32(value: f32) -> Self {
                // `as` saturates and maps NaN to zero
                value.round() as $ty
            }
        }
    };
}

impl_integer_sample!(u8, ElementType::U8);
impl_integer_sample!(u16, ElementType::U16);

impl Sample for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::F32;
    const FULL_SCALE: f32 = 1.0;

    #[inline]
    fn load(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[..4]);
        f32::from_ne_bytes(raw)
    }

    #[inline]
    fn store(self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&self.to_ne_bytes());
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }
}
