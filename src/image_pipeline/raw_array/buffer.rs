//! Strided sample buffer with explicit ownership.

use std::fmt;

use tracing::warn;

use super::sample::Sample;
use super::types::{ColorLayout, ElementType};
use crate::image_pipeline::common::error::{ConversionError, Result};

enum Storage<'a> {
    /// Construction failed; every operation on the buffer must refuse to run.
    Invalid,
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

/// A `height x width x channels` array of samples with per-dimension byte
/// strides.
///
/// Owned buffers release their memory on drop; wrapped buffers borrow it and
/// leave it untouched. A buffer whose construction failed carries no storage
/// at all and reports `is_valid() == false`.
pub struct RawArray<'a> {
    storage: Storage<'a>,
    dims: [usize; 3],
    strides: [usize; 3],
    dtype: ElementType,
    layout: ColorLayout,
}

fn packed_strides(width: usize, channels: usize, dtype: ElementType) -> Option<[usize; 3]> {
    let item = dtype.size();
    let pixel = channels.checked_mul(item)?;
    let row = width.checked_mul(pixel)?;
    Some([row, pixel, item])
}

/// Number of bytes a buffer must span to hold every addressed sample.
fn addressed_extent(dims: [usize; 3], strides: [usize; 3], item: usize) -> Option<usize> {
    if dims.contains(&0) {
        return Some(0);
    }
    let mut last = item;
    for (dim, stride) in dims.iter().zip(strides) {
        last = last.checked_add((dim - 1).checked_mul(stride)?)?;
    }
    Some(last)
}

impl RawArray<'static> {
    /// Allocates a zeroed, row-major buffer that owns its memory.
    ///
    /// Returns an invalid buffer if the byte size overflows or the
    /// allocation is refused.
    pub fn allocate(
        height: usize,
        width: usize,
        channels: usize,
        dtype: ElementType,
        layout: ColorLayout,
    ) -> Self {
        let dims = [height, width, channels];
        let Some(strides) = packed_strides(width, channels, dtype) else {
            warn!(?dims, ?dtype, "Buffer size overflows usize");
            return Self::invalid(dims, [0; 3], dtype, layout);
        };
        let Some(total) = height.checked_mul(strides[0]) else {
            warn!(?dims, ?dtype, "Buffer size overflows usize");
            return Self::invalid(dims, strides, dtype, layout);
        };

        let mut data = Vec::new();
        if let Err(e) = data.try_reserve_exact(total) {
            warn!(total, "Buffer allocation refused: {}", e);
            return Self::invalid(dims, strides, dtype, layout);
        }
        data.resize(total, 0);

        Self {
            storage: Storage::Owned(data),
            dims,
            strides,
            dtype,
            layout,
        }
    }

    /// Like [`RawArray::allocate`] but reports failure as an error.
    pub fn try_allocate(
        height: usize,
        width: usize,
        channels: usize,
        dtype: ElementType,
        layout: ColorLayout,
    ) -> Result<Self> {
        let array = Self::allocate(height, width, channels, dtype, layout);
        if array.is_valid() {
            Ok(array)
        } else {
            Err(ConversionError::AllocationFailure(format!(
                "{height}x{width}x{channels} {dtype:?} buffer"
            )))
        }
    }

    /// Takes ownership of `data` as a row-major buffer.
    ///
    /// If `data` is too short for the requested shape the buffer is invalid
    /// and `data` is dropped here rather than leaked.
    pub fn from_vec(
        data: Vec<u8>,
        height: usize,
        width: usize,
        channels: usize,
        dtype: ElementType,
        layout: ColorLayout,
    ) -> Self {
        let dims = [height, width, channels];
        let strides = packed_strides(width, channels, dtype).unwrap_or([0; 3]);
        match addressed_extent(dims, strides, dtype.size()) {
            Some(needed) if strides != [0; 3] && data.len() >= needed => Self {
                storage: Storage::Owned(data),
                dims,
                strides,
                dtype,
                layout,
            },
            _ => {
                warn!(?dims, len = data.len(), "Owned memory does not fit buffer shape");
                Self::invalid(dims, strides, dtype, layout)
            }
        }
    }
}

impl<'a> RawArray<'a> {
    /// Wraps caller memory as a row-major buffer without taking ownership.
    pub fn wrap(
        data: &'a mut [u8],
        height: usize,
        width: usize,
        channels: usize,
        dtype: ElementType,
        layout: ColorLayout,
    ) -> Self {
        let strides = packed_strides(width, channels, dtype).unwrap_or([0; 3]);
        Self::wrap_strided(data, [height, width, channels], strides, dtype, layout)
    }

    /// Wraps caller memory with explicit byte strides.
    ///
    /// Strides must satisfy `element_size <= strides[2] <= strides[1] <=
    /// strides[0]` and every addressed sample must fall inside `data`,
    /// otherwise the buffer is invalid.
    pub fn wrap_strided(
        data: &'a mut [u8],
        dims: [usize; 3],
        strides: [usize; 3],
        dtype: ElementType,
        layout: ColorLayout,
    ) -> Self {
        let extent = addressed_extent(dims, strides, dtype.size());
        // An empty shape addresses nothing, so its strides are not checked.
        let ordered = extent == Some(0)
            || (dtype.size() <= strides[2] && strides[2] <= strides[1] && strides[1] <= strides[0]);
        let fits = extent.is_some_and(|n| n <= data.len());
        if !ordered || !fits {
            warn!(?dims, ?strides, len = data.len(), "Rejected wrapped memory");
            return Self::invalid(dims, strides, dtype, layout);
        }

        Self {
            storage: Storage::Borrowed(data),
            dims,
            strides,
            dtype,
            layout,
        }
    }

    fn invalid(dims: [usize; 3], strides: [usize; 3], dtype: ElementType, layout: ColorLayout) -> Self {
        Self {
            storage: Storage::Invalid,
            dims,
            strides,
            dtype,
            layout,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self.storage, Storage::Invalid)
    }

    pub fn owns_memory(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// `[height, width, channels]`
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn height(&self) -> usize {
        self.dims[0]
    }

    pub fn width(&self) -> usize {
        self.dims[1]
    }

    pub fn channels(&self) -> usize {
        self.dims[2]
    }

    /// Byte strides per dimension.
    pub fn strides(&self) -> [usize; 3] {
        self.strides
    }

    pub fn element_type(&self) -> ElementType {
        self.dtype
    }

    pub fn layout(&self) -> ColorLayout {
        self.layout
    }

    pub(crate) fn set_layout(&mut self, layout: ColorLayout) {
        self.layout = layout;
    }

    /// Backing memory, `None` for an invalid buffer.
    ///
    /// No element-level bounds information is implied; callers index through
    /// [`RawArray::offset`] and the strides.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.storage {
            Storage::Invalid => None,
            Storage::Owned(data) => Some(data.as_slice()),
            Storage::Borrowed(data) => Some(&**data),
        }
    }

    pub fn as_bytes_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.storage {
            Storage::Invalid => None,
            Storage::Owned(data) => Some(data.as_mut_slice()),
            Storage::Borrowed(data) => Some(&mut **data),
        }
    }

    /// Releases the owned backing memory, `None` for wrapped or invalid buffers.
    pub fn into_vec(self) -> Option<Vec<u8>> {
        match self.storage {
            Storage::Owned(data) => Some(data),
            _ => None,
        }
    }

    /// Byte offset of sample `(y, x, c)`.
    #[inline]
    pub fn offset(&self, y: usize, x: usize, c: usize) -> usize {
        y * self.strides[0] + x * self.strides[1] + c * self.strides[2]
    }

    /// Reads sample `(y, x, c)`.
    ///
    /// Panics on an out-of-range index or an invalid buffer; transforms
    /// validate shapes before iterating.
    #[inline]
    pub(crate) fn get<T: Sample>(&self, y: usize, x: usize, c: usize) -> T {
        let offset = self.offset(y, x, c);
        let bytes = self.as_bytes().unwrap_or_default();
        T::load(&bytes[offset..])
    }

    #[inline]
    pub(crate) fn set<T: Sample>(&mut self, y: usize, x: usize, c: usize, value: T) {
        let offset = self.offset(y, x, c);
        if let Some(bytes) = self.as_bytes_mut() {
            value.store(&mut bytes[offset..]);
        }
    }

    /// Copies the raw bytes of one element from `src` in this buffer to `dst`
    /// in `out`, whatever the element type.
    #[inline]
    pub(crate) fn copy_element_to(&self, src: (usize, usize, usize), out: &mut RawArray<'_>, dst: (usize, usize, usize)) {
        let item = self.dtype.size();
        let from = self.offset(src.0, src.1, src.2);
        let to = out.offset(dst.0, dst.1, dst.2);
        if let (Some(input), Some(output)) = (self.as_bytes(), out.as_bytes_mut()) {
            output[to..to + item].copy_from_slice(&input[from..from + item]);
        }
    }

    /// Exchanges two elements in place.
    #[inline]
    pub(crate) fn swap_elements(&mut self, a: (usize, usize, usize), b: (usize, usize, usize)) {
        let item = self.dtype.size();
        let a = self.offset(a.0, a.1, a.2);
        let b = self.offset(b.0, b.1, b.2);
        if let Some(bytes) = self.as_bytes_mut() {
            let mut tmp = [0u8; 4];
            tmp[..item].copy_from_slice(&bytes[a..a + item]);
            bytes.copy_within(b..b + item, a);
            bytes[b..b + item].copy_from_slice(&tmp[..item]);
        }
    }

    /// Fails with [`ConversionError::InvalidBuffer`] if construction failed.
    pub fn ensure_valid(&self, name: &str) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ConversionError::InvalidBuffer(format!("{name} has no backing storage")))
        }
    }
}

impl fmt::Debug for RawArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawArray")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("dtype", &self.dtype)
            .field("layout", &self.layout)
            .field("valid", &self.is_valid())
            .field("owns_memory", &self.owns_memory())
            .finish()
    }
}
