//! Reader for headerless 16-bit Bayer dumps.
//!
//! The capture SDK writes the sensor readout as `height * width` little-endian
//! `u16` samples with no header; everything needed to interpret them comes
//! from the sidecar metadata.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::RawMetadata;
use crate::image_pipeline::raw_array::{ElementType, RawArray};

/// Reads headerless little-endian 16-bit dumps from disk.
pub struct RawDumpReader;

impl RawDumpReader {
    /// Builds the Bayer buffer from bytes already in memory.
    ///
    /// Only the first `height * width * 2` bytes are used; trailing bytes
    /// are ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(RawArray)` - An owned `(height, width, 1)` U16 buffer tagged
    ///   with the sidecar's Bayer pattern
    /// * `Err(ConversionError::ShortRead)` - Fewer bytes than the metadata declares
    /// * `Err(ConversionError::PatternInvalid)` - Unknown pattern index
    pub fn decode_bytes(data: &[u8], metadata: &RawMetadata) -> Result<RawArray<'static>> {
        let expected = Self::expected_len(metadata)?;
        if data.len() < expected {
            return Err(ConversionError::ShortRead {
                expected,
                actual: data.len(),
            });
        }
        Self::into_array(data[..expected].to_vec(), metadata)
    }

    fn expected_len(metadata: &RawMetadata) -> Result<usize> {
        metadata
            .raw_byte_len()
            .ok_or(ConversionError::InvalidDimensions(metadata.width, metadata.height))
    }

    fn into_array(mut bytes: Vec<u8>, metadata: &RawMetadata) -> Result<RawArray<'static>> {
        let layout = metadata.bayer_layout()?;

        // Samples are stored little-endian on disk and native in buffers.
        for sample in bytes.chunks_exact_mut(2) {
            let value = u16::from_le_bytes([sample[0], sample[1]]);
            sample.copy_from_slice(&value.to_ne_bytes());
        }

        let array = RawArray::from_vec(bytes, metadata.height, metadata.width, 1, ElementType::U16, layout);
        array.ensure_valid("bayer")?;
        Ok(array)
    }
}

impl RawImageReader for RawDumpReader {
    fn read_raw(&self, path: &Path, metadata: &RawMetadata) -> Result<RawArray<'static>> {
        let expected = Self::expected_len(metadata)?;
        debug!("Reading {} bytes from {}", expected, path.display());

        let file = File::open(path)
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))?;

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(expected).map_err(|e| {
            ConversionError::AllocationFailure(format!("{expected} byte raw buffer: {e}"))
        })?;
        file.take(expected as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))?;

        if bytes.len() < expected {
            return Err(ConversionError::ShortRead {
                expected,
                actual: bytes.len(),
            });
        }

        Self::into_array(bytes, metadata)
    }
}
