use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::RawMetadata;
use crate::image_pipeline::raw_array::RawArray;

/// Source of the single-channel U16 Bayer buffer for a capture.
pub trait RawImageReader {
    fn read_raw(&self, path: &Path, metadata: &RawMetadata) -> Result<RawArray<'static>>;
}
