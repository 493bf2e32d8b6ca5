//! TIFF export module
//!
//! Writes decoded RGB8 images as TIFF files with configurable compression.

mod standard_tiff_writer;
pub mod types;
mod writer;

#[cfg(test)]
mod tests;

pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{TiffCompression, TiffConfig, TiffConfigBuilder};
pub use writer::TiffWriter;
