//! RAW dump reading module
//!
//! This module parses the sidecar metadata describing a capture and reads the
//! raw 16-bit Bayer dump it describes into a typed buffer.

mod metadata;
mod reader;
mod raw_dump_reader;
pub mod types;


pub use metadata::DEFAULT_METADATA_FILE_NAME;
pub use reader::RawImageReader;
pub use raw_dump_reader::RawDumpReader;
pub use types::RawMetadata;
