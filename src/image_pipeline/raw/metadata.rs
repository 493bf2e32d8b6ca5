//! Sidecar metadata parsing.
//!
//! The sidecar is a line-oriented dump written next to the raw file. Fields
//! are found by line prefix; `BayerInfo` and `ImageSize` lines embed their
//! values after `key:` markers inside free-form text. Anything malformed
//! keeps its default, only a missing width or height fails the parse.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::types::RawMetadata;

/// Sidecar name the capture SDK writes next to each dump.
pub const DEFAULT_METADATA_FILE_NAME: &str = "jiigan_siq_sdk_dump_metadata.txt";

/// Parses a comma-separated list, `None` if any entry is not a number.
fn parse_list(values: &str) -> Option<Vec<f32>> {
    values.split(',').map(|v| v.trim().parse::<f32>().ok()).collect()
}

/// Value following `key` up to the next comma or end of line.
fn embedded_value<T: FromStr>(line: &str, key: &str) -> Option<T> {
    let start = line.find(key)? + key.len();
    let rest = &line[start..];
    let end = rest.find(',').unwrap_or(rest.len());
    rest[..end].trim().parse().ok()
}

fn fill<const N: usize>(target: &mut [f32; N], values: Option<Vec<f32>>, field: &str, exact: bool) {
    match values {
        Some(v) if v.len() == N || (!exact && v.len() > N) => target.copy_from_slice(&v[..N]),
        _ => warn!(field, "Ignoring malformed sidecar field"),
    }
}

impl RawMetadata {
    /// Parses sidecar text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut meta = RawMetadata::default();

        for line in text.lines().map(str::trim) {
            if let Some(values) = line.strip_prefix("WbGain:") {
                fill(&mut meta.white_balance_gain, parse_list(values), "WbGain", true);
            } else if let Some(values) = line.strip_prefix("CCM:") {
                fill(&mut meta.color_correction_matrix, parse_list(values), "CCM", true);
            } else if let Some(values) = line.strip_prefix("BlackLevel:") {
                fill(&mut meta.black_level, parse_list(values), "BlackLevel", false);
            } else if line.starts_with("BayerInfo") {
                if let Some(pattern) = embedded_value(line, "pattern:") {
                    meta.bayer_pattern_index = pattern;
                }
                if let Some(bits) = embedded_value(line, "bitwidth:") {
                    meta.bit_depth = bits;
                }
            } else if line.starts_with("ImageSize") {
                if let Some(width) = embedded_value(line, "width:") {
                    meta.width = width;
                }
                if let Some(height) = embedded_value(line, "height:") {
                    meta.height = height;
                }
            }
        }

        if meta.width == 0 || meta.height == 0 {
            return Err(ConversionError::MetadataInvalid(format!(
                "image size not found (width={}, height={})",
                meta.width, meta.height
            )));
        }

        debug!(
            width = meta.width,
            height = meta.height,
            pattern = meta.bayer_pattern_index,
            bit_depth = meta.bit_depth,
            "Parsed sidecar metadata"
        );
        Ok(meta)
    }

    /// Reads and parses the sidecar file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConversionError::MetadataMissing(format!("{}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Location of the sidecar named `file_name` next to `raw_path`.
    pub fn sidecar_path<P: AsRef<Path>>(raw_path: P, file_name: &str) -> PathBuf {
        raw_path
            .as_ref()
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(file_name)
    }
}
