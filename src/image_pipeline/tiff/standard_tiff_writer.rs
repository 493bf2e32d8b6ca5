use std::io::{Cursor, Write};

use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::conversions::RgbImage;
use crate::image_pipeline::tiff::types::{TiffCompression, TiffConfig};
use crate::image_pipeline::tiff::writer::TiffWriter;

pub struct StandardTiffWriter;

impl TiffWriter for StandardTiffWriter {
    fn write_rgb_tiff(&self, image: &RgbImage, output: &mut dyn Write, config: &TiffConfig) -> Result<()> {
        debug!("Encoding RGB TIFF image: {}x{}", image.width, image.height);

        let expected = image.width * image.height * 3;
        if image.data.len() != expected {
            return Err(ConversionError::ShapeMismatch(format!(
                "RGB image holds {} bytes, expected {}",
                image.data.len(),
                expected
            )));
        }

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        // The encoder needs Seek, so encode into memory first.
        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(2) = config.predictor {
            encoder = encoder.with_predictor(Predictor::Horizontal);
        }

        encoder
            .write_image::<colortype::RGB8>(image.width as u32, image.height as u32, &image.data)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
