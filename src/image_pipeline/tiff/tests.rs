use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};

use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::conversions::RgbImage;
use crate::image_pipeline::tiff::{StandardTiffWriter, TiffCompression, TiffConfig, TiffWriter};

fn gradient(width: usize, height: usize) -> RgbImage {
    let data = (0..width * height)
        .flat_map(|i| [(i % 256) as u8, (i * 3 % 256) as u8, 255 - (i % 256) as u8])
        .collect();
    RgbImage { width, height, data }
}

fn encode(image: &RgbImage, config: &TiffConfig) -> Vec<u8> {
    let mut out = Vec::new();
    StandardTiffWriter.write_rgb_tiff(image, &mut out, config).unwrap();
    out
}

#[test]
fn test_written_tiff_decodes_to_same_pixels() {
    let image = gradient(7, 5);

    for compression in [
        TiffCompression::None,
        TiffCompression::Lzw,
        TiffCompression::DeflateFast,
        TiffCompression::DeflateBest,
    ] {
        let config = TiffConfig::builder().compression(compression).build();
        let bytes = encode(&image, &config);

        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (7, 5));
        match decoder.read_image().unwrap() {
            DecodingResult::U8(pixels) => assert_eq!(pixels, image.data, "{compression:?}"),
            _ => panic!("expected 8-bit samples for {compression:?}"),
        }
    }
}

#[test]
fn test_uncompressed_output_starts_with_tiff_header() {
    let config = TiffConfig::builder()
        .compression(TiffCompression::None)
        .predictor(None)
        .build();
    let bytes = encode(&gradient(4, 4), &config);

    assert!(bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*"));
    assert!(bytes.len() > 4 * 4 * 3);
}

#[test]
fn test_rejects_mismatched_buffer() {
    let image = RgbImage {
        width: 4,
        height: 4,
        data: vec![0; 47],
    };
    let mut out = Vec::new();

    let result = StandardTiffWriter.write_rgb_tiff(&image, &mut out, &TiffConfig::default());

    assert!(matches!(result, Err(ConversionError::ShapeMismatch(_))));
    assert!(out.is_empty());
}

#[test]
fn test_config_builder_defaults() {
    let config = TiffConfig::default();
    assert_eq!(config.compression, TiffCompression::Lzw);
    assert_eq!(config.predictor, Some(2));

    let custom = TiffConfig::builder().compression(TiffCompression::DeflateBalanced).build();
    assert_eq!(custom.compression, TiffCompression::DeflateBalanced);
    assert_eq!(custom.predictor, Some(2));
}
