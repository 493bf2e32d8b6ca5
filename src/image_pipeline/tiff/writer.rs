use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::conversions::RgbImage;
use crate::image_pipeline::tiff::types::TiffConfig;

pub trait TiffWriter {
    fn write_rgb_tiff(&self, image: &RgbImage, output: &mut dyn Write, config: &TiffConfig) -> Result<()>;
}
