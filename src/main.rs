use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use jraw_decode::image_pipeline::{DecodeConfig, RawToRgbPipeline, StandardTiffWriter, TiffConfig, TiffWriter};
use jraw_decode::logger;

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut args = std::env::args_os().skip(1);
    let input = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("input.raw"));
    let output = args.next().map(PathBuf::from).unwrap_or_else(|| input.with_extension("tiff"));

    info!("Starting jraw_decode...");

    let pipeline = RawToRgbPipeline::new(DecodeConfig::default());
    info!("Sidecar: {}", pipeline.config().metadata_file_name);
    info!("Input range: {:?}", pipeline.config().input_range);

    let (image, timings) = match pipeline.decode_file_with_timings(&input) {
        Ok(decoded) => decoded,
        Err(e) => {
            error!("Decode failed: {}", e);
            return Err(e).with_context(|| format!("decoding {}", input.display()));
        }
    };
    timings.log_summary();

    let file = File::create(&output).with_context(|| format!("creating {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    StandardTiffWriter
        .write_rgb_tiff(&image, &mut writer, &TiffConfig::default())
        .with_context(|| format!("writing {}", output.display()))?;
    writer.flush()?;

    info!("Wrote {}x{} RGB image to {}", image.width, image.height, output.display());
    Ok(())
}
