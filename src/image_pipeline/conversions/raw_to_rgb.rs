use std::path::Path;

use tracing::{error, info, instrument};

use crate::image_pipeline::{
    common::error::{ConversionError, DecodeError, Result},
    conversions::{DecodeConfig, PipelineStage, PipelineTimings, RgbImage, Timer},
    cv_core,
    raw::{RawDumpReader, RawImageReader, RawMetadata},
    raw_array::{ColorLayout, ElementType, RawArray},
};

/// Runs one stage inside its own span, records its duration and tags any
/// failure with the stage.
fn run_stage<T>(
    stage: PipelineStage,
    timings: &mut PipelineTimings,
    f: impl FnOnce() -> Result<T>,
) -> std::result::Result<T, DecodeError> {
    let _span = tracing::info_span!("stage", name = stage.name()).entered();
    let timer = Timer::start(stage.name());
    let result = f();
    let (name, duration) = timer.stop();
    timings.add_step(name, duration);

    result.map_err(|source| {
        error!("{}: {}", stage, source);
        DecodeError::new(stage, source)
    })
}

pub struct RawToRgbPipeline<R: RawImageReader> {
    reader: R,
    config: DecodeConfig,
}

impl RawToRgbPipeline<RawDumpReader> {
    pub fn new(config: DecodeConfig) -> Self {
        Self {
            reader: RawDumpReader,
            config,
        }
    }
}

impl<R: RawImageReader> RawToRgbPipeline<R> {
    pub fn with_custom(reader: R, config: DecodeConfig) -> Self {
        Self { reader, config }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                return Err(ConversionError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Checks metadata before anything is read or allocated for it.
    fn check_metadata(&self, metadata: &RawMetadata) -> Result<()> {
        if metadata.width == 0 || metadata.height == 0 {
            return Err(ConversionError::MetadataInvalid(format!(
                "image size must be non-zero (width={}, height={})",
                metadata.width, metadata.height
            )));
        }
        self.validate_dimensions(metadata.width, metadata.height)
    }

    fn load_metadata(&self, raw_path: &Path) -> Result<RawMetadata> {
        let sidecar = RawMetadata::sidecar_path(raw_path, &self.config.metadata_file_name);
        let metadata = RawMetadata::from_file(&sidecar)?;
        self.check_metadata(&metadata)?;
        Ok(metadata)
    }

    /// Locates and parses the sidecar that describes `raw_path`.
    pub fn read_metadata<P: AsRef<Path>>(&self, raw_path: P) -> std::result::Result<RawMetadata, DecodeError> {
        let mut timings = PipelineTimings::new();
        run_stage(PipelineStage::ReadMetadata, &mut timings, || {
            self.load_metadata(raw_path.as_ref())
        })
    }

    /// Decodes `raw_path` straight into `dest`, a packed `height x width x 3`
    /// RGB8 pixel buffer owned by the caller.
    #[instrument(skip(self, raw_path, metadata, dest), fields(width = metadata.width, height = metadata.height))]
    pub fn decode_into<P: AsRef<Path>>(
        &self,
        raw_path: P,
        metadata: &RawMetadata,
        dest: &mut [u8],
    ) -> std::result::Result<PipelineTimings, DecodeError> {
        let mut timings = PipelineTimings::new();
        run_stage(PipelineStage::ReadMetadata, &mut timings, || {
            self.check_metadata(metadata)
        })?;

        let rgb = self.develop(raw_path.as_ref(), metadata, &mut timings)?;
        run_stage(PipelineStage::Quantize, &mut timings, || quantize(&rgb, dest))?;
        Ok(timings)
    }

    /// Reads the sidecar, then decodes the raw file into a new [`RgbImage`].
    pub fn decode_file<P: AsRef<Path>>(&self, raw_path: P) -> std::result::Result<RgbImage, DecodeError> {
        self.decode_file_with_timings(raw_path).map(|(image, _)| image)
    }

    #[instrument(skip_all)]
    pub fn decode_file_with_timings<P: AsRef<Path>>(
        &self,
        raw_path: P,
    ) -> std::result::Result<(RgbImage, PipelineTimings), DecodeError> {
        let raw_path = raw_path.as_ref();
        let mut timings = PipelineTimings::new();
        info!(path = %raw_path.display(), "Starting RAW to RGB decode");

        let metadata = run_stage(PipelineStage::ReadMetadata, &mut timings, || {
            self.load_metadata(raw_path)
        })?;

        let rgb = self.develop(raw_path, &metadata, &mut timings)?;

        let data = run_stage(PipelineStage::Quantize, &mut timings, || {
            let mut data = display_buffer(metadata.width, metadata.height)?;
            quantize(&rgb, &mut data)?;
            Ok(data)
        })?;

        info!(
            width = metadata.width,
            height = metadata.height,
            "Decode complete in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );

        let image = RgbImage {
            width: metadata.width,
            height: metadata.height,
            data,
        };
        Ok((image, timings))
    }

    /// Runs the read, canonicalize, demosaic, normalize, colour-correct and
    /// white-balance stages, returning the F32 RGB buffer ready to quantize.
    fn develop(
        &self,
        raw_path: &Path,
        metadata: &RawMetadata,
        timings: &mut PipelineTimings,
    ) -> std::result::Result<RawArray<'static>, DecodeError> {
        let (height, width) = (metadata.height, metadata.width);

        let mut bayer = run_stage(PipelineStage::ReadRaw, timings, || {
            self.reader.read_raw(raw_path, metadata)
        })?;

        run_stage(PipelineStage::CanonicalizePattern, timings, || {
            cv_core::bayer_to_bayer_rggb(&mut bayer)
        })?;

        let rgb_u16 = run_stage(PipelineStage::Demosaic, timings, || {
            let mut rgb = RawArray::try_allocate(height, width, 3, ElementType::U16, ColorLayout::Rgb)?;
            cv_core::bayer_rggb_to_rgb(&bayer, &mut rgb)?;
            Ok(rgb)
        })?;
        drop(bayer);

        let mut rgb_f32 = run_stage(PipelineStage::NormalizeToFloat, timings, || {
            let (min, max) = self.config.input_range;
            let mut rgb = RawArray::try_allocate(height, width, 3, ElementType::F32, ColorLayout::Rgb)?;
            cv_core::normalize(&rgb_u16, &mut rgb, min, max)?;
            Ok(rgb)
        })?;
        drop(rgb_u16);

        run_stage(PipelineStage::ColorCorrect, timings, || {
            cv_core::apply_ccm(&mut rgb_f32, &metadata.color_correction_matrix)
        })?;

        run_stage(PipelineStage::WhiteBalance, timings, || {
            cv_core::apply_rgb_gain(&mut rgb_f32, &metadata.white_balance_gain)
        })?;

        Ok(rgb_f32)
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DecodeConfig) {
        self.config = config;
    }
}

/// Maps the `[0, 1]` float image onto `dest`, wrapped as a borrowed RGB8 buffer.
fn quantize(rgb: &RawArray<'_>, dest: &mut [u8]) -> Result<()> {
    let (height, width) = (rgb.height(), rgb.width());
    let needed = height
        .checked_mul(width)
        .and_then(|n| n.checked_mul(3))
        .ok_or(ConversionError::InvalidDimensions(width, height))?;
    if dest.len() < needed {
        return Err(ConversionError::ShapeMismatch(format!(
            "destination holds {} bytes, {width}x{height} RGB8 needs {needed}",
            dest.len()
        )));
    }
    let mut display = RawArray::wrap(dest, height, width, 3, ElementType::U8, ColorLayout::Rgb);
    cv_core::normalize(rgb, &mut display, 0.0, 1.0)
}

fn display_buffer(width: usize, height: usize) -> Result<Vec<u8>> {
    let len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or(ConversionError::InvalidDimensions(width, height))?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|e| ConversionError::AllocationFailure(format!("{len} byte display buffer: {e}")))?;
    data.resize(len, 0);
    Ok(data)
}
