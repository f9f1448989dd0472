use tracing::{info, instrument};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    conversions::timing::PipelineTimings,
    develop::CpuDeveloper,
    raw::{RawImageReader, RawLoaderReader},
    resize,
    tiff::{TiffWriter, StandardTiffWriter, ConversionConfig},
};

/// Outcome of converting one in-memory RAW image.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    /// Width of the written image
    pub width: usize,
    /// Height of the written image
    pub height: usize,
    /// Sensor bit depth derived from the white level
    pub source_bits_per_sample: u32,
    pub timings: PipelineTimings,
}

/// Outcome of converting one file on disk.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    pub source_bits_per_sample: u32,
    pub timings: PipelineTimings,
}

pub struct RawToTiffPipeline<R: RawImageReader, W: TiffWriter> {
    reader: R,
    writer: W,
    developer: CpuDeveloper,
    config: ConversionConfig,
}

impl RawToTiffPipeline<RawLoaderReader, StandardTiffWriter> {
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_custom(RawLoaderReader, StandardTiffWriter, config))
    }
}

impl<R: RawImageReader, W: TiffWriter> RawToTiffPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            developer: CpuDeveloper::new(),
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Decodes, develops, optionally downscales and encodes one RAW image.
    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<ConvertedImage> {
        let mut timings = PipelineTimings::new();

        let raw_image = timings.time("decode_raw", || {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_raw(input_data)
        })?;

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = raw_image.width,
                height = raw_image.height
            ).entered();
            self.validate_dimensions(raw_image.width, raw_image.height)?;
        }

        let developed = timings.time("develop", || {
            let _span = tracing::info_span!("develop").entered();
            self.developer.develop(&raw_image, &self.config.develop)
        })?;
        let source_bits_per_sample = raw_image.bits_per_sample;
        drop(raw_image);

        let resized = if self.config.scale_factor > 1 {
            Some(timings.time("resize", || {
                let _span = tracing::info_span!("resize", factor = self.config.scale_factor).entered();
                resize::area_downscale(&developed, self.config.scale_factor)
            })?)
        } else {
            None
        };
        let image = resized.as_ref().unwrap_or(&developed);

        timings.time("encode_tiff", || {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_rgb_tiff(image, output, &self.config)
        })?;

        info!(
            width = image.width,
            height = image.height,
            source_bits = source_bits_per_sample,
            "Conversion complete"
        );

        Ok(ConvertedImage {
            width: image.width,
            height: image.height,
            source_bits_per_sample,
            timings,
        })
    }

    /// Converts `input_path` and writes the TIFF to `output_path`.
    ///
    /// The output file is only created once the image has been encoded, so a
    /// failed decode never leaves a partial file behind. An existing output
    /// is overwritten.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<ConversionReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();
        let mut timings = PipelineTimings::new();

        let input_data = timings.time("read_input_file", || {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })
        })?;

        let mut encoded = Vec::new();
        let converted = self.convert(&input_data, &mut encoded)?;
        drop(input_data);
        timings.extend(converted.timings);

        info!("Writing {}", output_path.display());
        timings.time("write_output_file", || {
            let _span = tracing::info_span!("create_output_file").entered();
            let mut output_file = std::fs::File::create(output_path).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
            output_file.write_all(&encoded).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })
        })?;

        timings.log_summary();

        Ok(ConversionReport {
            input: input_path.to_path_buf(),
            output: output_path.to_path_buf(),
            width: converted.width,
            height: converted.height,
            source_bits_per_sample: converted.source_bits_per_sample,
            timings,
        })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}
