//! Sequential batch conversion of RAW files named on the command line.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    conversions::raw_to_tiff::{ConversionReport, RawToTiffPipeline},
    raw::{RawImageReader, RawLoaderReader},
    tiff::{ConversionConfig, StandardTiffWriter, TiffWriter},
};

const OUTPUT_EXTENSION: &str = "tif";

/// RAW containers accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormat {
    Dng,
    Cr2,
}

impl RawFormat {
    /// Classifies a path by the text after the last '.' of its file name,
    /// ignoring case.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("dng") => Ok(Self::Dng),
            Some("cr2") => Ok(Self::Cr2),
            _ => Err(ConversionError::UnsupportedFormat(format!(
                "{} (expected .dng or .cr2)",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for RawFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dng => write!(f, "DNG"),
            Self::Cr2 => write!(f, "CR2"),
        }
    }
}

/// Output path for a RAW input: the extension after the last '.' becomes `tif`.
///
/// `2023.05.photo.dng` becomes `2023.05.photo.tif` in the same directory.
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_name()
        .map(|name| name.to_string_lossy())
        .map(|name| match name.rsplit_once('.') {
            Some((stem, _)) => stem.to_string(),
            None => name.into_owned(),
        })
        .unwrap_or_default();

    input.with_file_name(format!("{}.{}", stem, OUTPUT_EXTENSION))
}

/// What to do with the rest of the batch once one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Stop at the first failure; files written before it are kept
    #[default]
    AbortOnError,
    /// Record the failure and carry on with the next file
    ContinueOnError,
}

#[derive(Debug)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: ConversionError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConversionReport>,
    pub failed: Vec<BatchFailure>,
    /// Inputs never attempted because an earlier failure aborted the batch
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

pub struct BatchConverter<R: RawImageReader, W: TiffWriter> {
    pipeline: RawToTiffPipeline<R, W>,
    policy: BatchPolicy,
}

impl BatchConverter<RawLoaderReader, StandardTiffWriter> {
    pub fn new(config: ConversionConfig, policy: BatchPolicy) -> Result<Self> {
        Ok(Self::with_pipeline(RawToTiffPipeline::new(config)?, policy))
    }
}

impl<R: RawImageReader, W: TiffWriter> BatchConverter<R, W> {
    pub fn with_pipeline(pipeline: RawToTiffPipeline<R, W>, policy: BatchPolicy) -> Self {
        Self { pipeline, policy }
    }

    /// Converts a single input, logging one diagnostic if it fails.
    fn convert_one(&self, input: &Path) -> Result<ConversionReport> {
        let format = RawFormat::from_path(input).inspect_err(|_| {
            error!("Input image {} is not a supported raw image file", input.display());
        })?;

        info!("Processing {} ({})", input.display(), format);
        self.pipeline
            .convert_file(input, output_path_for(input))
            .inspect_err(|e| error!("Failed to convert {}: {}", input.display(), e))
    }

    /// Converts every path in order, one at a time.
    pub fn run<P: AsRef<Path>>(&self, inputs: &[P]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, input) in inputs.iter().enumerate() {
            let input = input.as_ref();
            match self.convert_one(input) {
                Ok(converted) => report.converted.push(converted),
                Err(error) => {
                    report.failed.push(BatchFailure {
                        input: input.to_path_buf(),
                        error,
                    });

                    if self.policy == BatchPolicy::AbortOnError {
                        report.skipped = inputs[index + 1..]
                            .iter()
                            .map(|p| p.as_ref().to_path_buf())
                            .collect();
                        if !report.skipped.is_empty() {
                            warn!("Aborting batch, {} file(s) not processed", report.skipped.len());
                        }
                        break;
                    }
                }
            }
        }

        info!(
            converted = report.converted.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "Terminating"
        );
        report
    }
}

/// Converts `inputs` with the rawloader reader and standard TIFF writer.
pub fn convert<P: AsRef<Path>>(
    inputs: &[P],
    config: ConversionConfig,
    policy: BatchPolicy,
) -> Result<BatchReport> {
    Ok(BatchConverter::new(config, policy)?.run(inputs))
}
