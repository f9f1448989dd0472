//! Image processing pipeline module
//!
//! This module provides a structured approach to RAW to TIFF conversion, with
//! separate modules for RAW reading, development, resizing, TIFF writing, and
//! conversion orchestration.

pub mod raw;
pub mod develop;
pub mod resize;
pub mod tiff;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    Result,
};

pub use raw::{
    CfaPattern,
    RawImageData,
    RawImageReader,
    RawLoaderReader,
};

pub use develop::{
    CpuDeveloper,
    DevelopParams,
    RgbImageData,
    WhiteBalance,
};

pub use self::tiff::{
    TiffCompression,
    ConversionConfig,
    ConversionConfigBuilder,
    TiffWriter,
    StandardTiffWriter,
};

pub use conversions::{
    convert,
    output_path_for,
    BatchConverter,
    BatchFailure,
    BatchPolicy,
    BatchReport,
    ConversionReport,
    ConvertedImage,
    PipelineTimings,
    RawFormat,
    RawToTiffPipeline,
};
