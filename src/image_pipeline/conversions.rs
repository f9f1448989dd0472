//! Pipeline conversions module
//!
//! This module contains orchestration logic for RAW to TIFF conversion, for a
//! single image and for a batch of files.

mod batch;
mod raw_to_tiff;
mod timing;


pub use batch::{convert, output_path_for, BatchConverter, BatchFailure, BatchPolicy, BatchReport, RawFormat};
pub use raw_to_tiff::{ConversionReport, ConvertedImage, RawToTiffPipeline};
pub use timing::{PipelineTimings, StepTiming};
