//! Batch conversion of Canon CR2 and DNG raw files into 16-bit RGB TIFFs.

pub mod cli;
pub mod image_pipeline;
pub mod logger;
