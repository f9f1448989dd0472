//! TIFF conversion configuration types

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::develop::DevelopParams;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Configuration for RAW to TIFF conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor value for compression (typically 2 for horizontal differencing)
    /// Note: Predictor adds processing time, set to None for maximum speed
    pub predictor: Option<u16>,
    /// Whether to validate image dimensions before conversion
    pub validate_dimensions: bool,
    /// Integer downscale factor applied before writing; 1 keeps full resolution
    pub scale_factor: u32,
    /// Parameters handed to the develop stage
    pub develop: DevelopParams,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
            scale_factor: 1,
            develop: DevelopParams::default(),
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }

    /// Rejects parameter combinations the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.scale_factor == 0 {
            return Err(ConversionError::InvalidConfig(
                "scale factor must be at least 1".to_string(),
            ));
        }

        let threshold = self.develop.auto_bright_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(ConversionError::InvalidConfig(format!(
                "auto-bright threshold {} outside [0, 1)",
                threshold
            )));
        }

        if !(self.develop.bright > 0.0) {
            return Err(ConversionError::InvalidConfig(format!(
                "brightness {} must be positive",
                self.develop.bright
            )));
        }

        let (power, toe_slope) = self.develop.gamma;
        if !(power > 0.0 && toe_slope > 0.0) {
            return Err(ConversionError::InvalidConfig(format!(
                "gamma ({}, {}) must be positive",
                power, toe_slope
            )));
        }

        Ok(())
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    scale_factor: Option<u32>,
    develop: Option<DevelopParams>,
}

impl ConversionConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn scale_factor(mut self, factor: u32) -> Self {
        self.scale_factor = Some(factor);
        self
    }

    pub fn develop(mut self, params: DevelopParams) -> Self {
        self.develop = Some(params);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            scale_factor: self.scale_factor.unwrap_or(default.scale_factor),
            develop: self.develop.unwrap_or(default.develop),
        }
    }
}
