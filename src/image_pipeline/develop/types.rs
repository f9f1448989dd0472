//! Types for developing RAW sensor data into RGB

/// RGB image data after development
#[derive(Debug, Clone, PartialEq)]
pub struct RgbImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u16>,
    /// Bits per sample of `data` (always 16 once developed)
    pub bits_per_sample: u32,
}

impl RgbImageData {
    pub const CHANNELS: usize = 3;

    pub fn pixel(&self, x: usize, y: usize) -> [u16; 3] {
        let i = (y * self.width + x) * Self::CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Source of the white balance multipliers applied before demosaicing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhiteBalance {
    /// As-shot coefficients recorded by the camera
    #[default]
    Camera,
    /// Daylight coefficients derived from the camera color matrix
    Daylight,
    /// Unit multipliers
    None,
}

/// Parameters for turning a RAW mosaic into a 16-bit RGB image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevelopParams {
    /// Gamma curve as (power, toe slope); (1, 1) is linear
    pub gamma: (f64, f64),
    /// Stretch the histogram so the brightest `auto_bright_threshold` fraction clips
    pub auto_bright: bool,
    /// Fraction of pixels allowed to clip when auto-brightening
    pub auto_bright_threshold: f32,
    /// Brightness multiplier applied on top of auto-brightness
    pub bright: f32,
    /// Output bits per sample
    pub output_bits: u32,
    pub white_balance: WhiteBalance,
}

impl Default for DevelopParams {
    fn default() -> Self {
        Self {
            gamma: (1.0, 1.0),
            auto_bright: true,
            auto_bright_threshold: 0.001,
            bright: 1.0,
            output_bits: 16,
            white_balance: WhiteBalance::Camera,
        }
    }
}
