//! RAW image data types

/// 2x2 Bayer color filter layouts, named by their top-left quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfaPattern {
    Rggb,
    Bggr,
    Grbg,
    Gbrg,
}

impl CfaPattern {
    /// Parses a four-letter pattern name such as `"RGGB"`.
    ///
    /// A fourth color (`E`, emerald) is treated as green.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .map(|c| match c.to_ascii_uppercase() {
                'E' => 'G',
                other => other,
            })
            .collect();

        match normalized.as_str() {
            "RGGB" => Some(Self::Rggb),
            "BGGR" => Some(Self::Bggr),
            "GRBG" => Some(Self::Grbg),
            "GBRG" => Some(Self::Gbrg),
            _ => None,
        }
    }

    /// Color index (0 = red, 1 = green, 2 = blue) at a pixel position.
    pub fn color_at(&self, row: usize, col: usize) -> usize {
        let quad = match self {
            Self::Rggb => [[0, 1], [1, 2]],
            Self::Bggr => [[2, 1], [1, 0]],
            Self::Grbg => [[1, 0], [2, 1]],
            Self::Gbrg => [[1, 2], [0, 1]],
        };
        quad[row & 1][col & 1]
    }

    pub fn to_bayer(self) -> bayer::CFA {
        match self {
            Self::Rggb => bayer::CFA::RGGB,
            Self::Bggr => bayer::CFA::BGGR,
            Self::Grbg => bayer::CFA::GRBG,
            Self::Gbrg => bayer::CFA::GBRG,
        }
    }
}

/// Represents decoded RAW image data
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Components per pixel: 1 for a Bayer mosaic, 3 for already-demosaiced data
    pub cpp: usize,
    /// Sensor samples, row-major, `width * height * cpp` values
    pub data: Vec<u16>,
    /// Mosaic layout, `None` when `cpp == 3`
    pub cfa: Option<CfaPattern>,
    /// Black level per color (R, G, B, G2)
    pub black_levels: [u16; 4],
    /// White level per color (R, G, B, G2)
    pub white_levels: [u16; 4],
    /// As-shot white balance coefficients reported by the camera
    pub wb_coeffs: [f32; 4],
    /// Daylight white balance derived from the color matrix
    pub neutral_wb: [f32; 4],
    /// Camera RGB to CIE XYZ
    pub cam_to_xyz: [[f32; 3]; 3],
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
    pub make: String,
    pub model: String,
}

impl RawImageData {
    /// Number of significant bits implied by a white level, `floor(log2(white + 1))`.
    pub fn bits_for_white_level(white_level: u16) -> u32 {
        let levels = u32::from(white_level) + 1;
        u32::BITS - 1 - levels.leading_zeros()
    }

    pub fn max_white_level(&self) -> u16 {
        self.white_levels.iter().copied().max().unwrap_or(u16::MAX)
    }
}
