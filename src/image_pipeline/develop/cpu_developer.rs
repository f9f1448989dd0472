use std::io::Cursor;

use bayer::{BayerDepth, Demosaic, RasterDepth, RasterMut};
use tracing::{debug, info};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::develop::auto_bright::Histogram;
use crate::image_pipeline::develop::gamma::GammaCurve;
use crate::image_pipeline::develop::types::{DevelopParams, RgbImageData, WhiteBalance};
use crate::image_pipeline::raw::types::{CfaPattern, RawImageData};

/// Standard XYZ to sRGB D65 illuminant matrix
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [ 3.2404542, -1.5371385, -0.4985314],
    [-0.9692660,  1.8760108,  0.0415560],
    [ 0.0556434, -0.2040259,  1.0572252],
];

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Only 16-bit output is produced.
const OUTPUT_BITS: u32 = 16;

/// Develops RAW sensor data into 16-bit RGB on the CPU.
///
/// Steps: black level and white balance scaling, demosaic (bayer crate),
/// camera to sRGB matrix, auto-brightness and the output gamma curve.
pub struct CpuDeveloper;

impl CpuDeveloper {
    pub fn new() -> Self {
        Self
    }

    pub fn develop(&self, raw_image: &RawImageData, params: &DevelopParams) -> Result<RgbImageData> {
        let width = raw_image.width;
        let height = raw_image.height;
        info!("Developing image {}x{}", width, height);
        debug!(
            bits_per_sample = raw_image.bits_per_sample,
            make = %raw_image.make,
            model = %raw_image.model,
            "Source sensor depth"
        );

        if params.output_bits != OUTPUT_BITS {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} bits per sample output",
                params.output_bits
            )));
        }
        if width == 0 || height == 0 || raw_image.data.len() < width * height * raw_image.cpp {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        let multipliers = Self::wb_multipliers(raw_image, params.white_balance);
        debug!("White balance multipliers: {:?}", multipliers);

        let camera_rgb = match (raw_image.cfa, raw_image.cpp) {
            (Some(cfa), 1) => {
                let mut mosaic = raw_image.data[..width * height].to_vec();
                for (i, v) in mosaic.iter_mut().enumerate() {
                    let color = cfa.color_at(i / width, i % width);
                    *v = Self::scale_sample(*v, color, raw_image, &multipliers);
                }
                Self::demosaic(&mosaic, width, height, cfa)?
            }
            (None, 3) => raw_image.data[..width * height * 3]
                .chunks_exact(3)
                .flat_map(|px| {
                    [0, 1, 2].map(|c| Self::scale_sample(px[c], c, raw_image, &multipliers))
                })
                .collect(),
            (_, cpp) => {
                return Err(ConversionError::UnsupportedFormat(format!(
                    "{} components per pixel without a Bayer pattern",
                    cpp
                )));
            }
        };

        let cam_to_srgb = Self::cam_to_srgb(&raw_image.cam_to_xyz);
        debug!("Camera to sRGB matrix: {:?}", cam_to_srgb);

        let mut histogram = Histogram::new();
        let mut rgb_data: Vec<u16> = camera_rgb
            .chunks_exact(3)
            .flat_map(|px| {
                let (r, g, b) = (f32::from(px[0]), f32::from(px[1]), f32::from(px[2]));
                let out = cam_to_srgb.map(|row| {
                    (row[0] * r + row[1] * g + row[2] * b).clamp(0.0, 65535.0) as u16
                });
                histogram.add(out);
                out
            })
            .collect();

        let white = if params.auto_bright {
            histogram.white_point(params.auto_bright_threshold)
        } else {
            0x10000
        };
        let imax = (white as f32 / params.bright) as u32;
        debug!(white, imax, "Tone curve range");

        let curve = GammaCurve::new(params.gamma.0, params.gamma.1, imax);
        for v in rgb_data.iter_mut() {
            *v = curve.apply(*v);
        }

        Ok(RgbImageData {
            width,
            height,
            data: rgb_data,
            bits_per_sample: OUTPUT_BITS,
        })
    }

    /// Black level subtraction, white balance and scaling to the full u16 range.
    fn scale_sample(value: u16, color: usize, raw_image: &RawImageData, multipliers: &[f32; 3]) -> u16 {
        let black = f32::from(raw_image.black_levels[color]);
        let white = f32::from(raw_image.white_levels[color]);
        let range = (white - black).max(1.0);
        let scaled = (f32::from(value) - black) * multipliers[color] * 65535.0 / range;
        scaled.clamp(0.0, 65535.0) as u16
    }

    /// White balance multipliers normalized so the smallest is 1.
    fn wb_multipliers(raw_image: &RawImageData, mode: WhiteBalance) -> [f32; 3] {
        let valid = |coeffs: &[f32; 4]| {
            coeffs[..3].iter().all(|c| c.is_finite() && *c > 0.0)
        };

        let coeffs = match mode {
            WhiteBalance::Camera if valid(&raw_image.wb_coeffs) => raw_image.wb_coeffs,
            WhiteBalance::Camera | WhiteBalance::Daylight if valid(&raw_image.neutral_wb) => {
                raw_image.neutral_wb
            }
            _ => [1.0; 4],
        };

        let min = coeffs[..3].iter().copied().fold(f32::INFINITY, f32::min);
        [coeffs[0] / min, coeffs[1] / min, coeffs[2] / min]
    }

    /// Combined camera to XYZ to sRGB matrix, rows normalized to keep white neutral.
    fn cam_to_srgb(cam_to_xyz: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
        let mut m = [[0.0f32; 3]; 3];
        for r in 0..3 {
            for c in 0..3 {
                m[r][c] = (0..3).map(|k| XYZ_TO_SRGB[r][k] * cam_to_xyz[k][c]).sum();
            }
        }

        for row in m.iter_mut() {
            let sum: f32 = row.iter().sum();
            if !sum.is_finite() || sum.abs() < f32::EPSILON {
                return IDENTITY;
            }
            for v in row.iter_mut() {
                *v /= sum;
            }
        }
        m
    }

    fn demosaic(mosaic: &[u16], width: usize, height: usize, cfa: CfaPattern) -> Result<Vec<u16>> {
        let bayer_bytes: Vec<u8> = mosaic.iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut output_buf = vec![0u8; width * height * 3 * 2];

        debug!("Running demosaic with depth=16LE, CFA={:?}, algo=Linear", cfa);
        {
            let mut output_raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);
            bayer::run_demosaic(
                &mut Cursor::new(&bayer_bytes[..]),
                BayerDepth::Depth16LE,
                cfa.to_bayer(),
                Demosaic::Linear,
                &mut output_raster,
            )
            .map_err(|e| ConversionError::DecodeError(format!("Demosaic failed: {:?}", e)))?;
        }

        Ok(output_buf
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect())
    }
}

impl Default for CpuDeveloper {
    fn default() -> Self {
        Self::new()
    }
}
