//! RAW image reader implementation using the rawloader library.
//!
//! This module provides support for reading Canon CR2 and Adobe DNG files (and
//! anything else rawloader can decode) into a cropped sensor mosaic plus the
//! metadata the develop stage needs.

use std::io::Cursor;

use tracing::debug;
use rawloader::RawImageData as RawloaderImageData;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::{CfaPattern, RawImageData};
use crate::image_pipeline::raw::reader::RawImageReader;

/// RAW image reader that uses the rawloader library for decoding.
pub struct RawLoaderReader;

/// Color letters in the order rawloader numbers CFA colors.
const CFA_COLORS: [char; 4] = ['R', 'G', 'B', 'E'];

impl RawLoaderReader {
    /// Resolves the 2x2 pattern seen from the top-left corner of the crop.
    fn cfa_after_crop(cfa: &rawloader::CFA, top: usize, left: usize) -> Result<CfaPattern> {
        if cfa.name.len() != 4 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "non-Bayer color filter array {}",
                cfa.name
            )));
        }

        let name: String = (0..2)
            .flat_map(|row| (0..2).map(move |col| (row, col)))
            .map(|(row, col)| {
                CFA_COLORS
                    .get(cfa.color_at(top + row, left + col))
                    .copied()
                    .unwrap_or('?')
            })
            .collect();

        CfaPattern::from_name(&name).ok_or_else(|| {
            ConversionError::UnsupportedFormat(format!("color filter array {}", cfa.name))
        })
    }

    /// Cuts the `[top, right, bottom, left]` border off a row-major buffer of
    /// `full_width x full_height` pixels with `cpp` samples each.
    ///
    /// Returns the cropped samples with their width and height.
    fn crop_samples(
        samples: &[u16],
        full_width: usize,
        full_height: usize,
        cpp: usize,
        crops: [usize; 4],
    ) -> Result<(Vec<u16>, usize, usize)> {
        let [top, right, bottom, left] = crops;
        let width = full_width.saturating_sub(left + right);
        let height = full_height.saturating_sub(top + bottom);
        if width == 0 || height == 0 || samples.len() < full_width * full_height * cpp {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        let row_len = full_width * cpp;
        let mut cropped = Vec::with_capacity(width * height * cpp);
        for row in samples.chunks_exact(row_len).skip(top).take(height) {
            cropped.extend_from_slice(&row[left * cpp..(left + width) * cpp]);
        }
        Ok((cropped, width, height))
    }
}

impl RawImageReader for RawLoaderReader {
    /// Reads and decodes RAW image data from a byte array.
    ///
    /// Float samples (normalized 0.0-1.0) are scaled to the u16 range, the
    /// sensor crop is applied and the bit depth is derived from the white level.
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let cpp = decoded.cpp;
        if cpp != 1 && cpp != 3 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} components per pixel",
                cpp
            )));
        }

        debug!(
            make = %decoded.clean_make,
            model = %decoded.clean_model,
            "Decoded image: {}x{}, cfa={}",
            decoded.width,
            decoded.height,
            decoded.cfa.name
        );

        let full_cam_to_xyz = decoded.cam_to_xyz();
        let mut cam_to_xyz = [[0.0f32; 3]; 3];
        for (dst, src) in cam_to_xyz.iter_mut().zip(full_cam_to_xyz.iter()) {
            dst.copy_from_slice(&src[..3]);
        }
        let neutral_wb = decoded.neutralwb();

        let (samples, black_levels, white_levels) = match decoded.data {
            RawloaderImageData::Integer(values) => {
                (values, decoded.blacklevels, decoded.whitelevels)
            }
            RawloaderImageData::Float(values) => {
                let scaled = values
                    .iter()
                    .map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16)
                    .collect();
                (scaled, [0; 4], [u16::MAX; 4])
            }
        };

        let (cropped, width, height) =
            Self::crop_samples(&samples, decoded.width, decoded.height, cpp, decoded.crops)?;
        drop(samples);
        let [top, _, _, left] = decoded.crops;

        let cfa = if cpp == 1 {
            Some(Self::cfa_after_crop(&decoded.cfa, top, left)?)
        } else {
            None
        };

        let white = white_levels.iter().copied().max().unwrap_or(u16::MAX);
        let bits_per_sample = RawImageData::bits_for_white_level(white);

        debug!(
            "Cropped to {}x{} (crops {:?}), bits_per_sample: {} (max white level: {})",
            width, height, decoded.crops, bits_per_sample, white
        );

        Ok(RawImageData {
            width,
            height,
            cpp,
            data: cropped,
            cfa,
            black_levels,
            white_levels,
            wb_coeffs: decoded.wb_coeffs,
            neutral_wb,
            cam_to_xyz,
            bits_per_sample,
            make: decoded.clean_make,
            model: decoded.clean_model,
        })
    }
}
