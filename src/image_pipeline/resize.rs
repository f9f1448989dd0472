//! Area-averaging downscale of developed RGB images.

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::develop::RgbImageData;

/// Target size for an integer downscale factor, `(width / factor, height / factor)`.
pub fn scaled_dimensions(width: usize, height: usize, factor: u32) -> Result<(usize, usize)> {
    if factor == 0 {
        return Err(ConversionError::InvalidConfig("scale factor must be at least 1".to_string()));
    }
    let factor = factor as usize;
    Ok((width / factor, height / factor))
}

/// Shrinks `image` by `factor` with a box convolution, so every output pixel
/// is the weighted mean of the source area it covers.
pub fn area_downscale(image: &RgbImageData, factor: u32) -> Result<RgbImageData> {
    let (new_width, new_height) = scaled_dimensions(image.width, image.height, factor)?;
    if new_width == 0 || new_height == 0 {
        return Err(ConversionError::InvalidDimensions(new_width, new_height));
    }
    if factor == 1 {
        return Ok(image.clone());
    }
    if image.data.len() != image.width * image.height * RgbImageData::CHANNELS {
        return Err(ConversionError::InvalidDimensions(image.width, image.height));
    }
    debug!(
        "Area resize {}x{} -> {}x{}",
        image.width, image.height, new_width, new_height
    );

    let src_bytes: Vec<u8> = image.data.iter().flat_map(|v| v.to_ne_bytes()).collect();
    let src = Image::from_vec_u8(
        image.width as u32,
        image.height as u32,
        src_bytes,
        PixelType::U16x3,
    )
    .map_err(|e| ConversionError::EncodeError(format!("Resize source buffer: {}", e)))?;
    let mut dst = Image::new(new_width as u32, new_height as u32, PixelType::U16x3);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box));
    Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|e| ConversionError::EncodeError(format!("Resize failed: {}", e)))?;

    let data = dst
        .buffer()
        .chunks_exact(2)
        .map(|b| u16::from_ne_bytes([b[0], b[1]]))
        .collect();

    Ok(RgbImageData {
        width: new_width,
        height: new_height,
        data,
        bits_per_sample: image.bits_per_sample,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> RgbImageData {
        let data = (0..width * height)
            .flat_map(|i| {
                let v = (i * 100) as u16;
                [v, v / 2, 1000]
            })
            .collect();
        RgbImageData { width, height, data, bits_per_sample: 16 }
    }

    fn close(a: u16, b: u16) -> bool {
        (i32::from(a) - i32::from(b)).abs() <= 1
    }

    #[test]
    fn test_scaled_dimensions_floor() {
        assert_eq!(scaled_dimensions(6000, 4000, 1).unwrap(), (6000, 4000));
        assert_eq!(scaled_dimensions(6001, 4001, 2).unwrap(), (3000, 2000));
        assert_eq!(scaled_dimensions(10, 7, 3).unwrap(), (3, 2));
        assert!(matches!(scaled_dimensions(10, 10, 0), Err(ConversionError::InvalidConfig(_))));
    }

    #[test]
    fn test_block_average() {
        let image = gradient(4, 2);
        let small = area_downscale(&image, 2).unwrap();
        assert_eq!((small.width, small.height), (2, 1));
        // Block of pixel indices 0, 1, 4, 5 -> values 0, 100, 400, 500
        let px = small.pixel(0, 0);
        assert!(close(px[0], 250) && close(px[1], 125) && close(px[2], 1000), "{:?}", px);
        // Block of pixel indices 2, 3, 6, 7 -> values 200, 300, 600, 700
        let px = small.pixel(1, 0);
        assert!(close(px[0], 450) && close(px[1], 225) && close(px[2], 1000), "{:?}", px);
    }

    #[test]
    fn test_non_divisible_width_blends_shared_column() {
        // 5 columns into 2: the middle column straddles both output pixels
        let data = (0..2)
            .flat_map(|_| [0u16, 100, 200, 300, 400])
            .flat_map(|v| [v, v, v])
            .collect();
        let image = RgbImageData { width: 5, height: 2, data, bits_per_sample: 16 };

        let small = area_downscale(&image, 2).unwrap();
        assert_eq!((small.width, small.height), (2, 1));
        let left = small.pixel(0, 0)[0];
        let right = small.pixel(1, 0)[0];
        assert!(left > 50 && left < 200, "left {}", left);
        assert!(right > 200 && right < 400, "right {}", right);
        assert!(small.data.chunks_exact(3).all(|px| px[0] == px[1] && px[1] == px[2]));
    }

    #[test]
    fn test_uneven_dimensions_cover_whole_source() {
        let image = RgbImageData {
            width: 5,
            height: 5,
            data: vec![4000; 5 * 5 * 3],
            bits_per_sample: 16,
        };
        let small = area_downscale(&image, 2).unwrap();
        assert_eq!((small.width, small.height), (2, 2));
        assert!(small.data.iter().all(|&v| close(v, 4000)), "{:?}", small.data);
    }

    #[test]
    fn test_factor_one_is_copy() {
        let image = gradient(3, 3);
        assert_eq!(area_downscale(&image, 1).unwrap(), image);
    }

    #[test]
    fn test_too_small_target_rejected() {
        let image = gradient(3, 3);
        let result = area_downscale(&image, 4);
        assert!(matches!(result, Err(ConversionError::InvalidDimensions(0, 0))));
    }
}
