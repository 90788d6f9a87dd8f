//! Pure image operations used by the pipeline's transform step.
//!
//! Everything here is synchronous and CPU bound; callers run it on the
//! blocking pool.

use crate::domain::model::{ConversionSettings, EncodedImage};
use crate::utils::error::{OptimizeError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

/// Flattens any alpha channel onto an opaque white background and returns
/// 8-bit RGB. Images without alpha are only converted.
pub fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);

    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let alpha = src[3] as u32;
        for c in 0..3 {
            // 四捨五入到最接近的整數
            let blended = (src[c] as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
            dst[c] = blended as u8;
        }
    }

    out
}

/// Width-capped dimensions preserving aspect ratio. The height is truncated,
/// never rounded up, and never drops below one pixel.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let new_height = (height as f64 / width as f64 * max_width as f64) as u32;
    (max_width, new_height.max(1))
}

pub fn cap_width(img: RgbImage, max_width: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = target_dimensions(width, height, max_width);
    if (new_width, new_height) == (width, height) {
        return img;
    }
    image::imageops::resize(&img, new_width, new_height, FilterType::Lanczos3)
}

pub fn encode_webp(img: &RgbImage, quality: f32) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let encoder = webp::Encoder::from_rgb(img.as_raw(), width, height);
    let memory = encoder
        .encode_simple(false, quality)
        .map_err(|e| OptimizeError::EncodeError {
            message: format!("{:?}", e),
        })?;
    Ok(memory.to_vec())
}

/// Decodes `bytes`, normalises colour, caps the width and re-encodes as lossy
/// WebP.
pub fn convert_image(bytes: &[u8], settings: ConversionSettings) -> Result<EncodedImage> {
    let decoded = image::load_from_memory(bytes)?;
    let original_dimensions = (decoded.width(), decoded.height());

    let rgb = flatten_to_rgb(decoded);
    let resized = cap_width(rgb, settings.max_width);
    let final_dimensions = resized.dimensions();

    tracing::debug!(
        "Encoding {}x{} -> {}x{} at quality {}",
        original_dimensions.0,
        original_dimensions.1,
        final_dimensions.0,
        final_dimensions.1,
        settings.quality
    );

    let encoded = encode_webp(&resized, settings.quality)?;

    Ok(EncodedImage {
        bytes: encoded,
        original_size: bytes.len() as u64,
        original_dimensions,
        final_dimensions,
    })
}
