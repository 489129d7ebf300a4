//! Token image decoding.

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::TokenImage;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::path::Path;

/// Decode token image bytes.
///
/// Transparent areas are flattened onto white. When `max_px` is given, images
/// whose larger side exceeds it are downsampled, keeping their aspect ratio.
/// Failures are reported against `key`.
pub fn decode_token_image(key: &str, data: &[u8], max_px: Option<u32>) -> Result<TokenImage> {
    let invalid = |reason: String| Error::InvalidTokenImage {
        token: key.to_string(),
        reason,
    };

    let format = detect_format_from_bytes(data).map_err(|e| invalid(e.to_string()))?;
    log::trace!("decoding {} as {}", key, format);
    let mut decoded = image::load_from_memory_with_format(data, format.image_format())
        .map_err(|e| invalid(e.to_string()))?;

    if let Some(max) = max_px.filter(|&m| m > 0) {
        let (w, h) = decoded.dimensions();
        if w.max(h) > max {
            log::debug!("downsampling {} from {}x{} to fit {}px", key, w, h, max);
            decoded = decoded.resize(max, max, FilterType::Lanczos3);
        }
    }

    Ok(TokenImage::new(key, flatten_onto_white(&decoded)))
}

/// Read and decode a token image file.
pub fn load_token_image(path: &Path, key: &str, max_px: Option<u32>) -> Result<TokenImage> {
    let data = std::fs::read(path).map_err(|e| Error::UnreadableImage {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    decode_token_image(key, &data, max_px).map_err(|e| Error::UnreadableImage {
        path: path.to_path_buf(),
        reason: match e {
            Error::InvalidTokenImage { reason, .. } => reason,
            other => other.to_string(),
        },
    })
}

fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, px) in rgba.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }

    out
}
