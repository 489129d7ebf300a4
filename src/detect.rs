//! Token image format detection.

use crate::error::{Error, Result};

/// Bitmap formats accepted as token images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    /// Portable Network Graphics
    Png,
    /// JPEG / JFIF
    Jpeg,
    /// WebP (the format of the 5e.tools bestiary tokens)
    WebP,
    /// GIF87a / GIF89a
    Gif,
}

impl TokenFormat {
    /// Matching `image` crate format.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            TokenFormat::Png => image::ImageFormat::Png,
            TokenFormat::Jpeg => image::ImageFormat::Jpeg,
            TokenFormat::WebP => image::ImageFormat::WebP,
            TokenFormat::Gif => image::ImageFormat::Gif,
        }
    }
}

impl std::fmt::Display for TokenFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenFormat::Png => "PNG",
            TokenFormat::Jpeg => "JPEG",
            TokenFormat::WebP => "WebP",
            TokenFormat::Gif => "GIF",
        };
        f.write_str(name)
    }
}

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff";
const GIF_MAGIC_87: &[u8] = b"GIF87a";
const GIF_MAGIC_89: &[u8] = b"GIF89a";
const RIFF_MAGIC: &[u8] = b"RIFF";
const WEBP_MAGIC: &[u8] = b"WEBP";
const HEADER_LEN: usize = 12;

/// Detect the token image format from the leading bytes of a file.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<TokenFormat> {
    if data.starts_with(PNG_MAGIC) {
        return Ok(TokenFormat::Png);
    }
    if data.starts_with(JPEG_MAGIC) {
        return Ok(TokenFormat::Jpeg);
    }
    if data.starts_with(GIF_MAGIC_87) || data.starts_with(GIF_MAGIC_89) {
        return Ok(TokenFormat::Gif);
    }
    if data.len() >= HEADER_LEN && data.starts_with(RIFF_MAGIC) && &data[8..12] == WEBP_MAGIC {
        return Ok(TokenFormat::WebP);
    }

    let shown = data.len().min(8);
    Err(Error::UnsupportedImageFormat(format!(
        "unrecognized header {:02x?}",
        &data[..shown]
    )))
}
