//! Token types: decoded images, resolved tokens and flat placements.

use image::RgbImage;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A decoded token bitmap.
///
/// Pixels are 8-bit RGB with any alpha already flattened onto white, which is
/// what the PDF writer embeds as a `DeviceRGB` image.
#[derive(Clone, Serialize)]
pub struct TokenImage {
    /// Stable identity: `BOOK/Creature` for library tokens, the path for local files
    pub key: String,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    #[serde(skip)]
    pixels: RgbImage,
}

impl TokenImage {
    /// Wrap decoded pixels under the given key.
    pub fn new(key: impl Into<String>, pixels: RgbImage) -> Self {
        Self {
            key: key.into(),
            width: pixels.width(),
            height: pixels.height(),
            pixels,
        }
    }

    /// Solid white square, handy for layouts where pixels don't matter.
    pub fn blank(key: impl Into<String>, size: u32) -> Self {
        Self::new(key, RgbImage::from_pixel(size, size, image::Rgb([255, 255, 255])))
    }

    /// Raw RGB samples, row-major, three bytes per pixel.
    pub fn rgb_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

impl fmt::Debug for TokenImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenImage")
            .field("key", &self.key)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PartialEq for TokenImage {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.width == other.width && self.height == other.height
    }
}

impl Eq for TokenImage {}

/// A resolved token: one image, its display name and how many copies to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Shared decoded image
    pub image: Arc<TokenImage>,

    /// Display name (creature name or file stem)
    pub name: String,

    /// Number of copies, at least 1
    pub count: u32,
}

impl Token {
    /// Create a resolved token.
    pub fn new(image: Arc<TokenImage>, name: impl Into<String>, count: u32) -> Self {
        Self {
            image,
            name: name.into(),
            count,
        }
    }
}

/// A single placement request: one copy of one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Shared decoded image
    #[serde(serialize_with = "serialize_image_key")]
    pub image: Arc<TokenImage>,

    /// Label to print under the token, if names are shown
    pub name: Option<String>,
}

impl Placement {
    /// Create a placement with no label.
    pub fn new(image: Arc<TokenImage>) -> Self {
        Self { image, name: None }
    }

    /// Attach a label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Expand resolved tokens into a flat list of placements.
///
/// A token with `count = 6` yields six consecutive placements sharing the same
/// image. Names are attached only when `show_names` is set.
pub fn expand_tokens(tokens: &[Token], show_names: bool) -> Vec<Placement> {
    let total: usize = tokens.iter().map(|t| t.count as usize).sum();
    let mut placements = Vec::with_capacity(total);

    for token in tokens {
        let name = show_names.then(|| token.name.clone());
        for _ in 0..token.count {
            placements.push(Placement {
                image: Arc::clone(&token.image),
                name: name.clone(),
            });
        }
    }

    placements
}

pub(crate) fn serialize_image_key<S>(image: &Arc<TokenImage>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&image.key)
}
