//! Resolution options.

use crate::parser::DEFAULT_BOOK;
use std::path::PathBuf;

/// Options for turning token specs into decoded images.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Root of the token library, laid out as `<root>/<BOOK>/<Creature>.<ext>`
    pub library_dir: Option<PathBuf>,

    /// Book used for creatures given without one
    pub default_book: String,

    /// Downsample images whose larger side exceeds this many pixels
    pub max_image_px: Option<u32>,
}

impl ResolveOptions {
    /// Create new resolve options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token library root.
    pub fn with_library(mut self, dir: impl Into<PathBuf>) -> Self {
        self.library_dir = Some(dir.into());
        self
    }

    /// Set the default book.
    pub fn with_default_book(mut self, book: impl Into<String>) -> Self {
        self.default_book = book.into();
        self
    }

    /// Cap the decoded image size.
    pub fn with_max_image_px(mut self, px: u32) -> Self {
        self.max_image_px = Some(px);
        self
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            library_dir: None,
            default_book: DEFAULT_BOOK.to_string(),
            max_image_px: None,
        }
    }
}
