//! Rendering options and configuration.

/// Fixed size of the name printed under each token, in points.
pub const DEFAULT_LABEL_FONT_SIZE: f32 = 7.0;

/// Options for rendering a token sheet to PDF.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Label font size in points, independent of name length
    pub label_font_size: f32,

    /// Document title written to the PDF info dictionary
    pub title: Option<String>,

    /// Compress content streams
    pub compress: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label font size.
    pub fn with_label_font_size(mut self, size: f32) -> Self {
        self.label_font_size = size;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            label_font_size: DEFAULT_LABEL_FONT_SIZE,
            title: None,
            compress: true,
        }
    }
}
