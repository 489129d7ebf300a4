//! Layout options and configuration.

use crate::model::PageFormat;

/// Default printed token size (a 1 inch square is 25.4 mm; tabletop grids use 25 mm).
pub const DEFAULT_TOKEN_SIZE_MM: f32 = 25.0;

/// Default blank border around the printable area.
pub const DEFAULT_MARGIN_MM: f32 = 4.0;

/// Default height of the name band under each token.
pub const DEFAULT_LABEL_HEIGHT_MM: f32 = 4.0;

/// Options controlling the page grid.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Paper size
    pub format: PageFormat,

    /// Edge length of the square token image, in millimeters
    pub token_size_mm: f32,

    /// Margin on every side of the page, in millimeters
    pub margin_mm: f32,

    /// Height reserved under each token for its name, in millimeters
    pub label_height_mm: f32,

    /// Whether names are printed under tokens
    pub show_names: bool,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the paper format.
    pub fn with_format(mut self, format: PageFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the token size in millimeters.
    pub fn with_token_size(mut self, mm: f32) -> Self {
        self.token_size_mm = mm;
        self
    }

    /// Set the page margin in millimeters.
    pub fn with_margin(mut self, mm: f32) -> Self {
        self.margin_mm = mm;
        self
    }

    /// Set the label band height in millimeters.
    pub fn with_label_height(mut self, mm: f32) -> Self {
        self.label_height_mm = mm;
        self
    }

    /// Enable or disable names under tokens.
    pub fn with_names(mut self, show: bool) -> Self {
        self.show_names = show;
        self
    }

    /// Cell height in millimeters, including the label band when names are shown.
    pub fn cell_height_mm(&self) -> f32 {
        if self.show_names {
            self.token_size_mm + self.label_height_mm
        } else {
            self.token_size_mm
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            format: PageFormat::A4,
            token_size_mm: DEFAULT_TOKEN_SIZE_MM,
            margin_mm: DEFAULT_MARGIN_MM,
            label_height_mm: DEFAULT_LABEL_HEIGHT_MM,
            show_names: false,
        }
    }
}
