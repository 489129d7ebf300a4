//! Page-level types.

use super::token::{serialize_image_key, TokenImage};
use crate::error::{Error, Result};
use crate::layout::mm_to_pt;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PageFormat {
    /// 210 x 297 mm
    #[default]
    A4,
    /// 297 x 420 mm
    A3,
}

impl PageFormat {
    /// All supported formats.
    pub const ALL: [PageFormat; 2] = [PageFormat::A4, PageFormat::A3];

    /// Paper width in millimeters.
    pub fn width_mm(self) -> f32 {
        match self {
            PageFormat::A4 => 210.0,
            PageFormat::A3 => 297.0,
        }
    }

    /// Paper height in millimeters.
    pub fn height_mm(self) -> f32 {
        match self {
            PageFormat::A4 => 297.0,
            PageFormat::A3 => 420.0,
        }
    }

    /// Paper width in points (1 point = 1/72 inch).
    pub fn width_pt(self) -> f32 {
        mm_to_pt(self.width_mm())
    }

    /// Paper height in points.
    pub fn height_pt(self) -> f32 {
        mm_to_pt(self.height_mm())
    }

    /// Page dimensions as (width, height) in points.
    pub fn dimensions(self) -> (f32, f32) {
        (self.width_pt(), self.height_pt())
    }

    /// Format name as printed on the command line.
    pub fn name(self) -> &'static str {
        match self {
            PageFormat::A4 => "A4",
            PageFormat::A3 => "A3",
        }
    }
}

impl std::fmt::Display for PageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A4" => Ok(PageFormat::A4),
            "A3" => Ok(PageFormat::A3),
            other => Err(Error::Geometry(format!("unsupported page format '{}'", other))),
        }
    }
}

/// A token placed in a grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedToken {
    /// Shared decoded image
    #[serde(serialize_with = "serialize_image_key")]
    pub image: Arc<TokenImage>,

    /// Label, present only when names are shown
    pub name: Option<String>,

    /// Grid row (0-based, top to bottom)
    pub row: u32,

    /// Grid column (0-based, left to right)
    pub column: u32,

    /// Left edge in points from the page's left edge, margin included
    pub x: f32,

    /// Top edge in points from the page's top edge, margin included
    pub y: f32,
}

/// A single page of the token sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Paper size
    pub format: PageFormat,

    /// Placed tokens in row-major order
    pub cells: Vec<PlacedToken>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32, format: PageFormat) -> Self {
        Self {
            number,
            format,
            cells: Vec::new(),
        }
    }

    /// Number of placed tokens.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the page holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Page dimensions as (width, height) in points.
    pub fn dimensions(&self) -> (f32, f32) {
        self.format.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dimensions() {
        let (w, h) = PageFormat::A4.dimensions();
        assert!((w - 595.28).abs() < 0.01);
        assert!((h - 841.89).abs() < 0.01);

        assert_eq!(PageFormat::A3.width_mm(), PageFormat::A4.height_mm());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("A4".parse::<PageFormat>().unwrap(), PageFormat::A4);
        assert_eq!("a3".parse::<PageFormat>().unwrap(), PageFormat::A3);
        assert!("Letter".parse::<PageFormat>().is_err());
    }

    #[test]
    fn test_page_new() {
        let page = Page::new(1, PageFormat::A3);
        assert!(page.is_empty());
        assert_eq!(page.len(), 0);
        assert_eq!(page.format.to_string(), "A3");
    }
}
