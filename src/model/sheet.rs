//! Sheet-level types.

use super::{Page, PageFormat};
use crate::layout::GridGeometry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// A fully paginated token sheet, ready for a renderer.
#[derive(Debug, Clone, Serialize)]
pub struct TokenSheet {
    /// Sheet metadata
    pub metadata: Metadata,

    /// Paper size shared by every page
    pub format: PageFormat,

    /// Grid the pages were laid out on
    pub geometry: GridGeometry,

    /// Pages in print order
    pub pages: Vec<Page>,
}

impl TokenSheet {
    /// Create a sheet from paginated pages.
    pub fn new(format: PageFormat, geometry: GridGeometry, pages: Vec<Page>) -> Self {
        Self {
            metadata: Metadata::default(),
            format,
            geometry,
            pages,
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Total number of placed tokens across all pages.
    pub fn token_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// Number of distinct images used on the sheet.
    pub fn distinct_images(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| p.cells.iter())
            .map(|c| c.image.key.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Check if the sheet has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Sheet metadata written to the PDF info dictionary.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    /// Document title
    pub title: String,

    /// Creator application
    pub creator: String,

    /// Creation date
    pub created: DateTime<Utc>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: "Creature tokens".to_string(),
            creator: format!("tokensheet {}", env!("CARGO_PKG_VERSION")),
            created: Utc::now(),
        }
    }
}
