//! # tokensheet
//!
//! Lay out creature token images on printable pages and write them as PDF.
//!
//! Token entries such as `MM/Goblin:6` or `./my-token.png:2` are resolved to
//! decoded images, expanded into one placement per copy, and paginated into a
//! fixed grid of equally sized cells on A4 or A3 paper.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tokensheet::Tokensheet;
//!
//! fn main() -> tokensheet::Result<()> {
//!     Tokensheet::new()
//!         .with_library("./tokens")
//!         .with_names(true)
//!         .resolve(&["MM/Goblin:6", "Wight"])?
//!         .write_pdf("tokens.pdf")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Parse**: [`parser::TokenSpec`] reads the `[<book>/]<creature>[:<times>]` syntax
//! - **Resolve**: [`resolve::TokenResolver`] finds and decodes images, sharing repeats
//! - **Expand**: [`expand_tokens`] flattens repetition counts into placements
//! - **Paginate**: [`layout::paginate`] fills pages row-major on a [`GridGeometry`]
//! - **Render**: [`render::to_pdf`] embeds each image once and draws optional names

pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod resolve;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, TokenFormat};
pub use error::{Error, Result};
pub use layout::{paginate, GridGeometry, LayoutOptions};
pub use model::{
    expand_tokens, Metadata, Page, PageFormat, Placement, PlacedToken, Token, TokenImage,
    TokenSheet,
};
pub use parser::{TokenSource, TokenSpec, DEFAULT_BOOK};
pub use render::{JsonFormat, RenderOptions};
pub use resolve::{RemoteSource, ResolveOptions, TokenResolver};

use std::path::Path;

/// Lay resolved tokens out on pages.
///
/// The grid is validated first, so a page that cannot hold one token cell is
/// reported before anything is paginated.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tokensheet::{build_sheet, LayoutOptions, Token, TokenImage};
///
/// let goblin = Token::new(Arc::new(TokenImage::blank("MM/Goblin", 8)), "Goblin", 6);
/// let sheet = build_sheet(&[goblin], &LayoutOptions::default()).unwrap();
/// assert_eq!(sheet.page_count(), 1);
/// assert_eq!(sheet.token_count(), 6);
/// ```
pub fn build_sheet(tokens: &[Token], options: &LayoutOptions) -> Result<TokenSheet> {
    let geometry = GridGeometry::from_options(options)?;
    Ok(layout_tokens(tokens, geometry, options))
}

fn layout_tokens(tokens: &[Token], geometry: GridGeometry, options: &LayoutOptions) -> TokenSheet {
    let placements = expand_tokens(tokens, options.show_names);
    let pages = paginate(placements, &geometry, options.format);
    TokenSheet::new(options.format, geometry, pages)
}

/// Builder for resolving token entries and producing a sheet.
///
/// # Example
///
/// ```no_run
/// use tokensheet::{PageFormat, Tokensheet};
///
/// let sheet = Tokensheet::new()
///     .with_format(PageFormat::A3)
///     .with_library("./tokens")
///     .with_default_book("VGM")
///     .resolve(&["Bullywug:4", "MM/Goblin Boss"])?;
/// println!("{} pages", sheet.sheet().page_count());
/// # Ok::<(), tokensheet::Error>(())
/// ```
pub struct Tokensheet {
    layout_options: LayoutOptions,
    resolve_options: ResolveOptions,
    render_options: RenderOptions,
    remote: Option<Box<dyn RemoteSource>>,
}

impl Tokensheet {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            layout_options: LayoutOptions::default(),
            resolve_options: ResolveOptions::default(),
            render_options: RenderOptions::default(),
            remote: None,
        }
    }

    /// Set the paper format.
    pub fn with_format(mut self, format: PageFormat) -> Self {
        self.layout_options = self.layout_options.with_format(format);
        self
    }

    /// Print names under tokens.
    pub fn with_names(mut self, show: bool) -> Self {
        self.layout_options = self.layout_options.with_names(show);
        self
    }

    /// Set the token size in millimeters.
    pub fn with_token_size(mut self, mm: f32) -> Self {
        self.layout_options = self.layout_options.with_token_size(mm);
        self
    }

    /// Set the page margin in millimeters.
    pub fn with_margin(mut self, mm: f32) -> Self {
        self.layout_options = self.layout_options.with_margin(mm);
        self
    }

    /// Set the token library root.
    pub fn with_library(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.resolve_options = self.resolve_options.with_library(dir);
        self
    }

    /// Set the book used for creatures given without one.
    pub fn with_default_book(mut self, book: impl Into<String>) -> Self {
        self.resolve_options = self.resolve_options.with_default_book(book);
        self
    }

    /// Fall back to a remote source for creatures missing from the library.
    pub fn with_remote(mut self, remote: Box<dyn RemoteSource>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Parse, resolve and paginate token entries.
    pub fn resolve<S: AsRef<str>>(self, entries: &[S]) -> Result<SheetResult> {
        let geometry = GridGeometry::from_options(&self.layout_options)?;

        let mut resolver = TokenResolver::new(self.resolve_options);
        if let Some(remote) = self.remote {
            resolver = resolver.with_remote(remote);
        }

        let specs = parser::parse_token_specs(entries, &resolver.options().default_book)?;
        let tokens = resolver.resolve_all(&specs)?;
        let sheet = layout_tokens(&tokens, geometry, &self.layout_options);

        Ok(SheetResult {
            sheet,
            render_options: self.render_options,
        })
    }
}

impl Default for Tokensheet {
    fn default() -> Self {
        Self::new()
    }
}

/// A paginated sheet with the options to render it.
pub struct SheetResult {
    sheet: TokenSheet,
    render_options: RenderOptions,
}

impl SheetResult {
    /// Render to PDF bytes.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        render::to_pdf(&self.sheet, &self.render_options)
    }

    /// Render and write a PDF file.
    pub fn write_pdf<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        render::write_pdf(&self.sheet, path, &self.render_options)
    }

    /// Render the layout as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.sheet, format)
    }

    /// Get the sheet.
    pub fn sheet(&self) -> &TokenSheet {
        &self.sheet
    }
}
