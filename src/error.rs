//! Error types for tokensheet.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tokensheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building a token sheet.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A `--tokens` entry could not be parsed.
    #[error("Invalid token spec: {0}")]
    InvalidTokenSpec(String),

    /// The creature is neither in the library nor available remotely.
    #[error("Unknown creature '{creature}' in book '{book}'")]
    UnknownCreature {
        /// Book the creature was looked up in
        book: String,
        /// Creature name as given on the command line
        creature: String,
    },

    /// A token image exists but cannot be read or decoded.
    #[error("Cannot read token image {}: {reason}", path.display())]
    UnreadableImage {
        /// Path of the offending image
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Bytes obtained for a token do not decode as an image.
    #[error("Token {token} is not a usable image: {reason}")]
    InvalidTokenImage {
        /// Token key, `BOOK/Creature` or the local path
        token: String,
        /// Underlying cause
        reason: String,
    },

    /// The image bytes are not one of the supported bitmap formats.
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    /// The page cannot hold a single token cell.
    #[error("Invalid page geometry: {0}")]
    Geometry(String),

    /// The output file could not be written.
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O cause
        #[source]
        source: io::Error,
    },

    /// Error assembling the PDF document.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Error during rendering (JSON layout dumps).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Remote token download failed.
    #[error("Fetch error: {0}")]
    Fetch(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}
