//! Parsing of `[<book>/]<creature>[:<times>]` and `<local-path>[:<times>]` entries.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Book used when a creature is given without one (Monster Manual).
pub const DEFAULT_BOOK: &str = "MM";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Where a token image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenSource {
    /// A creature from a named book of the token library
    Library {
        /// Book abbreviation, e.g. "MM"
        book: String,
        /// Creature name as written, e.g. "Goblin"
        creature: String,
    },
    /// An image file on disk
    Local(PathBuf),
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Library { book, creature } => write!(f, "{}/{}", book, creature),
            TokenSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One parsed `--tokens` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    /// Image source
    pub source: TokenSource,

    /// Number of copies, at least 1
    pub times: u32,
}

impl TokenSpec {
    /// Parse an entry, using `default_book` when no book is given.
    ///
    /// An entry naming an existing file is a local token; anything else is a
    /// library creature.
    ///
    /// # Example
    ///
    /// ```
    /// use tokensheet::parser::{TokenSource, TokenSpec};
    ///
    /// let spec = TokenSpec::parse("MM/Goblin:6", "MM").unwrap();
    /// assert_eq!(spec.times, 6);
    /// assert_eq!(
    ///     spec.source,
    ///     TokenSource::Library { book: "MM".into(), creature: "Goblin".into() }
    /// );
    /// ```
    pub fn parse(input: &str, default_book: &str) -> Result<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(Error::InvalidTokenSpec("empty token".to_string()));
        }

        let (body, times) = split_times(raw)?;
        if body.is_empty() {
            return Err(invalid(raw, "missing creature or path"));
        }

        let source = classify(body, default_book).map_err(|reason| invalid(raw, reason))?;
        Ok(Self { source, times })
    }

    /// Display name used for labels: the creature name or the file stem.
    pub fn display_name(&self) -> String {
        match &self.source {
            TokenSource::Library { creature, .. } => creature.clone(),
            TokenSource::Local(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    /// Check if this entry refers to a file on disk.
    pub fn is_local(&self) -> bool {
        matches!(self.source, TokenSource::Local(_))
    }
}

impl FromStr for TokenSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, DEFAULT_BOOK)
    }
}

impl fmt::Display for TokenSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.times)
    }
}

/// Parse every entry, stopping at the first malformed one.
pub fn parse_token_specs<S: AsRef<str>>(inputs: &[S], default_book: &str) -> Result<Vec<TokenSpec>> {
    inputs
        .iter()
        .map(|s| TokenSpec::parse(s.as_ref(), default_book))
        .collect()
}

fn invalid(raw: &str, reason: &str) -> Error {
    Error::InvalidTokenSpec(format!("'{}': {}", raw, reason))
}

/// Split a trailing `:<times>` off the entry.
fn split_times(raw: &str) -> Result<(&str, u32)> {
    let Some((head, tail)) = raw.rsplit_once(':') else {
        return Ok((raw, 1));
    };

    if tail.is_empty() {
        return Err(invalid(raw, "missing count after ':'"));
    }

    if tail.bytes().all(|b| b.is_ascii_digit()) {
        let times: u32 = tail
            .parse()
            .map_err(|_| invalid(raw, "count is too large"))?;
        if times == 0 {
            return Err(invalid(raw, "count must be at least 1"));
        }
        return Ok((head.trim_end(), times));
    }

    // Windows drive prefix such as `C:\tokens\goblin.png`.
    if is_drive_prefix(head) && tail.starts_with(['\\', '/']) {
        return Ok((raw, 1));
    }

    Err(invalid(raw, "count after ':' must be a positive integer"))
}

fn is_drive_prefix(head: &str) -> bool {
    head.len() == 1 && head.bytes().all(|b| b.is_ascii_alphabetic())
}

fn looks_like_path(body: &str) -> bool {
    let path = Path::new(body);
    body.starts_with(['.', '/', '\\', '~'])
        || body.contains('\\')
        || body.matches('/').count() > 1
        || path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn classify(body: &str, default_book: &str) -> std::result::Result<TokenSource, &'static str> {
    if Path::new(body).is_file() || looks_like_path(body) {
        return Ok(TokenSource::Local(PathBuf::from(body)));
    }

    let (book, creature) = match body.split_once('/') {
        Some((book, creature)) => (book.trim(), creature.trim()),
        None => (default_book, body),
    };

    if book.is_empty() {
        return Err("missing book before '/'");
    }
    if creature.is_empty() {
        return Err("missing creature name");
    }

    Ok(TokenSource::Library {
        book: book.to_string(),
        creature: creature.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library(book: &str, creature: &str) -> TokenSource {
        TokenSource::Library {
            book: book.to_string(),
            creature: creature.to_string(),
        }
    }

    #[test]
    fn test_book_creature_times() {
        let spec: TokenSpec = "MM/Goblin:6".parse().unwrap();
        assert_eq!(spec.source, library("MM", "Goblin"));
        assert_eq!(spec.times, 6);
    }

    #[test]
    fn test_bare_creature_uses_default_book() {
        let spec: TokenSpec = "Wight".parse().unwrap();
        assert_eq!(spec.source, library("MM", "Wight"));
        assert_eq!(spec.times, 1);
    }

    #[test]
    fn test_default_book_is_a_parameter() {
        let spec = TokenSpec::parse("Bullywug:2", "VGM").unwrap();
        assert_eq!(spec.source, library("VGM", "Bullywug"));
        assert_eq!(spec.times, 2);
    }

    #[test]
    fn test_names_with_spaces() {
        let spec: TokenSpec = " MM/Goblin Boss:3 ".parse().unwrap();
        assert_eq!(spec.source, library("MM", "Goblin Boss"));
        assert_eq!(spec.display_name(), "Goblin Boss");
    }

    #[test]
    fn test_local_path_by_extension() {
        let spec: TokenSpec = "local-token.png:2".parse().unwrap();
        assert_eq!(spec.source, TokenSource::Local(PathBuf::from("local-token.png")));
        assert_eq!(spec.times, 2);
        assert_eq!(spec.display_name(), "local-token");
        assert!(spec.is_local());
    }

    #[test]
    fn test_existing_file_is_local() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orc");
        std::fs::write(&path, b"not checked here").unwrap();

        let input = format!("{}:3", path.display());
        let spec: TokenSpec = input.parse().unwrap();
        assert_eq!(spec.source, TokenSource::Local(path));
        assert_eq!(spec.times, 3);
    }

    #[test]
    fn test_windows_drive_path() {
        let spec: TokenSpec = r"C:\tokens\goblin.png".parse().unwrap();
        assert!(spec.is_local());
        assert_eq!(spec.times, 1);

        let spec: TokenSpec = r"C:\tokens\goblin.png:4".parse().unwrap();
        assert!(spec.is_local());
        assert_eq!(spec.times, 4);
    }

    #[test]
    fn test_malformed_specs() {
        for input in ["", "   ", "MM/Goblin:", "MM/Goblin:x", "MM/Goblin:0", "MM/", ":3"] {
            let result: Result<TokenSpec> = input.parse();
            assert!(
                matches!(result, Err(Error::InvalidTokenSpec(_))),
                "expected error for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_error_names_offending_token() {
        let err = "MM/Goblin:lots".parse::<TokenSpec>().unwrap_err();
        assert!(err.to_string().contains("MM/Goblin:lots"));
    }

    #[test]
    fn test_parse_token_specs_stops_at_first_error() {
        let specs = parse_token_specs(&["Goblin:2", "Wight"], DEFAULT_BOOK).unwrap();
        assert_eq!(specs.len(), 2);

        assert!(parse_token_specs(&["Goblin", "Orc:none"], DEFAULT_BOOK).is_err());
    }
}
