//! Token resolution: from parsed specs to decoded, shareable images.
//!
//! Creatures are looked up in the token library first and then, when one is
//! configured, in a [`RemoteSource`]. Local files are read directly. Decoded
//! images are cached by key, so repeated entries share one bitmap.

mod decode;
mod options;

pub use decode::{decode_token_image, load_token_image};
pub use options::ResolveOptions;

use crate::error::{Error, Result};
use crate::model::{Token, TokenImage};
use crate::parser::{TokenSource, TokenSpec};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File extensions tried, in order, when looking a creature up in the library.
pub const LIBRARY_EXTENSIONS: &[&str] = &["webp", "png", "jpg", "jpeg"];

/// A source of creature token images outside the local library.
pub trait RemoteSource {
    /// Short name for log messages.
    fn name(&self) -> &str;

    /// Fetch the raw image bytes for a creature.
    ///
    /// Returns `Ok(None)` when the source has no such creature.
    fn fetch(&self, book: &str, creature: &str) -> Result<Option<Vec<u8>>>;
}

/// Resolves token specs into [`Token`]s.
pub struct TokenResolver {
    options: ResolveOptions,
    remote: Option<Box<dyn RemoteSource>>,
    cache: HashMap<String, Arc<TokenImage>>,
}

impl TokenResolver {
    /// Create a resolver without a remote source.
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            options,
            remote: None,
            cache: HashMap::new(),
        }
    }

    /// Fall back to a remote source for creatures missing from the library.
    pub fn with_remote(mut self, remote: Box<dyn RemoteSource>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Resolver options.
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Parse an entry with this resolver's default book.
    pub fn parse(&self, input: &str) -> Result<TokenSpec> {
        TokenSpec::parse(input, &self.options.default_book)
    }

    /// Resolve a single spec.
    pub fn resolve(&mut self, spec: &TokenSpec) -> Result<Token> {
        let image = match &spec.source {
            TokenSource::Local(path) => self.resolve_local(path)?,
            TokenSource::Library { book, creature } => self.resolve_creature(book, creature)?,
        };
        Ok(Token::new(image, spec.display_name(), spec.times))
    }

    /// Resolve every spec in order, failing on the first unresolvable one.
    pub fn resolve_all(&mut self, specs: &[TokenSpec]) -> Result<Vec<Token>> {
        specs.iter().map(|spec| self.resolve(spec)).collect()
    }

    /// Number of distinct images decoded so far.
    pub fn cached_images(&self) -> usize {
        self.cache.len()
    }

    /// Library file for a creature, if one exists.
    pub fn library_path(&self, book: &str, creature: &str) -> Option<PathBuf> {
        let root = self.options.library_dir.as_ref()?;
        let book_dir = root.join(book);
        LIBRARY_EXTENSIONS
            .iter()
            .map(|ext| book_dir.join(format!("{}.{}", creature, ext)))
            .find(|p| p.is_file())
    }

    fn resolve_local(&mut self, path: &Path) -> Result<Arc<TokenImage>> {
        if !path.is_file() {
            return Err(Error::UnreadableImage {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        let key = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string();
        if let Some(image) = self.cache.get(&key) {
            return Ok(Arc::clone(image));
        }

        log::debug!("loading local token {}", path.display());
        let image = load_token_image(path, &key, self.options.max_image_px)?;
        Ok(self.remember(key, image))
    }

    fn resolve_creature(&mut self, book: &str, creature: &str) -> Result<Arc<TokenImage>> {
        let key = format!("{}/{}", book, creature);
        if let Some(image) = self.cache.get(&key) {
            return Ok(Arc::clone(image));
        }

        if let Some(path) = self.library_path(book, creature) {
            log::debug!("{} found in library at {}", key, path.display());
            let image = load_token_image(&path, &key, self.options.max_image_px)?;
            return Ok(self.remember(key, image));
        }

        if let Some(remote) = &self.remote {
            log::info!("{} not in library, fetching from {}", key, remote.name());
            if let Some(data) = remote.fetch(book, creature)? {
                let image = decode_token_image(&key, &data, self.options.max_image_px)?;
                return Ok(self.remember(key, image));
            }
        }

        log::warn!("no token image for {}", key);
        Err(Error::UnknownCreature {
            book: book.to_string(),
            creature: creature.to_string(),
        })
    }

    fn remember(&mut self, key: String, image: TokenImage) -> Arc<TokenImage> {
        let image = Arc::new(image);
        self.cache.insert(key, Arc::clone(&image));
        image
    }
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new(ResolveOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingRemote {
        data: Option<Vec<u8>>,
        calls: std::rc::Rc<Cell<usize>>,
    }

    impl RemoteSource for CountingRemote {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch(&self, _book: &str, _creature: &str) -> Result<Option<Vec<u8>>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.data.clone())
        }
    }

    fn tiny_png() -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 2))
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_unknown_creature_without_library() {
        let mut resolver = TokenResolver::default();
        let spec = resolver.parse("Goblin").unwrap();
        let err = resolver.resolve(&spec).unwrap_err();
        assert!(matches!(err, Error::UnknownCreature { ref book, ref creature }
            if book == "MM" && creature == "Goblin"));
    }

    #[test]
    fn test_remote_fetch_is_cached() {
        let calls = std::rc::Rc::new(Cell::new(0));
        let remote = CountingRemote {
            data: Some(tiny_png()),
            calls: calls.clone(),
        };
        let mut resolver = TokenResolver::default().with_remote(Box::new(remote));

        let spec = resolver.parse("MM/Goblin:3").unwrap();
        let first = resolver.resolve(&spec).unwrap();
        let second = resolver.resolve(&spec).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first.image, &second.image));
        assert_eq!(first.count, 3);
        assert_eq!(first.name, "Goblin");
    }

    #[test]
    fn test_remote_miss_is_unknown_creature() {
        let remote = CountingRemote {
            data: None,
            calls: Default::default(),
        };
        let mut resolver = TokenResolver::default().with_remote(Box::new(remote));
        let spec = resolver.parse("MM/Nothing").unwrap();
        assert!(matches!(
            resolver.resolve(&spec),
            Err(Error::UnknownCreature { .. })
        ));
    }

    #[test]
    fn test_remote_html_page_names_token() {
        let remote = CountingRemote {
            data: Some(b"<!DOCTYPE html><html><body>Not here</body></html>".to_vec()),
            calls: Default::default(),
        };
        let mut resolver = TokenResolver::default().with_remote(Box::new(remote));
        let spec = resolver.parse("MM/Goblin:2").unwrap();

        let err = resolver.resolve(&spec).unwrap_err();
        assert!(matches!(err, Error::InvalidTokenImage { ref token, .. } if token == "MM/Goblin"));
        assert!(err.to_string().contains("Goblin"));
        assert_eq!(resolver.cached_images(), 0);
    }

    #[test]
    fn test_missing_local_file() {
        let mut resolver = TokenResolver::default();
        let spec = resolver.parse("./missing-token.png:2").unwrap();
        assert!(matches!(
            resolver.resolve(&spec),
            Err(Error::UnreadableImage { .. })
        ));
    }

    #[test]
    fn test_default_book_from_options() {
        let resolver = TokenResolver::new(ResolveOptions::new().with_default_book("VGM"));
        let spec = resolver.parse("Bullywug").unwrap();
        assert_eq!(spec.to_string(), "VGM/Bullywug:1");
    }
}
