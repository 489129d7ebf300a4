//! Remote token images from the 5e.tools bestiary.

use reqwest::StatusCode;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tokensheet::{Error, RemoteSource, Result};

const TOKEN_URL_BASE: &str = "https://5e.tools/img/bestiary/tokens";
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const CACHE_DIR_NAME: &str = "tokensheet";

/// Downloads creature tokens and keeps a copy in the system temp directory.
pub struct BestiaryFetcher {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
    cache_dir: PathBuf,
}

impl BestiaryFetcher {
    /// Create a fetcher against the public bestiary.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("tokensheet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            client,
            runtime,
            base_url: TOKEN_URL_BASE.to_string(),
            cache_dir: std::env::temp_dir().join(CACHE_DIR_NAME),
        })
    }

    /// Use a different cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    fn url(&self, book: &str, creature: &str) -> String {
        format!(
            "{}/{}/{}.webp",
            self.base_url,
            encode_segment(book),
            encode_segment(creature)
        )
    }

    fn cache_path(&self, book: &str, creature: &str) -> PathBuf {
        let sanitize = |s: &str| s.replace(['/', '\\', ':'], "_");
        self.cache_dir
            .join(format!("{}_{}.webp", sanitize(book), sanitize(creature)))
    }

    async fn download(&self, url: &str) -> std::result::Result<Option<Vec<u8>>, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let bytes = response.error_for_status()?.bytes().await?;
        Ok(Some(bytes.to_vec()))
    }
}

impl RemoteSource for BestiaryFetcher {
    fn name(&self) -> &str {
        "5e.tools"
    }

    fn fetch(&self, book: &str, creature: &str) -> Result<Option<Vec<u8>>> {
        let cached = self.cache_path(book, creature);
        if cached.is_file() {
            log::debug!("using cached token {}", cached.display());
            return Ok(Some(fs::read(&cached)?));
        }

        let url = self.url(book, creature);
        log::debug!("GET {}", url);
        let data = self
            .runtime
            .block_on(self.download(&url))
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

        if let Some(bytes) = &data {
            let stored = fs::create_dir_all(&self.cache_dir).and_then(|_| fs::write(&cached, bytes));
            if let Err(e) = stored {
                log::warn!("could not cache {}: {}", cached.display(), e);
            }
        }

        Ok(data)
    }
}

/// Percent-encode the characters that show up in creature names.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' | '(' | ')' => out.push(c),
            _ => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", b));
                }
            }
        }
    }
    out
}
