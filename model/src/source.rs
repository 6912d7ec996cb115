use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Somewhere chunk files and manifests can be fetched from, by a '/'-separated relative path.
pub trait ChunkSource {
    /// Any failure (missing file, bad status, unreadable body) is an error.
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Reads files below a local directory.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl ChunkSource for DirSource {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let path = self.root.join(path.trim_start_matches('/'));
        Ok(fs_err::tokio::read_to_string(path).await?)
    }
}

/// Fetches over HTTP, relative to a base URL.
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl ChunkSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let resp = resp.error_for_status()?;
        Ok(resp.text().await?)
    }
}

/// Serves files already held in memory. A missing path behaves like a 404.
#[derive(Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<P: Into<String>, T: Into<String>>(&mut self, path: P, text: T) {
        self.files.insert(path.into(), text.into());
    }
}

impl ChunkSource for MemorySource {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        match self.files.get(path.trim_start_matches('/')) {
            Some(text) => Ok(text.clone()),
            None => bail!("{path}: 404 Not Found"),
        }
    }
}

/// Picks a source from a data root: URLs are fetched over HTTP, anything else is a directory.
pub enum DataSource {
    Dir(DirSource),
    Http(HttpSource),
}

impl DataSource {
    pub fn from_root(root: &str) -> Self {
        if root.starts_with("http://") || root.starts_with("https://") {
            Self::Http(HttpSource::new(root))
        } else {
            Self::Dir(DirSource::new(root))
        }
    }
}

impl ChunkSource for DataSource {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        match self {
            Self::Dir(source) => source.fetch_text(path).await,
            Self::Http(source) => source.fetch_text(path).await,
        }
    }
}
