//! CSV data sources
//!
//! Datasets live at well-known root-relative paths. A source resolves
//! those paths against an HTTP base URL or a local directory and returns the
//! raw body.

use crate::error::{CatalogError, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Path of the small first-page dataset
pub const INITIAL_DATA_PATH: &str = "/initial-data.csv";
/// Path of the complete dataset
pub const ALL_DATA_PATH: &str = "/all-data.csv";

/// Anything that can return the CSV text stored at a dataset path
pub trait CsvSource: Send + Sync {
    /// Resolve a dataset path or a record link against this source.
    /// Absolute URLs pass through unchanged.
    fn locate(&self, path: &str) -> String;

    /// Fetch the body at `path`
    fn fetch(&self, path: &str) -> Result<String>;
}

/// Fetches datasets over HTTP(S) with a blocking client
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    /// Create a source rooted at `base_url`.
    ///
    /// `timeout` of `None` waits forever.
    pub fn new(base_url: &str, timeout: Option<Duration>, user_agent: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| CatalogError::InvalidUrl(base_url.to_string(), e.to_string()))?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base })
    }

    /// Resolve a dataset path the way a browser resolves a root-relative link
    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| CatalogError::InvalidUrl(path.to_string(), e.to_string()))
    }
}

impl CsvSource for HttpSource {
    fn locate(&self, path: &str) -> String {
        self.url_for(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| path.to_string())
    }

    fn fetch(&self, path: &str) -> Result<String> {
        let url = self.url_for(path)?;
        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text()?)
    }
}

/// Reads datasets from a local directory laid out like the server root
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_for(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl CsvSource for DirSource {
    fn locate(&self, path: &str) -> String {
        if path.contains("://") {
            return path.to_string();
        }
        self.file_for(path).display().to_string()
    }

    fn fetch(&self, path: &str) -> Result<String> {
        Ok(fs::read_to_string(self.file_for(path))?)
    }
}
