//! pdfcatalog - Searchable list view over a CSV-described PDF catalog
//!
//! Fetches a small initial dataset and the complete dataset concurrently,
//! then serves a searchable, paginated table of entries linking to the
//! underlying PDF files.
//!
//! # Features
//!
//! - **Incremental load**: the first page shows as soon as the initial CSV
//!   arrives while the full CSV is still loading
//! - **Search**: case-insensitive substring match over title and keywords
//! - **Pagination**: fixed pages of ten rows
//! - **Terminal UI**: open or copy document links from the table
//!
//! # Example
//!
//! ```no_run
//! use pdfcatalog::{Action, AppConfig, ViewState};
//!
//! fn main() -> pdfcatalog::Result<()> {
//!     let config = AppConfig::default();
//!     let handle = config.loader()?.spawn()?;
//!
//!     let mut view = ViewState::default();
//!     while let Some(action) = handle.next_action() {
//!         view = view.reduce(action);
//!     }
//!
//!     let view = view.reduce(Action::SetQuery("manual".to_string()));
//!     for record in view.page().rows {
//!         println!("{} -> {}", record.title, record.path);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod logging;
pub mod record;
pub mod source;
pub mod tui;
pub mod view;

// Re-export main types
pub use error::{CatalogError, Result};
pub use loader::{load_dataset, Loader, LoaderHandle};
pub use record::{parse_csv, Record};
pub use source::{CsvSource, DirSource, HttpSource, ALL_DATA_PATH, INITIAL_DATA_PATH};
pub use view::{Action, DatasetKind, Page, ViewState, PAGE_SIZE};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where the CSV datasets are served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    /// HTTP(S) server root
    Http(String),
    /// Local directory laid out like the server root
    Dir(PathBuf),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Dataset location
    pub location: DataLocation,
    /// Path of the initial dataset
    pub initial_path: String,
    /// Path of the complete dataset
    pub all_path: String,
    /// Per-request timeout; `None` waits forever
    pub timeout: Option<Duration>,
    /// User agent sent with HTTP requests
    pub user_agent: String,
    /// Log file; `None` uses the default next to the executable
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            location: DataLocation::Http(DEFAULT_BASE_URL.to_string()),
            initial_path: INITIAL_DATA_PATH.to_string(),
            all_path: ALL_DATA_PATH.to_string(),
            timeout: None,
            user_agent: format!("pdfcatalog/{}", VERSION),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Build the data source for the configured location
    pub fn source(&self) -> Result<Arc<dyn CsvSource>> {
        let source: Arc<dyn CsvSource> = match &self.location {
            DataLocation::Http(base) => {
                Arc::new(HttpSource::new(base, self.timeout, &self.user_agent)?)
            }
            DataLocation::Dir(root) => {
                if !root.is_dir() {
                    return Err(CatalogError::Config(format!(
                        "'{}' is not a directory",
                        root.display()
                    )));
                }
                Arc::new(DirSource::new(root))
            }
        };
        Ok(source)
    }

    /// Loader over an existing source with the configured paths
    pub fn loader_for(&self, source: Arc<dyn CsvSource>) -> Loader {
        Loader::new(source).with_paths(&self.initial_path, &self.all_path)
    }

    /// Loader over a fresh source
    pub fn loader(&self) -> Result<Loader> {
        Ok(self.loader_for(self.source()?))
    }

    /// Log file to use for the interactive view
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(logging::default_log_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_well_known_paths() {
        let config = AppConfig::default();
        assert_eq!(config.initial_path, "/initial-data.csv");
        assert_eq!(config.all_path, "/all-data.csv");
        assert!(config.timeout.is_none());
        assert!(config.source().is_ok());
    }

    #[test]
    fn missing_directory_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            location: DataLocation::Dir(dir.path().join("nope")),
            ..Default::default()
        };
        assert!(matches!(config.source().err(), Some(CatalogError::Config(_))));
    }
}
