//! Error types for pdfcatalog
//!
//! Load failures (network, status, I/O, CSV) are swallowed at the fetch
//! boundary; everything else propagates to the CLI.

use thiserror::Error;

/// Main error type for pdfcatalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GET {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Result type alias for pdfcatalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
