//! Error types for the icon-gallery library.

use thiserror::Error;

/// Errors that can occur while fetching, caching or serving icons.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("GitHub API error: {status} ({url})")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code returned.
        status: u16,
    },

    /// Fetching the raw content of a single icon module failed.
    #[error("Failed to fetch icon module: {name} ({reason})")]
    ItemFetch {
        /// File name of the module.
        name: String,
        /// Underlying failure.
        reason: String,
    },

    /// The refresh failed and nothing was cached to fall back on.
    #[error("No icons available: {0}")]
    NoIcons(String),

    /// I/O error during store or cache operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A URL could not be parsed or resolved.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A cache generation name that cannot be used as a directory name.
    #[error("Invalid cache name: {0}")]
    InvalidCacheName(String),

    /// Pre-caching an offline asset failed, aborting the install.
    #[error("Offline install failed for {url}: {reason}")]
    Install {
        /// Asset URL that could not be cached.
        url: String,
        /// Underlying failure.
        reason: String,
    },
}

/// A specialized `Result` type for icon-gallery operations.
pub type Result<T> = std::result::Result<T, Error>;
