//! Remote icon source: the directory listing and raw module contents.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::SourceConfig;
use crate::error::{Error, Result};

/// One entry of the remote directory listing.
///
/// Only the fields the gallery needs; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEntry {
    /// File name, e.g. `icon-add.ts`.
    pub name: String,
    /// Raw content URL. `None` for directories.
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Abstraction over the remote endpoints for testability.
#[async_trait]
pub trait IconSource: Send + Sync {
    /// Fetches the directory listing.
    async fn list(&self) -> Result<Vec<RemoteEntry>>;

    /// Fetches the raw text behind `url`.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Icon source backed by the GitHub contents API.
#[derive(Debug, Clone)]
pub struct GithubSource {
    http: reqwest::Client,
    listing_url: String,
}

impl GithubSource {
    /// Creates a source listing `listing_url` with the given client.
    #[must_use]
    pub fn new(http: reqwest::Client, listing_url: impl Into<String>) -> Self {
        Self {
            http,
            listing_url: listing_url.into(),
        }
    }

    /// Creates a source from configuration with a default client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Ok(Self::new(build_http_client()?, config.listing_url.clone()))
    }

    /// The listing endpoint.
    #[must_use]
    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl IconSource for GithubSource {
    async fn list(&self) -> Result<Vec<RemoteEntry>> {
        let body = self.get_text(&self.listing_url).await?;
        let entries: Vec<RemoteEntry> = serde_json::from_str(&body)?;
        log::debug!("Listing returned {} entries", entries.len());
        Ok(entries)
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }
}

/// Builds the HTTP client used for GitHub requests.
///
/// GitHub rejects API requests without a `User-Agent`.
///
/// # Errors
///
/// Returns an error if the client cannot be built.
pub fn build_http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("icon-gallery/", env!("CARGO_PKG_VERSION")))
        .pool_idle_timeout(Duration::from_secs(60))
        .tcp_keepalive(Duration::from_secs(30))
        .build()?)
}
