//! Offline cache worker for the gallery's app shell.
//!
//! The worker owns one current cache generation, named by a version string.
//! It has three independent steps:
//!
//! - [`OfflineWorker::install`] pre-caches a fixed manifest, all or nothing,
//! - [`OfflineWorker::activate`] deletes every other generation,
//! - [`OfflineWorker::fetch`] answers same-origin requests cache-first and
//!   falls back to the network, storing successful responses.

#[cfg(feature = "serve")]
pub mod server;
pub mod storage;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use crate::config::OfflineConfig;
use crate::error::{Error, Result};

pub use storage::{CacheBucket, CacheStorage};

/// A response as the worker stores and serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl CachedResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Abstraction over outbound requests for testability.
#[async_trait]
pub trait Network: Send + Sync {
    /// Performs a GET for `url`.
    async fn fetch(&self, url: &Url) -> Result<CachedResponse>;
}

/// Network access through reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpNetwork {
    http: reqwest::Client,
}

impl HttpNetwork {
    #[must_use]
    pub const fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, url: &Url) -> Result<CachedResponse> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        Ok(CachedResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Result of intercepting a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Cross-origin request; the worker does not handle it.
    Passthrough,
    /// Served from the current generation.
    Cached(CachedResponse),
    /// Served from the network.
    Network(CachedResponse),
}

/// The offline cache worker.
pub struct OfflineWorker<N: Network = HttpNetwork> {
    origin: Url,
    cache_name: String,
    manifest: Vec<String>,
    no_cache_hosts: Vec<String>,
    storage: CacheStorage,
    network: N,
}

impl<N: Network> OfflineWorker<N> {
    /// Creates a worker for `config` using `network` for outbound requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured origin is not an absolute URL.
    pub fn new(config: &OfflineConfig, network: N) -> Result<Self> {
        let origin = Url::parse(&config.origin)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.origin)))?;
        Ok(Self {
            origin,
            cache_name: config.cache_name.clone(),
            manifest: config.manifest.clone(),
            no_cache_hosts: config.no_cache_hosts.clone(),
            storage: CacheStorage::new(&config.cache_dir),
            network,
        })
    }

    /// The app origin requests are resolved against.
    #[must_use]
    pub const fn origin(&self) -> &Url {
        &self.origin
    }

    /// Name of the current generation.
    #[must_use]
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    #[must_use]
    pub const fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Resolves a manifest-style path such as `./index.html` against the
    /// origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined onto the origin.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.origin
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))
    }

    /// Pre-caches the manifest into the current generation.
    ///
    /// # Errors
    ///
    /// Fails if any asset cannot be fetched or answers non-2xx; nothing is
    /// stored in that case.
    pub async fn install(&self) -> Result<usize> {
        let urls = self
            .manifest
            .iter()
            .map(|path| self.resolve(path))
            .collect::<Result<Vec<_>>>()?;

        let bucket = self.storage.open(&self.cache_name).await?;
        log::info!("Caching {} app assets into {}", urls.len(), self.cache_name);
        let count = bucket.add_all(&self.network, &urls).await?;
        Ok(count)
    }

    /// Deletes every generation other than the current one.
    ///
    /// Returns the deleted names.
    ///
    /// # Errors
    ///
    /// Returns an error if the generations cannot be listed or deleted.
    pub async fn activate(&self) -> Result<Vec<String>> {
        let mut deleted = Vec::new();
        for name in self.storage.keys().await? {
            if name != self.cache_name && self.storage.delete(&name).await? {
                log::info!("Deleted stale cache generation {name}");
                deleted.push(name);
            }
        }
        Ok(deleted)
    }

    /// Handles a request for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is same-origin, not cached, and the
    /// network fetch fails.
    pub async fn fetch(&self, url: &Url) -> Result<FetchOutcome> {
        if url.origin() != self.origin.origin() {
            return Ok(FetchOutcome::Passthrough);
        }

        let bucket = self.storage.open(&self.cache_name).await?;
        match bucket.match_url(url).await {
            Ok(Some(cached)) => return Ok(FetchOutcome::Cached(cached)),
            Ok(None) => {}
            Err(e) => log::warn!("Unreadable cache entry for {url}: {e}"),
        }

        let response = self.network.fetch(url).await?;
        if response.status == 200
            && self.is_cacheable(url)
            && let Err(e) = bucket.put(url, &response).await
        {
            log::warn!("Failed to cache {url}: {e}");
        }
        Ok(FetchOutcome::Network(response))
    }

    fn is_cacheable(&self, url: &Url) -> bool {
        url.host_str()
            .is_none_or(|host| !self.no_cache_hosts.iter().any(|h| h == host))
    }
}
