//! On-disk cache generations.
//!
//! Layout: `<root>/<generation>/<sha256(url)>.json` holds the response
//! metadata, `<sha256(url)>.body` the raw body. Metadata is written last, so
//! an interrupted write reads as a miss.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{CachedResponse, Network};
use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    content_type: Option<String>,
    stored_at: DateTime<Utc>,
}

/// Hex SHA-256 of the URL with its fragment removed.
fn entry_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    let digest = Sha256::digest(url.as_str().as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);
    if invalid {
        return Err(Error::InvalidCacheName(name.to_string()));
    }
    Ok(())
}

/// All cache generations under one root directory.
#[derive(Debug, Clone)]
pub struct CacheStorage {
    root: PathBuf,
}

impl CacheStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Opens the generation `name`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a plain directory name or the
    /// directory cannot be created.
    pub async fn open(&self, name: &str) -> Result<CacheBucket> {
        validate_name(name)?;
        let dir = self.root.join(name);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(CacheBucket {
            name: name.to_string(),
            dir,
        })
    }

    /// Names of all existing generations, sorted. Directories whose name is
    /// not valid UTF-8 are not generations and are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the root exists but cannot be listed.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => log::warn!("Skipping cache directory with non-UTF-8 name {raw:?}"),
            }
        }
        names.sort();
        Ok(names)
    }

    /// Deletes the generation `name`. Returns false if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the directory cannot be
    /// removed.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        match tokio::fs::remove_dir_all(self.root.join(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// One cache generation.
#[derive(Debug, Clone)]
pub struct CacheBucket {
    name: String,
    dir: PathBuf,
}

impl CacheBucket {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn paths(&self, url: &Url) -> (PathBuf, PathBuf) {
        let key = entry_key(url);
        (
            self.dir.join(format!("{key}.json")),
            self.dir.join(format!("{key}.body")),
        )
    }

    /// Returns the stored response for `url`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry exists but cannot be read.
    pub async fn match_url(&self, url: &Url) -> Result<Option<CachedResponse>> {
        let (meta_path, body_path) = self.paths(url);
        let meta = match tokio::fs::read(&meta_path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta: EntryMeta = serde_json::from_slice(&meta)?;
        let body = tokio::fs::read(&body_path).await?;
        Ok(Some(CachedResponse {
            status: meta.status,
            content_type: meta.content_type,
            body: Bytes::from(body),
        }))
    }

    /// Stores `response` for `url`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    pub async fn put(&self, url: &Url, response: &CachedResponse) -> Result<()> {
        let (meta_path, body_path) = self.paths(url);
        let meta = EntryMeta {
            url: url.to_string(),
            status: response.status,
            content_type: response.content_type.clone(),
            stored_at: Utc::now(),
        };
        tokio::fs::write(&body_path, &response.body).await?;
        tokio::fs::write(&meta_path, serde_json::to_vec(&meta)?).await?;
        Ok(())
    }

    /// Fetches every URL and stores them all, or stores nothing.
    ///
    /// A network error or a non-2xx status on any URL fails the whole call
    /// before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Install`] naming the first failing URL, or an I/O
    /// error if writing fails.
    pub async fn add_all<N: Network + ?Sized>(&self, network: &N, urls: &[Url]) -> Result<usize> {
        let fetches = urls.iter().map(|url| async move {
            let response = network.fetch(url).await.map_err(|e| Error::Install {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            if !response.is_ok() {
                return Err(Error::Install {
                    url: url.to_string(),
                    reason: format!("status {}", response.status),
                });
            }
            Ok((url, response))
        });
        let responses = try_join_all(fetches).await?;

        for (url, response) in &responses {
            self.put(url, response).await?;
        }
        Ok(responses.len())
    }

    /// URLs of all stored entries, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the generation cannot be listed.
    pub async fn urls(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut urls = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let meta: EntryMeta = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
                urls.push(meta.url);
            }
        }
        urls.sort();
        Ok(urls)
    }
}
