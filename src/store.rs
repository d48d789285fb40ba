//! Persistent key-value storage and the icon cache built on top of it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::icon::Icon;

/// Key holding the JSON-serialized icon list.
pub const ICONS_KEY: &str = "icons";
/// Key holding the last successful fetch time, epoch milliseconds.
pub const TIMESTAMP_KEY: &str = "timestamp";
/// Key holding the schema tag of the stored icon list.
pub const VERSION_KEY: &str = "version";

/// Schema tag written with every save. Entries with another tag are ignored.
pub const CACHE_SCHEMA_VERSION: &str = "1";

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for &K {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Arc<K> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Store keeping one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory backing this store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        // Write to a temp file and rename so readers never see a torn value.
        let path = self.path(key);
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, value)?;
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, mostly for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// The persisted copy of the last successfully fetched icon list.
///
/// Saving is fire-and-forget: failures are logged and never reach the
/// caller. Loading never fails either; anything unreadable counts as absent.
#[derive(Debug)]
pub struct IconCache<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> IconCache<K> {
    /// Wraps `store`.
    pub const fn new(store: K) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &K {
        &self.store
    }

    /// Overwrites the cached list with `icons` and stamps the current time.
    pub fn save(&self, icons: &[Icon]) {
        if let Err(e) = self.try_save(icons) {
            log::warn!("Failed to cache icons: {e}");
        }
    }

    fn try_save(&self, icons: &[Icon]) -> Result<()> {
        let payload = serde_json::to_string(icons)?;
        self.store.set(ICONS_KEY, &payload)?;
        self.store
            .set(TIMESTAMP_KEY, &Utc::now().timestamp_millis().to_string())?;
        self.store.set(VERSION_KEY, CACHE_SCHEMA_VERSION)?;
        log::debug!("Cached {} icons", icons.len());
        Ok(())
    }

    /// Returns the cached list, or `None` if there is no usable entry.
    #[must_use]
    pub fn load(&self) -> Option<Vec<Icon>> {
        match self.store.get(VERSION_KEY) {
            Ok(Some(version)) if version == CACHE_SCHEMA_VERSION => {}
            Ok(Some(version)) => {
                log::info!("Ignoring icon cache with schema version {version}");
                return None;
            }
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read icon cache: {e}");
                return None;
            }
        }

        let payload = match self.store.get(ICONS_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read icon cache: {e}");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(icons) => Some(icons),
            Err(e) => {
                log::warn!("Discarding unreadable icon cache: {e}");
                None
            }
        }
    }

    /// Time of the last successful save.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let millis = self.store.get(TIMESTAMP_KEY).ok()??.trim().parse().ok()?;
        DateTime::from_timestamp_millis(millis)
    }

    /// Drops the cached entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot remove a key.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(ICONS_KEY)?;
        self.store.remove(TIMESTAMP_KEY)?;
        self.store.remove(VERSION_KEY)
    }
}
