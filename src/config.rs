//! Configuration for the icon source, cache, toasts and offline worker.
//!
//! Every section has defaults, so a missing config file or a partial one is
//! fine. The file lives at `<config_dir>/icon-gallery/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding [`SourceConfig::listing_url`].
pub const LISTING_URL_ENV: &str = "ICON_GALLERY_LISTING_URL";

/// Directory listing of the Umbraco CMS icon registry.
pub const DEFAULT_LISTING_URL: &str = "https://api.github.com/repos/umbraco/Umbraco-CMS/contents/src/Umbraco.Web.UI.Client/src/packages/core/icon-registry/icons";

/// Where icons come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory listing endpoint returning `[{ name, download_url }]`.
    pub listing_url: String,
    /// Only listing entries with this suffix are icon modules.
    pub file_suffix: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            file_suffix: ".ts".to_string(),
        }
    }
}

/// Where the icon list is persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory of the key-value store.
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: data_dir().join("store"),
        }
    }
}

/// Toast timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    /// Delay before the entrance transition starts.
    pub enter_ms: u64,
    /// How long a toast stays fully visible.
    pub visible_ms: u64,
    /// Length of the exit transition before removal.
    pub exit_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            enter_ms: 10,
            visible_ms: 3000,
            exit_ms: 300,
        }
    }
}

impl ToastConfig {
    /// Entrance delay.
    #[must_use]
    pub const fn enter(&self) -> Duration {
        Duration::from_millis(self.enter_ms)
    }

    /// Visible duration.
    #[must_use]
    pub const fn visible(&self) -> Duration {
        Duration::from_millis(self.visible_ms)
    }

    /// Exit transition duration.
    #[must_use]
    pub const fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }
}

/// Offline cache worker and app-shell server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// Name of the current cache generation.
    pub cache_name: String,
    /// Origin (with base path) the app shell is served from.
    pub origin: String,
    /// Paths pre-cached on install, relative to `origin`.
    pub manifest: Vec<String>,
    /// Hosts whose responses are never stored.
    pub no_cache_hosts: Vec<String>,
    /// Directory holding the cache generations.
    pub cache_dir: PathBuf,
    /// Bind address of the app-shell server.
    pub host: String,
    /// Port of the app-shell server.
    pub port: u16,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_name: "umbraco-icons-gallery-v2".to_string(),
            origin: "http://127.0.0.1:8000/".to_string(),
            manifest: [
                "./",
                "./index.html",
                "./styles.css",
                "./script.js",
                "./pwa.js",
                "./manifest.json",
                "./icons/icon-192.png",
                "./icons/icon-512.png",
                "./icons/icon.svg",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            no_cache_hosts: vec!["api.github.com".to_string()],
            cache_dir: data_dir().join("offline"),
            host: "127.0.0.1".to_string(),
            port: 9724,
        }
    }
}

impl OfflineConfig {
    /// Sets the app origin.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets the current cache generation name.
    #[must_use]
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    /// Sets the install manifest.
    #[must_use]
    pub fn with_manifest<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.manifest = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the directory holding cache generations.
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Icon source settings.
    pub source: SourceConfig,
    /// Icon cache settings.
    pub cache: CacheConfig,
    /// Toast timings.
    pub toast: ToastConfig,
    /// Offline worker settings.
    pub offline: OfflineConfig,
}

impl AppConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("icon-gallery")
            .join("config.toml")
    }

    /// Loads the config from the default path, falling back to defaults when
    /// the file does not exist, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(LISTING_URL_ENV)
            && !url.trim().is_empty()
        {
            self.source.listing_url = url;
        }
    }

    /// Sets the listing URL.
    #[must_use]
    pub fn with_listing_url(mut self, url: impl Into<String>) -> Self {
        self.source.listing_url = url.into();
        self
    }

    /// Sets the icon store directory.
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache.dir = dir.into();
        self
    }
}

/// Base data directory for the store, the offline cache and the log file.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("icon-gallery")
}
