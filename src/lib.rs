//! icon-gallery - Browse and search the Umbraco backoffice icon set.
//!
//! The library fetches icon modules from a GitHub contents listing, keeps
//! the last good list in a local cache, and exposes the pieces a front end
//! needs: a search filter, a selectable tile grid, and timed toasts. The
//! [`offline`] module adds a cache-first asset worker so an app shell can
//! still be served when the network is gone.
//!
//! # Example
//!
//! ```no_run
//! use icon_gallery::{AppConfig, FileStore, GithubSource, IconRepository, NoView};
//!
//! # async fn example() -> icon_gallery::Result<()> {
//! let config = AppConfig::load()?;
//! let source = GithubSource::from_config(&config.source)?;
//! let mut repository = IconRepository::new(
//!     source,
//!     FileStore::new(&config.cache.dir),
//!     config.source.file_suffix.clone(),
//! );
//!
//! // Cached list first, then the live listing
//! let outcome = repository.refresh(&NoView).await;
//! println!("{} icons", outcome.count());
//!
//! for icon in repository.search("arrow") {
//!     println!("{}", icon.name);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod grid;
pub mod icon;
pub mod offline;
pub mod repository;
pub mod search;
pub mod source;
pub mod store;
pub mod toast;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{AppConfig, CacheConfig, OfflineConfig, SourceConfig, ToastConfig, data_dir};
pub use error::{Error, Result};
pub use grid::{Grid, GridContent, Tile, TileAction};
pub use icon::{Icon, MarkupSummary, PLACEHOLDER_MARKUP};
pub use offline::{CachedResponse, FetchOutcome, HttpNetwork, Network, OfflineWorker};
pub use repository::{GalleryView, IconRepository, NoView, RefreshOutcome};
pub use search::filter_icons;
pub use source::{GithubSource, IconSource, RemoteEntry};
pub use store::{FileStore, IconCache, KeyValueStore, MemoryStore};
pub use toast::{Toast, ToastKind, ToastPhase, ToastPresenter};
