//! The refresh pipeline: cache first, then the remote source.
//!
//! A refresh is a single forward pass with no retries:
//!
//! 1. show the cached list right away if there is one,
//! 2. fetch the listing and keep the icon modules,
//! 3. fetch every module concurrently, failing as a whole if any fetch fails,
//! 4. extract the markup, replace the session list and the cache,
//! 5. tell the user how it went.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;

use crate::error::{Error, Result};
use crate::icon::Icon;
use crate::search::filter_icons;
use crate::source::{IconSource, RemoteEntry};
use crate::store::{IconCache, KeyValueStore};
use crate::toast::ToastKind;

/// Receives what the pipeline wants shown.
///
/// All methods have default no-op implementations for convenience.
pub trait GalleryView: Send + Sync {
    /// Replace the grid with `icons`.
    fn show_icons(&self, _icons: &[Icon]) {}

    /// Replace the grid with an inline error message.
    fn show_error(&self, _message: &str) {}

    /// Show a transient notification.
    fn show_toast(&self, _message: &str, _kind: ToastKind) {}
}

/// A view that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoView;

impl GalleryView for NoView {}

/// How a refresh ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The remote list was fetched and cached.
    Fresh {
        /// Number of icons fetched.
        count: usize,
        /// Whether cached icons were shown before the remote list arrived.
        had_cache: bool,
    },
    /// The remote refresh failed; cached icons stay on screen.
    Stale {
        /// Number of cached icons shown.
        count: usize,
        /// Why the refresh failed.
        error: String,
    },
    /// The remote refresh failed and there was nothing cached.
    Failed {
        /// Why the refresh failed.
        error: String,
    },
}

impl RefreshOutcome {
    /// Number of icons on screen after the refresh.
    #[must_use]
    pub const fn count(&self) -> usize {
        match self {
            Self::Fresh { count, .. } | Self::Stale { count, .. } => *count,
            Self::Failed { .. } => 0,
        }
    }
}

/// Session controller owning the in-memory icon list.
pub struct IconRepository<S: IconSource, K: KeyValueStore> {
    source: S,
    cache: IconCache<K>,
    suffix: String,
    icons: Vec<Icon>,
}

impl<S: IconSource, K: KeyValueStore> IconRepository<S, K> {
    /// Creates a repository reading modules ending in `suffix` from `source`.
    pub fn new(source: S, store: K, suffix: impl Into<String>) -> Self {
        Self {
            source,
            cache: IconCache::new(store),
            suffix: suffix.into(),
            icons: Vec::new(),
        }
    }

    /// The session's icon list.
    #[must_use]
    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    /// Icons whose name contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Icon> {
        filter_icons(&self.icons, query)
    }

    /// The persistent cache.
    pub const fn cache(&self) -> &IconCache<K> {
        &self.cache
    }

    /// When the cached list was last written.
    #[must_use]
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.cache.timestamp()
    }

    /// Runs the refresh pipeline, reporting to `view`.
    pub async fn refresh<V: GalleryView + ?Sized>(&mut self, view: &V) -> RefreshOutcome {
        let cached = self.cache.load().filter(|icons| !icons.is_empty());
        let had_cache = cached.is_some();
        if let Some(icons) = cached {
            log::info!("Showing {} cached icons", icons.len());
            self.icons = icons;
            view.show_icons(&self.icons);
        }

        match self.fetch_remote().await {
            Ok(icons) => {
                let count = icons.len();
                log::info!("Fetched {count} icons");
                self.icons = icons;
                self.cache.save(&self.icons);
                view.show_icons(&self.icons);
                if had_cache {
                    view.show_toast("Icons refreshed from GitHub", ToastKind::Success);
                }
                RefreshOutcome::Fresh { count, had_cache }
            }
            Err(e) => {
                log::error!("Error fetching icons: {e}");
                let error = e.to_string();
                if had_cache {
                    view.show_toast(
                        &format!("Using cached icons; refresh failed: {error}"),
                        ToastKind::Warning,
                    );
                    RefreshOutcome::Stale {
                        count: self.icons.len(),
                        error,
                    }
                } else {
                    view.show_error(&format!("Error loading icons: {error}"));
                    RefreshOutcome::Failed { error }
                }
            }
        }
    }

    async fn fetch_remote(&self) -> Result<Vec<Icon>> {
        let entries = self.source.list().await?;
        let modules: Vec<&RemoteEntry> = entries
            .iter()
            .filter(|entry| entry.name.ends_with(&self.suffix))
            .collect();
        log::debug!(
            "{} of {} listing entries are icon modules",
            modules.len(),
            entries.len()
        );

        try_join_all(modules.into_iter().map(|entry| self.fetch_icon(entry))).await
    }

    async fn fetch_icon(&self, entry: &RemoteEntry) -> Result<Icon> {
        let url = entry
            .download_url
            .as_deref()
            .ok_or_else(|| Error::ItemFetch {
                name: entry.name.clone(),
                reason: "no download URL".to_string(),
            })?;

        let text = self
            .source
            .fetch_text(url)
            .await
            .map_err(|e| Error::ItemFetch {
                name: entry.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Icon::from_module(&entry.name, &self.suffix, &text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::PLACEHOLDER_MARKUP;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // =========================================================================
    // Mocks
    // =========================================================================

    /// A source serving a fixed listing and module bodies.
    #[derive(Default)]
    struct MockSource {
        /// `None` makes the listing fail with a 500.
        listing: Option<Vec<RemoteEntry>>,
        /// Maps URL → module text. Missing URLs answer 404.
        files: HashMap<String, String>,
    }

    impl MockSource {
        fn failing() -> Self {
            Self::default()
        }

        fn with_files(files: &[(&str, &str)]) -> Self {
            let mut source = Self {
                listing: Some(Vec::new()),
                files: HashMap::new(),
            };
            for (name, text) in files {
                source.add(name, text);
            }
            source
        }

        fn add(&mut self, name: &str, text: &str) {
            let url = format!("https://raw.test/{name}");
            self.listing
                .get_or_insert_with(Vec::new)
                .push(RemoteEntry {
                    name: (*name).to_string(),
                    download_url: Some(url.clone()),
                });
            self.files.insert(url, (*text).to_string());
        }
    }

    #[async_trait]
    impl IconSource for MockSource {
        async fn list(&self) -> Result<Vec<RemoteEntry>> {
            self.listing.clone().ok_or_else(|| Error::Status {
                url: "https://api.test/icons".to_string(),
                status: 500,
            })
        }

        async fn fetch_text(&self, url: &str) -> Result<String> {
            self.files.get(url).cloned().ok_or_else(|| Error::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum ViewCall {
        Icons(Vec<String>),
        Error(String),
        Toast(String, ToastKind),
    }

    /// A view recording every call in order.
    #[derive(Default)]
    struct RecordingView {
        calls: Mutex<Vec<ViewCall>>,
    }

    impl RecordingView {
        fn calls(&self) -> Vec<ViewCall> {
            self.calls.lock().unwrap().clone()
        }

        fn toasts(&self) -> Vec<(String, ToastKind)> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    ViewCall::Toast(m, k) => Some((m, k)),
                    _ => None,
                })
                .collect()
        }

        fn errors(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    ViewCall::Error(m) => Some(m),
                    _ => None,
                })
                .collect()
        }
    }

    impl GalleryView for RecordingView {
        fn show_icons(&self, icons: &[Icon]) {
            self.calls.lock().unwrap().push(ViewCall::Icons(
                icons.iter().map(|i| i.name.clone()).collect(),
            ));
        }

        fn show_error(&self, message: &str) {
            self.calls
                .lock()
                .unwrap()
                .push(ViewCall::Error(message.to_string()));
        }

        fn show_toast(&self, message: &str, kind: ToastKind) {
            self.calls
                .lock()
                .unwrap()
                .push(ViewCall::Toast(message.to_string(), kind));
        }
    }

    fn cached_store(count: usize) -> MemoryStore {
        let store = MemoryStore::new();
        let icons: Vec<Icon> = (0..count)
            .map(|i| Icon::new(format!("cached-{i}"), "<svg/>"))
            .collect();
        IconCache::new(&store).save(&icons);
        store
    }

    // =========================================================================
    // Pipeline scenarios
    // =========================================================================

    #[tokio::test]
    async fn single_module_is_extracted() {
        let source = MockSource::with_files(&[("alert.ts", "export default `<svg>A</svg>`")]);
        let mut repo = IconRepository::new(source, MemoryStore::new(), ".ts");
        let view = RecordingView::default();

        let outcome = repo.refresh(&view).await;

        assert_eq!(
            outcome,
            RefreshOutcome::Fresh {
                count: 1,
                had_cache: false
            }
        );
        assert_eq!(repo.icons(), &[Icon::new("alert", "<svg>A</svg>")]);
        assert_eq!(view.calls(), vec![ViewCall::Icons(vec!["alert".to_string()])]);
        assert!(view.toasts().is_empty());
    }

    #[tokio::test]
    async fn module_without_literal_gets_placeholder() {
        let source = MockSource::with_files(&[("odd.ts", "export const nope = 1;")]);
        let mut repo = IconRepository::new(source, MemoryStore::new(), ".ts");

        repo.refresh(&NoView).await;

        assert_eq!(repo.icons().len(), 1);
        assert_eq!(repo.icons()[0].content, PLACEHOLDER_MARKUP);
    }

    #[tokio::test]
    async fn non_module_entries_are_skipped() {
        let source = MockSource::with_files(&[
            ("icon-add.ts", "export default `<svg>+</svg>`"),
            ("index.md", "# readme"),
            ("icon-wand.ts", "export default `<svg>*</svg>`"),
        ]);
        let mut repo = IconRepository::new(source, MemoryStore::new(), ".ts");

        repo.refresh(&NoView).await;

        let names: Vec<&str> = repo.icons().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["icon-add", "icon-wand"]);
    }

    #[tokio::test]
    async fn success_is_persisted() {
        let store = MemoryStore::new();
        let source = MockSource::with_files(&[("alert.ts", "export default `<svg>A</svg>`")]);
        let mut repo = IconRepository::new(source, &store, ".ts");

        repo.refresh(&NoView).await;

        assert_eq!(
            IconCache::new(&store).load(),
            Some(vec![Icon::new("alert", "<svg>A</svg>")])
        );
        assert!(repo.cached_at().is_some());
    }

    #[tokio::test]
    async fn cache_hit_then_success_toasts() {
        let source = MockSource::with_files(&[("alert.ts", "export default `<svg>A</svg>`")]);
        let mut repo = IconRepository::new(source, cached_store(2), ".ts");
        let view = RecordingView::default();

        let outcome = repo.refresh(&view).await;

        assert_eq!(
            outcome,
            RefreshOutcome::Fresh {
                count: 1,
                had_cache: true
            }
        );
        assert_eq!(
            view.calls(),
            vec![
                ViewCall::Icons(vec!["cached-0".to_string(), "cached-1".to_string()]),
                ViewCall::Icons(vec!["alert".to_string()]),
                ViewCall::Toast("Icons refreshed from GitHub".to_string(), ToastKind::Success),
            ]
        );
    }

    #[tokio::test]
    async fn cache_hit_then_failure_warns() {
        let mut repo = IconRepository::new(MockSource::failing(), cached_store(5), ".ts");
        let view = RecordingView::default();

        let outcome = repo.refresh(&view).await;

        assert!(matches!(outcome, RefreshOutcome::Stale { count: 5, .. }));
        assert_eq!(repo.icons().len(), 5);
        let toasts = view.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].1, ToastKind::Warning);
        assert!(toasts[0].0.starts_with("Using cached icons"));
        assert!(view.errors().is_empty());
        assert_eq!(view.calls()[0], ViewCall::Icons((0..5).map(|i| format!("cached-{i}")).collect()));
    }

    #[tokio::test]
    async fn empty_cache_then_failure_shows_error() {
        let mut repo = IconRepository::new(MockSource::failing(), MemoryStore::new(), ".ts");
        let view = RecordingView::default();

        let outcome = repo.refresh(&view).await;

        assert!(matches!(outcome, RefreshOutcome::Failed { .. }));
        assert_eq!(outcome.count(), 0);
        assert!(view.toasts().is_empty());
        let errors = view.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error loading icons:"));
        assert!(errors[0].contains("500"));
    }

    #[tokio::test]
    async fn one_failing_item_fails_the_refresh() {
        let mut source = MockSource::with_files(&[("good.ts", "export default `<svg>G</svg>`")]);
        source.listing.as_mut().unwrap().push(RemoteEntry {
            name: "missing.ts".to_string(),
            download_url: Some("https://raw.test/gone".to_string()),
        });
        let store = cached_store(3);
        let mut repo = IconRepository::new(source, &store, ".ts");
        let view = RecordingView::default();

        let outcome = repo.refresh(&view).await;

        let RefreshOutcome::Stale { count, error } = outcome else {
            panic!("expected stale outcome");
        };
        assert_eq!(count, 3);
        assert!(error.contains("missing.ts"));
        // The partial result is discarded and the cache left untouched.
        assert_eq!(IconCache::new(&store).load().map(|i| i.len()), Some(3));
        assert!(repo.icons().iter().all(|i| i.name.starts_with("cached-")));
    }

    #[tokio::test]
    async fn module_without_download_url_fails() {
        let source = MockSource {
            listing: Some(vec![RemoteEntry {
                name: "dir.ts".to_string(),
                download_url: None,
            }]),
            files: HashMap::new(),
        };
        let mut repo = IconRepository::new(source, MemoryStore::new(), ".ts");

        let outcome = repo.refresh(&NoView).await;

        assert!(matches!(outcome, RefreshOutcome::Failed { ref error } if error.contains("no download URL")));
    }

    #[tokio::test]
    async fn empty_cached_list_is_not_a_hit() {
        let store = MemoryStore::new();
        IconCache::new(&store).save(&[]);
        let mut repo = IconRepository::new(MockSource::failing(), store, ".ts");
        let view = RecordingView::default();

        repo.refresh(&view).await;

        assert!(view.toasts().is_empty());
        assert_eq!(view.errors().len(), 1);
    }

    #[tokio::test]
    async fn search_filters_session_list() {
        let source = MockSource::with_files(&[
            ("icon-add.ts", "export default `<svg>+</svg>`"),
            ("icon-alert.ts", "export default `<svg>!</svg>`"),
        ]);
        let mut repo = IconRepository::new(source, MemoryStore::new(), ".ts");
        repo.refresh(&NoView).await;

        assert_eq!(repo.search("").len(), 2);
        let hits = repo.search("ALE");
        assert_eq!(hits, vec![Icon::new("icon-alert", "<svg>!</svg>")]);
    }

    #[test]
    fn no_view_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoView>();
    }
}
