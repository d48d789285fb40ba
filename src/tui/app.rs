//! Application state model.

use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::config::ToastConfig;
use crate::grid::{Grid, TileAction};
use crate::{Icon, RefreshOutcome, ToastKind, ToastPresenter, filter_icons};

use super::clipboard::{Clipboard, Osc52Clipboard};
use super::event::GalleryEvent;

pub struct App {
    pub should_quit: bool,
    // Search input (top bar)
    pub search: String,
    // Session icon list and what is currently rendered from it
    pub all_icons: Vec<Icon>,
    pub grid: Grid,
    // Tiles per row, updated by the last draw
    pub columns: usize,
    pub toasts: ToastPresenter,
    // Status
    pub loading: bool,
    pub status: String,
    pub cached_at: Option<DateTime<Utc>>,
    pub clipboard: Box<dyn Clipboard>,
}

impl App {
    pub fn new(toast: &ToastConfig) -> Self {
        Self {
            should_quit: false,
            search: String::new(),
            all_icons: Vec::new(),
            grid: Grid::new(),
            columns: 1,
            toasts: ToastPresenter::new(toast),
            loading: true,
            status: "Loading icons...".to_string(),
            cached_at: None,
            clipboard: Box::new(Osc52Clipboard),
        }
    }

    /// Applies an event from the refresh task.
    pub fn handle_event(&mut self, event: GalleryEvent) {
        match event {
            GalleryEvent::Icons(icons) => {
                // A new list always renders in full, whatever the search box holds.
                self.all_icons = icons;
                self.grid.render(&self.all_icons);
            }
            GalleryEvent::Error(message) => {
                self.grid.render_error(message);
            }
            GalleryEvent::Toast { message, kind } => {
                self.toasts.show(message, kind);
            }
            GalleryEvent::Finished(outcome) => {
                self.loading = false;
                self.status = match outcome {
                    RefreshOutcome::Fresh { count, .. } => format!("{count} icons"),
                    RefreshOutcome::Stale { count, .. } => format!("{count} icons (cached)"),
                    RefreshOutcome::Failed { .. } => "No icons loaded".to_string(),
                };
            }
        }
    }

    /// Re-renders the grid from the session list and the search input.
    pub fn apply_search(&mut self) {
        let filtered = filter_icons(&self.all_icons, &self.search);
        self.grid.render(&filtered);
    }

    /// Runs the action bound to the selected tile.
    pub fn activate_selected(&mut self) {
        let Some(TileAction::CopyName(name)) = self.grid.activate_selected() else {
            return;
        };
        match self.clipboard.copy(&name) {
            Ok(()) => {
                self.toasts
                    .show(format!("Copied '{name}' to clipboard!"), ToastKind::Success);
            }
            Err(e) => {
                log::error!("Failed to copy text: {e}");
                self.toasts
                    .show("Failed to copy to clipboard", ToastKind::Error);
            }
        }
    }

    /// Advances time-based state.
    pub fn tick(&mut self, now: Instant) {
        self.toasts.tick(now);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::grid::GridContent;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Records copied text; fails when `broken` is set.
    #[derive(Clone, Default)]
    pub struct MockClipboard {
        pub copied: Arc<Mutex<Vec<String>>>,
        pub broken: bool,
    }

    impl Clipboard for MockClipboard {
        fn copy(&mut self, text: &str) -> io::Result<()> {
            if self.broken {
                return Err(io::Error::other("no clipboard"));
            }
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    pub fn test_app() -> (App, MockClipboard) {
        let clipboard = MockClipboard::default();
        let mut app = App::new(&ToastConfig::default());
        app.clipboard = Box::new(clipboard.clone());
        (app, clipboard)
    }

    pub fn icons(names: &[&str]) -> Vec<Icon> {
        names.iter().map(|n| Icon::new(*n, "<svg/>")).collect()
    }

    #[test]
    fn app_initial_state() {
        let (app, _) = test_app();
        assert!(!app.should_quit);
        assert!(app.loading);
        assert!(app.search.is_empty());
        assert!(app.all_icons.is_empty());
        assert!(app.toasts.current().is_none());
    }

    #[test]
    fn icons_event_renders_full_list() {
        let (mut app, _) = test_app();
        app.search = "add".to_string();
        app.handle_event(GalleryEvent::Icons(icons(&["icon-add", "icon-wand"])));
        assert_eq!(app.all_icons.len(), 2);
        assert_eq!(app.grid.len(), 2);
    }

    #[test]
    fn error_event_replaces_grid() {
        let (mut app, _) = test_app();
        app.handle_event(GalleryEvent::Error("Error loading icons: 500".to_string()));
        assert_eq!(
            app.grid.content(),
            &GridContent::Error("Error loading icons: 500".to_string())
        );
        assert!(app.toasts.current().is_none());
    }

    #[test]
    fn toast_event_shows_toast() {
        let (mut app, _) = test_app();
        app.handle_event(GalleryEvent::Toast {
            message: "Using cached icons".to_string(),
            kind: ToastKind::Warning,
        });
        assert_eq!(app.toasts.current().unwrap().kind, ToastKind::Warning);
    }

    #[test]
    fn finished_event_updates_status() {
        let (mut app, _) = test_app();
        app.handle_event(GalleryEvent::Finished(RefreshOutcome::Stale {
            count: 5,
            error: "boom".to_string(),
        }));
        assert!(!app.loading);
        assert_eq!(app.status, "5 icons (cached)");
    }

    #[test]
    fn apply_search_filters_grid() {
        let (mut app, _) = test_app();
        app.handle_event(GalleryEvent::Icons(icons(&["icon-add", "icon-alert", "icon-wand"])));
        app.search = "A".to_string();
        app.apply_search();
        assert_eq!(app.grid.len(), 3);
        app.search = "al".to_string();
        app.apply_search();
        assert_eq!(app.grid.len(), 1);
        app.search = "zzz".to_string();
        app.apply_search();
        assert_eq!(app.grid.content(), &GridContent::NoResults);
    }

    #[test]
    fn activate_copies_name_and_toasts() {
        let (mut app, clipboard) = test_app();
        app.handle_event(GalleryEvent::Icons(icons(&["icon-add", "icon-wand"])));
        app.grid.move_selection(1, 0, 4);
        app.activate_selected();

        assert_eq!(*clipboard.copied.lock().unwrap(), vec!["icon-wand"]);
        let toast = app.toasts.current().unwrap();
        assert_eq!(toast.message, "Copied 'icon-wand' to clipboard!");
        assert_eq!(toast.kind, ToastKind::Success);
    }

    #[test]
    fn activate_reports_clipboard_failure() {
        let (mut app, _) = test_app();
        app.clipboard = Box::new(MockClipboard {
            broken: true,
            ..MockClipboard::default()
        });
        app.handle_event(GalleryEvent::Icons(icons(&["icon-add"])));
        app.activate_selected();
        let toast = app.toasts.current().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Failed to copy to clipboard");
    }

    #[test]
    fn activate_on_empty_grid_does_nothing() {
        let (mut app, clipboard) = test_app();
        app.activate_selected();
        assert!(clipboard.copied.lock().unwrap().is_empty());
        assert!(app.toasts.current().is_none());
    }
}
