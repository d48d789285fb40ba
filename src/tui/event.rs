//! Events sent from the refresh task to the TUI.

use tokio::sync::mpsc;

use crate::{GalleryView, Icon, RefreshOutcome, ToastKind};

/// What the refresh task wants the UI to do.
#[derive(Debug, Clone)]
pub enum GalleryEvent {
    /// Replace the session list and render it.
    Icons(Vec<Icon>),
    /// Replace the grid with an inline error.
    Error(String),
    /// Show a toast.
    Toast { message: String, kind: ToastKind },
    /// The refresh is over.
    Finished(RefreshOutcome),
}

/// Forwards pipeline callbacks to the UI thread over a channel.
pub struct ChannelView {
    pub tx: mpsc::UnboundedSender<GalleryEvent>,
}

impl GalleryView for ChannelView {
    fn show_icons(&self, icons: &[Icon]) {
        let _ = self.tx.send(GalleryEvent::Icons(icons.to_vec()));
    }

    fn show_error(&self, message: &str) {
        let _ = self.tx.send(GalleryEvent::Error(message.to_string()));
    }

    fn show_toast(&self, message: &str, kind: ToastKind) {
        let _ = self.tx.send(GalleryEvent::Toast {
            message: message.to_string(),
            kind,
        });
    }
}
