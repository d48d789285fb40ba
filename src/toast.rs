//! Transient notifications with at most one on screen.

use std::time::{Duration, Instant};

use crate::config::ToastConfig;

/// Kind of notification, which decides its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Success,
    Error,
    Warning,
}

impl ToastKind {
    /// Short label, e.g. for logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// Where a live toast is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Inserted, entrance transition not started yet.
    Entering,
    /// Fully shown.
    Visible,
    /// Exit transition running; removed afterwards.
    Leaving,
}

/// A live notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    shown_at: Instant,
}

/// Shows toasts one at a time.
///
/// A new toast replaces the current one immediately, restarting the
/// lifecycle. Nothing is queued.
#[derive(Debug, Clone)]
pub struct ToastPresenter {
    enter: Duration,
    visible: Duration,
    exit: Duration,
    current: Option<Toast>,
}

impl Default for ToastPresenter {
    fn default() -> Self {
        Self::new(&ToastConfig::default())
    }
}

impl ToastPresenter {
    #[must_use]
    pub const fn new(config: &ToastConfig) -> Self {
        Self {
            enter: config.enter(),
            visible: config.visible(),
            exit: config.exit(),
            current: None,
        }
    }

    /// Shows `message` now.
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.show_at(message, kind, Instant::now());
    }

    /// Shows `message` as if it was inserted at `now`.
    pub fn show_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        let message = message.into();
        log::debug!("Toast ({}): {message}", kind.label());
        self.current = Some(Toast {
            message,
            kind,
            shown_at: now,
        });
    }

    /// Drops the current toast once its exit transition has finished.
    ///
    /// Returns true if a toast was removed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.current.is_some() && self.phase_at(now).is_none() {
            self.current = None;
            return true;
        }
        false
    }

    /// Lifecycle phase of the current toast at `now`, `None` if there is no
    /// toast or it has expired.
    #[must_use]
    pub fn phase_at(&self, now: Instant) -> Option<ToastPhase> {
        let toast = self.current.as_ref()?;
        let elapsed = now.saturating_duration_since(toast.shown_at);
        if elapsed < self.enter {
            Some(ToastPhase::Entering)
        } else if elapsed < self.visible {
            Some(ToastPhase::Visible)
        } else if elapsed < self.visible + self.exit {
            Some(ToastPhase::Leaving)
        } else {
            None
        }
    }

    /// The current toast, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Removes the current toast immediately.
    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
