//! Interactive terminal gallery.

mod app;
mod clipboard;
mod draw;
mod event;
mod input;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::{AppConfig, FileStore, GithubSource, IconRepository};

pub use self::clipboard::{Clipboard, Osc52Clipboard, osc52_sequence};
pub use self::event::{ChannelView, GalleryEvent};

use self::app::App;
use self::draw::draw;
use self::input::{handle_input, handle_paste};

/// RAII guard that ensures terminal cleanup on drop.
/// Restores terminal to normal mode even if a panic occurs.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            EnterAlternateScreen,
            crossterm::event::EnableBracketedPaste
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(
            io::stdout(),
            crossterm::event::DisableBracketedPaste,
            LeaveAlternateScreen
        );
    }
}

/// Run the interactive gallery.
///
/// The refresh pipeline runs on a background task and reports to the UI
/// through a channel; the UI loop never blocks on the network.
///
/// # Errors
/// Returns an error if terminal setup fails or TUI operations encounter I/O errors.
pub async fn run(config: AppConfig) -> io::Result<()> {
    let source = GithubSource::from_config(&config.source)
        .map_err(|e| io::Error::other(e.to_string()))?;
    let repository = IconRepository::new(
        source,
        FileStore::new(&config.cache.dir),
        config.source.file_suffix.clone(),
    );

    let mut app = App::new(&config.toast);
    app.cached_at = repository.cached_at();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<GalleryEvent>();
    tokio::spawn(async move {
        let mut repository = repository;
        let view = ChannelView {
            tx: event_tx.clone(),
        };
        let outcome = repository.refresh(&view).await;
        log::info!("Refresh finished with {} icons", outcome.count());
        let _ = event_tx.send(GalleryEvent::Finished(outcome));
    });

    // Initialize terminal with RAII guard for automatic cleanup
    let _terminal_guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        // Poll for events with 100ms timeout
        if crossterm::event::poll(Duration::from_millis(100))? {
            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_input(&mut app, key),
                Event::Paste(text) => handle_paste(&mut app, &text),
                _ => {}
            }
        }

        // Drain refresh events (non-blocking)
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    // Show cursor before exit (terminal cleanup handled by RAII guard)
    terminal.show_cursor()?;

    Ok(())
}
