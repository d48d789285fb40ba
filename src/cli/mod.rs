//! Non-interactive commands: list icons, clear the cache.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    AppConfig, FileStore, GalleryView, GithubSource, Icon, IconCache, IconRepository,
    RefreshOutcome, ToastKind, filter_icons,
};

const SEPARATOR: &str = "────────────────────────────────────────────────────────────";

/// Creates the spinner shown while the listing is fetched.
fn make_spinner(listing_url: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .expect("spinner template is valid"),
    );
    bar.set_message(format!("Fetching icons from {listing_url}"));
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Prints toasts and inline errors above the spinner.
struct SpinnerView {
    bar: ProgressBar,
}

impl GalleryView for SpinnerView {
    fn show_error(&self, message: &str) {
        self.bar
            .println(format!("{} {message}", style("✗").red().bold()));
    }

    fn show_toast(&self, message: &str, kind: ToastKind) {
        let marker = match kind {
            ToastKind::Success => style("✓").green().bold(),
            ToastKind::Error => style("✗").red().bold(),
            ToastKind::Warning => style("!").yellow().bold(),
        };
        self.bar.println(format!("{marker} {message}"));
    }
}

/// Prints the icons matching `query`, one per line, with a summary.
pub fn print_icon_list(icons: &[Icon], query: &str) {
    let matches = filter_icons(icons, query);
    if matches.is_empty() {
        println!("{}", style(crate::grid::NO_RESULTS).dim());
        return;
    }

    println!("{SEPARATOR}");
    for icon in &matches {
        if icon.is_placeholder() {
            println!("  {} {}", icon.name, style("(no markup)").red());
        } else {
            println!("  {}", icon.name);
        }
    }
    println!("{SEPARATOR}");
    if query.is_empty() {
        println!("  {} icon(s)", matches.len());
    } else {
        println!("  {} of {} icon(s) match '{query}'", matches.len(), icons.len());
    }
}

/// Refreshes the icon list and prints the icons matching `query`.
///
/// Falls back to the local cache when the refresh fails.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built, or if no icons are
/// available at all (refresh failed and nothing is cached).
pub async fn run_list(config: AppConfig, query: &str) -> crate::Result<()> {
    let source = GithubSource::from_config(&config.source)?;
    let mut repository = IconRepository::new(
        source,
        FileStore::new(&config.cache.dir),
        config.source.file_suffix.clone(),
    );

    let bar = make_spinner(&config.source.listing_url);
    let view = SpinnerView { bar: bar.clone() };
    let outcome = repository.refresh(&view).await;
    bar.finish_and_clear();

    match outcome {
        RefreshOutcome::Failed { error } => Err(crate::Error::NoIcons(error)),
        RefreshOutcome::Fresh { .. } | RefreshOutcome::Stale { .. } => {
            print_icon_list(repository.icons(), query);
            Ok(())
        }
    }
}

/// Removes every persisted icon-cache entry.
///
/// # Errors
/// Returns an error if a cache file exists but cannot be removed.
pub fn run_clear_cache(config: &AppConfig) -> crate::Result<()> {
    let cache = IconCache::new(FileStore::new(&config.cache.dir));
    cache.clear()?;
    println!(
        "{} Cleared icon cache in {}",
        style("✓").green().bold(),
        config.cache.dir.display()
    );
    Ok(())
}
