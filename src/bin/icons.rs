use std::env;
use std::fs::{self, File};

use icon_gallery::{AppConfig, data_dir};

fn print_usage() {
    eprintln!("Usage: icons [MODE] [OPTIONS]");
    eprintln!();
    eprintln!("Modes:");
    eprintln!("  --tui               Launch the interactive gallery (default)");
    eprintln!("  list [QUERY]        Print icon names, optionally filtered by QUERY");
    eprintln!("  serve               Serve the app shell through the offline cache");
    eprintln!("  clear-cache         Remove the cached icon list");
    eprintln!();
    eprintln!("Serve options:");
    eprintln!("  --host <HOST>       Bind address (default: 127.0.0.1)");
    eprintln!("  --port <PORT>       Bind port (default: 9724)");
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  -h, --help          Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ICON_GALLERY_LISTING_URL   Override the GitHub contents listing URL");
    eprintln!("  RUST_LOG                   Log filter (default: info)");
}

enum Mode {
    Tui,
    List(String),
    Serve,
    ClearCache,
}

/// Logs go to a file while the terminal belongs to the TUI, to stderr otherwise.
fn init_logging(to_file: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if to_file {
        let dir = data_dir();
        let file = fs::create_dir_all(&dir).and_then(|()| File::create(dir.join("icon-gallery.log")));
        match file {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            // No log file: stay quiet rather than draw over the screen
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    builder.init();
}

fn require_value(args: &[String], i: usize, flag: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("Error: {flag} requires a value");
        std::process::exit(1);
    })
}

#[tokio::main]
async fn main() -> icon_gallery::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut mode = Mode::Tui;
    let mut query: Option<String> = None;
    let mut host: Option<String> = None;
    let mut port: Option<u16> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "--tui" => mode = Mode::Tui,
            "list" => mode = Mode::List(String::new()),
            "serve" => mode = Mode::Serve,
            "clear-cache" => mode = Mode::ClearCache,
            "--host" => {
                i += 1;
                host = Some(require_value(&args, i, "--host"));
            }
            "--port" => {
                i += 1;
                let value = require_value(&args, i, "--port");
                port = Some(value.parse().unwrap_or_else(|_| {
                    eprintln!("Error: invalid port '{value}'");
                    std::process::exit(1);
                }));
            }
            other if matches!(mode, Mode::List(_)) && !other.starts_with('-') => {
                query = Some(match query {
                    Some(q) => format!("{q} {other}"),
                    None => other.to_string(),
                });
            }
            other => {
                eprintln!("Error: unexpected argument '{other}'");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    if let Mode::List(q) = &mut mode {
        *q = query.unwrap_or_default();
    }

    init_logging(matches!(mode, Mode::Tui));

    let mut config = AppConfig::load()?;
    if let Some(host) = host {
        config.offline.host = host;
    }
    if let Some(port) = port {
        config.offline.port = port;
    }

    match mode {
        Mode::Tui => {
            #[cfg(feature = "tui")]
            {
                icon_gallery::tui::run(config).await.map_err(icon_gallery::Error::Io)
            }
            #[cfg(not(feature = "tui"))]
            {
                let _ = config;
                eprintln!("TUI support not compiled in");
                std::process::exit(1);
            }
        }
        Mode::List(query) => {
            #[cfg(feature = "cli")]
            {
                icon_gallery::cli::run_list(config, &query).await
            }
            #[cfg(not(feature = "cli"))]
            {
                let _ = (config, query);
                eprintln!("CLI support not compiled in");
                std::process::exit(1);
            }
        }
        Mode::Serve => {
            #[cfg(feature = "serve")]
            {
                icon_gallery::offline::server::run_server(&config.offline).await
            }
            #[cfg(not(feature = "serve"))]
            {
                let _ = config;
                eprintln!("Serve support not compiled in");
                std::process::exit(1);
            }
        }
        Mode::ClearCache => {
            #[cfg(feature = "cli")]
            {
                icon_gallery::cli::run_clear_cache(&config)
            }
            #[cfg(not(feature = "cli"))]
            {
                icon_gallery::IconCache::new(icon_gallery::FileStore::new(&config.cache.dir))
                    .clear()
            }
        }
    }
}
