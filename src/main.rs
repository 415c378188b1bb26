//! tally - Station Counter
//!
//! A terminal tally counter: configure a set of named stations, then enter
//! counts for each of them on a numeric keypad, cycling through the stations
//! in order. The `cache` subcommands manage the offline copy of the web
//! assets that accompany the counter.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use tally::application::{App, AppMode};
use tally::domain::Session;
use tally::infrastructure::{logging, CacheStorage, Config, HttpNetwork, OfflineCache, Request};
use tally::presentation::{render_ui, InputHandler};

/// Command line arguments for tally
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Station tally counter with an offline asset cache")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = Config::DEFAULT_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the offline asset cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    /// Pre-fetch the asset list into the current cache bucket
    Install,
    /// Delete cache buckets from other versions
    Activate,
    /// Resolve one request through the cache
    Fetch {
        path: String,
        /// Treat the request as a top-level navigation
        #[arg(long)]
        navigate: bool,
    },
    /// List cache buckets and their entries
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    logging::init(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file))?;
    tracing::info!("Loaded config from `{}`", cli.config.display());

    match cli.command {
        None => run_tui(&config),
        Some(Command::Cache(command)) => run_cache(&config, command),
    }
}

fn run_tui(config: &Config) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        Session::with_max_stations(config.max_stations),
        &config.export_file,
    );
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("terminal error: {err}");
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Continues until the user presses Ctrl+C, or `q` on a screen where it is
/// not typed as text.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('q') if app.mode == AppMode::Normal && !app.accepts_text() => {
                        return Ok(());
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}

fn run_cache(config: &Config, command: CacheCommand) -> anyhow::Result<()> {
    let cache = OfflineCache::new(
        CacheStorage::new(&config.cache_dir),
        HttpNetwork::new(&config.origin),
        &config.cache_prefix,
        &config.cache_version,
        &config.base_path,
        &config.assets,
    );

    match command {
        CacheCommand::Install => {
            let report = cache.install()?;
            println!(
                "{}: cached {} of {} assets",
                cache.cache_name(),
                report.cached.len(),
                cache.assets().len()
            );
            for (path, reason) in &report.failed {
                println!("  skipped {path}: {reason}");
            }
        }
        CacheCommand::Activate => {
            let report = cache.activate()?;
            if report.deleted.is_empty() && report.failed.is_empty() {
                println!("no stale caches");
            }
            for name in &report.deleted {
                println!("deleted {name}");
            }
            for (name, reason) in &report.failed {
                println!("  could not delete {name}: {reason}");
            }
        }
        CacheCommand::Fetch { path, navigate } => {
            let request = if navigate {
                Request::navigate(&path)
            } else {
                Request::subresource(&path)
            };
            let response = cache.fetch(&request)?;
            println!(
                "{} {} ({} bytes)",
                response.status,
                response.content_type.as_deref().unwrap_or("-"),
                response.body.len()
            );
        }
        CacheCommand::List => {
            let storage = cache.storage();
            for name in storage.keys()? {
                let marker = if name == cache.cache_name() { "*" } else { " " };
                let bucket = storage.open(&name)?;
                println!("{marker} {name} ({} entries)", bucket.len());
                for path in bucket.paths() {
                    println!("    {path}");
                }
            }
        }
    }

    Ok(())
}
