//! `tally`: terminal UI for authoring, taking, and analysing surveys.
//!
//! # Usage
//!
//! ```
//! tally
//! tally --store ./surveys.db --log-file ./tally.log
//! tally --config ~/.config/tally/config.toml
//! tally --ephemeral
//! ```

mod app;
mod editor;
mod take;
mod ui;

use std::{
  fs::{self, OpenOptions},
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tally_core::{
  repository::Repository,
  store::{MemoryStore, SurveyStore},
};
use tally_store_sqlite::SqliteStore;
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tally", about = "Terminal UI for creating and analysing surveys")]
struct Args {
  /// Path to a TOML config file (store_path, log_file).
  #[arg(short, long, value_name = "FILE", env = "TALLY_CONFIG")]
  config: Option<PathBuf>,

  /// SQLite database holding surveys and responses.
  #[arg(long, value_name = "PATH", env = "TALLY_STORE")]
  store: Option<PathBuf>,

  /// File that receives log output (the terminal belongs to the UI).
  #[arg(long, value_name = "PATH")]
  log_file: Option<PathBuf>,

  /// Keep everything in memory; nothing is written to disk.
  #[arg(long)]
  ephemeral: bool,
}

// ─── Config ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Settings {
  #[serde(default = "default_store_path")]
  store_path: String,
  #[serde(default = "default_log_file")]
  log_file:   String,
}

fn default_store_path() -> String { "~/.local/share/tally/tally.db".into() }

fn default_log_file() -> String { "tally.log".into() }

/// Layer the optional config file and `TALLY_*` environment variables.
/// CLI flags are applied on top by the caller.
fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
  let mut builder = config::Config::builder();
  builder = match config_path {
    Some(path) => builder.add_source(config::File::from(path.to_path_buf())),
    None => builder.add_source(
      config::File::from(expand_tilde("~/.config/tally/config.toml")).required(false),
    ),
  };
  builder
    .add_source(config::Environment::with_prefix("TALLY"))
    .build()
    .context("reading configuration")?
    .try_deserialize()
    .context("parsing configuration")
}

fn expand_tilde(path: &str) -> PathBuf {
  if let Some(rest) = path.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  PathBuf::from(path)
}

fn ensure_parent(path: &Path) -> Result<()> {
  match path.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
      .with_context(|| format!("creating directory {}", dir.display())),
    _ => Ok(()),
  }
}

// ─── Logging ──────────────────────────────────────────────────────────────────

fn init_tracing(log_file: &Path) -> Result<()> {
  ensure_parent(log_file)?;
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(log_file)
    .with_context(|| format!("opening log file {}", log_file.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // CLI flags override config file and environment, which override defaults.
  let settings = load_settings(args.config.as_deref())?;
  let log_file = args
    .log_file
    .unwrap_or_else(|| expand_tilde(&settings.log_file));
  init_tracing(&log_file)?;

  if args.ephemeral {
    info!("starting with an in-memory store");
    return run(MemoryStore::new()).await;
  }

  let store_path = args
    .store
    .unwrap_or_else(|| expand_tilde(&settings.store_path));
  ensure_parent(&store_path)?;
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("opening store {}", store_path.display()))?;
  info!(path = %store_path.display(), "opened store");

  run(store).await
}

async fn run<S: SurveyStore>(store: S) -> Result<()> {
  let repo = Repository::open(store)
    .await
    .context("loading surveys")?;
  let mut app = App::new(repo);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<S: SurveyStore>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key).await? {
          break;
        }
      }
      // Resizes and everything else just trigger a redraw.
      _ => {}
    }
  }

  info!("exiting");
  Ok(())
}
