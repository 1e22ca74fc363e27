//! Deadliner - terminal deadline tracker.
//!
//! Launches straight into the TUI; tasks live in a flat
//! `description,YYYY-MM-DD` file loaded at startup and written on save.

mod app;
mod config;
mod error;
mod persist;
mod query;
mod store;
mod task;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::{Context, Result};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use app::App;
use config::Config;

#[derive(Parser)]
#[command(
    name = "deadliner",
    about = "Terminal deadline tracker: tasks, due dates, days left",
    version
)]
struct Cli {
    /// Task file to load and save (overrides the config file)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level")]
    log_level: Option<String>,
}

/// Log to a file under the local data dir; stderr belongs to the TUI.
/// Level priority: CLI flag > config file > INFO.
fn setup_logging(cli_level: Option<&str>, config_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deadliner")
        .join("logs");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_level
        .or(config_level)
        .map(str::to_uppercase)
        .as_deref()
    {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    let log_file =
        fs::File::create(log_dir.join("deadliner.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref())?;

    let tasks_file = cli.file.unwrap_or(config.tasks_file);
    info!(path = %tasks_file.display(), "starting deadliner");

    let mut app = App::new(tasks_file);
    app.load();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal before reporting any error
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    info!("clean exit");
    Ok(())
}
