use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

use task_tracker::{ui, App, TaskStore, DEFAULT_TASK_FILE};

/// Track tasks with due dates and priorities from the terminal.
#[derive(Parser, Debug)]
#[command(name = "task-tracker", version, about)]
struct Cli {
    /// Task file to load and save.
    #[arg(long, default_value = DEFAULT_TASK_FILE)]
    file: PathBuf,

    /// Write logs here (filter with RUST_LOG). Nothing is logged otherwise.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let Cli { file, log_file } = Cli::parse();

    if let Some(path) = log_file {
        install_tracing(&path)?;
    }

    // Surface unreadable or corrupt data before touching the terminal.
    let store = TaskStore::open(&file)
        .with_context(|| format!("failed to load tasks from {}", file.display()))?;
    let mut app = App::new(store);

    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    ui::run_app(&mut terminal, &mut app).context("terminal UI failed")
}

/// Raw mode plus alternate screen, undone on drop so every exit path restores
/// the terminal.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

fn install_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
