//! Edit Pad - a terminal scratch pad built on easel edit widgets.
//!
//! Features:
//! - Title line and multi-line body with Emacs-style editing keys
//! - Shared kill ring between the two boxes
//! - Mouse focus, bracketed paste as the clipboard
//! - Key binding overrides from `keybinds.toml`
//!
//! Logs go to `edit-pad.log` in the data directory; set `RUST_LOG` to
//! adjust the level.

mod app;
mod host;
mod settings;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use easel_keybinds::KeybindsConfig;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{io, time::Duration};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_logging();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let keybinds = KeybindsConfig::load_default().unwrap_or_else(|e| {
        warn!(error = %e, "could not load key bindings; using defaults");
        KeybindsConfig::default()
    });
    let mut app = App::new(path, &keybinds)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        if app.host.take_dirty() {
            terminal.draw(|f| ui::draw(f, app))?;
        }

        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
            if app.should_quit() {
                info!("quit");
                return Ok(());
            }
        }
    }
}

/// Log to a file so output does not tear the terminal UI.
///
/// Runs before raw mode, so failures can still go to stderr.
fn init_logging() {
    let dir = directories::ProjectDirs::from("", "", "edit-pad")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    if let Err(e) = open_log(&dir).and_then(install_subscriber) {
        eprintln!("edit-pad: logging disabled: {e:#}");
    }
}

fn open_log(dir: &Path) -> Result<File> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("edit-pad.log");
    File::create(&path).with_context(|| format!("opening {}", path.display()))
}

fn install_subscriber(file: File) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_reports_bad_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_log(dir.path()).is_ok());
        assert!(dir.path().join("edit-pad.log").exists());

        let not_a_dir = dir.path().join("edit-pad.log");
        let err = open_log(&not_a_dir).unwrap_err();
        assert!(format!("{err:#}").starts_with("creating "));
    }

    #[test]
    fn test_second_subscriber_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let _ = install_subscriber(open_log(dir.path()).unwrap());
        let err = install_subscriber(open_log(dir.path()).unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("installing log subscriber"));
    }
}
