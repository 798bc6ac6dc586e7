//! Shared utilities: path display, time formatting, atomic file writes and
//! terminal mode management.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Display a path with the home directory replaced by `~`.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}

/// Expand a leading `~/` in a user-supplied path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Format seconds as `m:ss`, or `h:mm:ss` past the hour.
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}

/// Write `contents` to `path` through a temporary file in the same directory,
/// so readers never observe a half-written document.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", private_path(dir)))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", private_path(dir)))?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to write {}", private_path(path)))?;
    Ok(())
}

/// Puts the terminal into raw mode with a hidden cursor for the live timer
/// screen and restores it on drop, including on early returns.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    /// Enable raw mode if stdout is a terminal. Without a terminal (piped output,
    /// service manager) the guard is inert.
    pub fn new() -> Result<Self> {
        use crossterm::tty::IsTty;

        if !std::io::stdout().is_tty() {
            return Ok(Self { active: false });
        }

        crossterm::terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Hide);
        Ok(Self { active: true })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Show);
            let _ = crossterm::terminal::disable_raw_mode();
        }
    }
}
