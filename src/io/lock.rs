//! Lock file management for single-session enforcement.
//!
//! Only one timer session may run per user. The session holds an exclusive
//! `flock` on `calistimer.lock` in the runtime directory; the file records the
//! owner's PID so a lock left behind by a crashed process can be recognised
//! and cleared.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::common::constants::LOCK_FILE_NAME;
use crate::common::utils::private_path;

/// An acquired session lock. Released and removed on drop.
#[derive(Debug)]
pub struct SessionLock {
    file: File,
    path: PathBuf,
}

impl SessionLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Who holds a lock we could not take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHolder {
    pub pid: u32,
}

/// Default lock location: `$XDG_RUNTIME_DIR/calistimer.lock`, or the system
/// temp directory when no runtime directory is set.
pub fn lock_path() -> PathBuf {
    std::env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(LOCK_FILE_NAME)
}

/// Acquire the session lock at the default location.
pub fn acquire_lock() -> Result<std::result::Result<SessionLock, LockHolder>> {
    acquire_lock_at(&lock_path())
}

/// Acquire an exclusive lock at `path`.
///
/// Returns `Ok(Err(holder))` when another live process holds it. A stale lock
/// (unreadable, or naming a process that no longer exists) is removed and the
/// acquisition retried once.
pub fn acquire_lock_at(path: &Path) -> Result<std::result::Result<SessionLock, LockHolder>> {
    if let Some(lock) = try_lock(path)? {
        return Ok(Ok(lock));
    }

    match read_holder(path) {
        Some(holder) if is_process_running(holder.pid) => return Ok(Err(holder)),
        Some(holder) => {
            log_warning!(
                "Removing stale lock file (process {} no longer running)",
                holder.pid
            );
        }
        None => log_warning!("Lock file format invalid, removing"),
    }
    let _ = std::fs::remove_file(path);

    match try_lock(path)? {
        Some(lock) => Ok(Ok(lock)),
        None => anyhow::bail!(
            "Failed to acquire lock {} after cleanup attempt",
            private_path(path)
        ),
    }
}

fn try_lock(path: &Path) -> Result<Option<SessionLock>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", private_path(parent)))?;
    }

    // Open without truncating so a running holder's PID stays readable
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open lock file {}", private_path(path)))?;

    if file.try_lock_exclusive().is_err() {
        return Ok(None);
    }

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(&file, "{}", std::process::id())?;
    file.flush()?;

    Ok(Some(SessionLock {
        file,
        path: path.to_path_buf(),
    }))
}

fn read_holder(path: &Path) -> Option<LockHolder> {
    let content = std::fs::read_to_string(path).ok()?;
    let pid = content.lines().next()?.trim().parse().ok()?;
    Some(LockHolder { pid })
}

fn is_process_running(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}
