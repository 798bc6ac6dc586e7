//! The `export` command: write every note to a JSON file.

use anyhow::Result;
use std::path::PathBuf;

use super::AppContext;
use crate::common::constants::DEFAULT_EXPORT_FILE_NAME;
use crate::common::utils::{expand_tilde, private_path};
use crate::storage::export_notes;

pub fn handle_export_command(debug_enabled: bool, path: Option<String>) -> Result<()> {
    log_version!();

    let ctx = AppContext::load()?;
    if debug_enabled {
        ctx.log_config();
    }

    let target = export_path(path.as_deref());
    let notes = ctx.notes();
    export_notes(notes.notes(), &target)?;

    log_block_start!(
        "Exported {} note(s) to {}",
        notes.notes().len(),
        private_path(&target)
    );
    log_end!();

    Ok(())
}

/// The requested path, or `calisthenics-progress.json` in the working directory.
pub(crate) fn export_path(requested: Option<&str>) -> PathBuf {
    match requested {
        Some(path) => expand_tilde(path),
        None => PathBuf::from(DEFAULT_EXPORT_FILE_NAME),
    }
}
