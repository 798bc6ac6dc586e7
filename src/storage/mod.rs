//! Persistence for everything outside the timer: notes, stored programs and
//! remembered selections. All of it lives under the configured data directory.

pub mod notes;
pub mod preferences;
pub mod programs;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::common::constants::{
    NOTES_BACKUP_FILE_NAME, NOTES_FILE_NAME, PREFERENCES_FILE_NAME, PROGRAMS_DIR_NAME,
};
use crate::config::Config;

pub use notes::{
    FileNotesStore, NotesStore, SyncStatus, SyncedNotes, UserNotes, export_notes, note_key,
};
pub use preferences::{PreferencesStore, UserPreferences};
pub use programs::{
    FileProgramStore, NewProgram, ProgramStore, ProgramUpdate, ensure_programs_exist,
};

/// File locations inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub notes_file: PathBuf,
    /// Local copy written on every notes save
    pub notes_backup_file: PathBuf,
    pub preferences_file: PathBuf,
    pub programs_dir: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            notes_file: data_dir.join(NOTES_FILE_NAME),
            notes_backup_file: data_dir.join(NOTES_BACKUP_FILE_NAME),
            preferences_file: data_dir.join(PREFERENCES_FILE_NAME),
            programs_dir: data_dir.join(PROGRAMS_DIR_NAME),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.data_dir()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_live_under_data_dir() {
        let config = Config {
            data_dir: Some("/srv/calistimer".into()),
            ..Config::default()
        };
        let paths = DataPaths::from_config(&config).unwrap();
        assert_eq!(paths.notes_file, Path::new("/srv/calistimer/notes.json"));
        assert_eq!(
            paths.notes_backup_file,
            Path::new("/srv/calistimer/notes.local.json")
        );
        assert_eq!(
            paths.preferences_file,
            Path::new("/srv/calistimer/preferences.json")
        );
        assert_eq!(paths.programs_dir, Path::new("/srv/calistimer/programs"));
    }
}
