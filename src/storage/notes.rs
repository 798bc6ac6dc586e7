//! Per-exercise training notes.
//!
//! Notes are a flat, ordered `key → text` map. Keys address one exercise on one
//! training day: `w<week>-d<day>-<exercise id>`, e.g. `w1-d2-strength-0`.
//!
//! [`SyncedNotes`] pairs a primary store (typically remote, supplied by the
//! embedder) with a local backup and tracks whether the last exchange with the
//! primary succeeded.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::common::utils::{private_path, write_atomic};
use crate::time_source;
use crate::workout::ExerciseId;

pub type UserNotes = BTreeMap<String, String>;

/// Key of the note for exercise `id` on `day` of `week`.
pub fn note_key(week: u32, day: u32, id: &ExerciseId) -> String {
    format!("w{week}-d{day}-{id}")
}

/// Prefix shared by every note of one training day.
pub fn day_prefix(week: u32, day: u32) -> String {
    format!("w{week}-d{day}-")
}

/// Somewhere notes can be kept.
#[cfg_attr(test, mockall::automock)]
pub trait NotesStore: Send + Sync {
    fn load(&self) -> Result<UserNotes>;
    fn save(&self, notes: &UserNotes) -> Result<()>;
    fn update_note(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct NotesDocument {
    notes: UserNotes,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredNotes {
    Document(NotesDocument),
    /// Bare map, as written by `export`
    Plain(UserNotes),
}

/// Notes kept in a JSON document on disk.
pub struct FileNotesStore {
    path: PathBuf,
}

impl FileNotesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NotesStore for FileNotesStore {
    fn load(&self) -> Result<UserNotes> {
        if !self.path.exists() {
            return Ok(UserNotes::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read notes from {}", private_path(&self.path)))?;
        let stored: StoredNotes = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse notes from {}", private_path(&self.path)))?;

        Ok(match stored {
            StoredNotes::Document(doc) => doc.notes,
            StoredNotes::Plain(notes) => notes,
        })
    }

    fn save(&self, notes: &UserNotes) -> Result<()> {
        let doc = NotesDocument {
            notes: notes.clone(),
            last_updated: Some(time_source::now().with_timezone(&Utc)),
        };
        let json = serde_json::to_string_pretty(&doc).context("Failed to serialize notes")?;
        write_atomic(&self.path, json.as_bytes())
    }

    fn update_note(&self, key: &str, value: &str) -> Result<()> {
        let mut notes = self.load()?;
        notes.insert(key.to_string(), value.to_string());
        self.save(&notes)
    }
}

/// State of the last exchange with the primary store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    Syncing,
    Offline,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "synced",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Offline => "offline",
        }
    }
}

/// In-memory notes backed by a primary store with a local fallback.
pub struct SyncedNotes {
    primary: Box<dyn NotesStore>,
    local: Box<dyn NotesStore>,
    notes: UserNotes,
    status: SyncStatus,
    last_synced: Option<DateTime<Local>>,
}

impl SyncedNotes {
    pub fn new(primary: Box<dyn NotesStore>, local: Box<dyn NotesStore>) -> Self {
        Self {
            primary,
            local,
            notes: UserNotes::new(),
            status: SyncStatus::Offline,
            last_synced: None,
        }
    }

    /// Load from the primary store, falling back to the local copy when the
    /// primary is unreachable.
    pub fn load(&mut self) -> &UserNotes {
        self.status = SyncStatus::Syncing;
        match self.primary.load() {
            Ok(notes) => {
                self.notes = notes;
                self.mark_synced();
            }
            Err(e) => {
                log_warning!("Failed to load notes from primary store: {e}");
                self.status = SyncStatus::Offline;
                match self.local.load() {
                    Ok(notes) => self.notes = notes,
                    Err(e) => log_error!("Failed to load local notes: {e}"),
                }
            }
        }
        &self.notes
    }

    /// Write the current notes to the primary store and always to the local
    /// backup. Fails only if the local write fails.
    pub fn save(&mut self) -> Result<()> {
        self.status = SyncStatus::Syncing;
        match self.primary.save(&self.notes) {
            Ok(()) => self.mark_synced(),
            Err(e) => {
                log_warning!("Failed to save notes to primary store: {e}");
                self.status = SyncStatus::Offline;
            }
        }
        self.local
            .save(&self.notes)
            .context("Failed to save notes locally")
    }

    /// Set the note for one exercise. Held in memory until [`save`](Self::save).
    pub fn update_note(&mut self, week: u32, day: u32, id: &ExerciseId, value: &str) {
        self.notes.insert(note_key(week, day, id), value.to_string());
    }

    pub fn note(&self, week: u32, day: u32, id: &ExerciseId) -> Option<&str> {
        self.notes.get(&note_key(week, day, id)).map(String::as_str)
    }

    /// Notes of one training day, in key order.
    pub fn day_notes(&self, week: u32, day: u32) -> impl Iterator<Item = (&str, &str)> {
        let prefix = day_prefix(week, day);
        self.notes
            .iter()
            .filter(move |(key, _)| key.starts_with(&prefix))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn notes(&self) -> &UserNotes {
        &self.notes
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn last_synced(&self) -> Option<DateTime<Local>> {
        self.last_synced
    }

    fn mark_synced(&mut self) {
        self.status = SyncStatus::Synced;
        self.last_synced = Some(time_source::now());
    }
}

/// Write `notes` to `path` as pretty-printed JSON.
pub fn export_notes(notes: &UserNotes, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(notes).context("Failed to serialize notes")?;
    write_atomic(path, json.as_bytes())
        .with_context(|| format!("Failed to export notes to {}", private_path(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::SectionKey;
    use tempfile::tempdir;

    fn strength(index: usize) -> ExerciseId {
        ExerciseId::new(SectionKey::Strength, index)
    }

    #[test]
    fn test_note_key_format() {
        assert_eq!(note_key(1, 2, &strength(0)), "w1-d2-strength-0");
        assert!(note_key(3, 1, &strength(4)).starts_with(&day_prefix(3, 1)));
    }

    #[test]
    fn test_file_store_roundtrip_and_update() {
        let dir = tempdir().unwrap();
        let store = FileNotesStore::new(dir.path().join("notes.json"));
        assert!(store.load().unwrap().is_empty());

        store.update_note("w1-d1-core-0", "45s felt easy").unwrap();
        store.update_note("w1-d1-core-1", "hollow hold shaky").unwrap();
        store.update_note("w1-d1-core-0", "50s next time").unwrap();

        let notes = store.load().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes["w1-d1-core-0"], "50s next time");

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("last_updated"));
    }

    #[test]
    fn test_file_store_reads_exported_plain_map() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let mut notes = UserNotes::new();
        notes.insert("w2-d3-skill-0".into(), "crow 10s".into());
        export_notes(&notes, &path).unwrap();

        let store = FileNotesStore::new(&path);
        assert_eq!(store.load().unwrap(), notes);
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileNotesStore::new(&path).load().is_err());
    }

    #[test]
    fn test_synced_load_prefers_primary() {
        let mut primary = MockNotesStore::new();
        primary.expect_load().returning(|| {
            let mut notes = UserNotes::new();
            notes.insert("w1-d1-strength-0".into(), "cloud".into());
            Ok(notes)
        });
        let mut local = MockNotesStore::new();
        local.expect_load().never();

        let mut synced = SyncedNotes::new(Box::new(primary), Box::new(local));
        assert_eq!(synced.status(), SyncStatus::Offline);

        synced.load();
        assert_eq!(synced.status(), SyncStatus::Synced);
        assert!(synced.last_synced().is_some());
        assert_eq!(synced.note(1, 1, &strength(0)), Some("cloud"));
    }

    #[test]
    fn test_synced_load_falls_back_to_local() {
        let mut primary = MockNotesStore::new();
        primary
            .expect_load()
            .returning(|| Err(anyhow::anyhow!("unreachable")));
        let mut local = MockNotesStore::new();
        local.expect_load().times(1).returning(|| {
            let mut notes = UserNotes::new();
            notes.insert("w1-d1-strength-0".into(), "local".into());
            Ok(notes)
        });

        let mut synced = SyncedNotes::new(Box::new(primary), Box::new(local));
        synced.load();
        assert_eq!(synced.status(), SyncStatus::Offline);
        assert!(synced.last_synced().is_none());
        assert_eq!(synced.note(1, 1, &strength(0)), Some("local"));
    }

    #[test]
    fn test_synced_save_always_writes_local_backup() {
        let mut primary = MockNotesStore::new();
        primary
            .expect_save()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("offline")));
        let mut local = MockNotesStore::new();
        local
            .expect_save()
            .withf(|notes| notes.get("w1-d2-strength-1").map(String::as_str) == Some("8 reps"))
            .times(1)
            .returning(|_| Ok(()));

        let mut synced = SyncedNotes::new(Box::new(primary), Box::new(local));
        synced.update_note(1, 2, &strength(1), "8 reps");
        synced.save().unwrap();
        assert_eq!(synced.status(), SyncStatus::Offline);
    }

    #[test]
    fn test_synced_save_success_marks_synced() {
        let mut primary = MockNotesStore::new();
        primary.expect_save().times(1).returning(|_| Ok(()));
        let mut local = MockNotesStore::new();
        local.expect_save().times(1).returning(|_| Ok(()));

        let mut synced = SyncedNotes::new(Box::new(primary), Box::new(local));
        synced.save().unwrap();
        assert_eq!(synced.status(), SyncStatus::Synced);
        assert!(synced.last_synced().is_some());
    }

    #[test]
    fn test_day_notes_filters_by_prefix() {
        let mut synced = SyncedNotes::new(
            Box::new(MockNotesStore::new()),
            Box::new(MockNotesStore::new()),
        );
        synced.update_note(1, 1, &strength(0), "a");
        synced.update_note(1, 1, &strength(1), "b");
        synced.update_note(1, 11, &strength(0), "other day");
        synced.update_note(2, 1, &strength(0), "other week");

        let day: Vec<_> = synced.day_notes(1, 1).collect();
        assert_eq!(
            day,
            vec![("w1-d1-strength-0", "a"), ("w1-d1-strength-1", "b")]
        );
    }
}
