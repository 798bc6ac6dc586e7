//! Remembered selections: last program, week and day.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::constants::{DEFAULT_DAY, DEFAULT_WEEK};
use crate::common::utils::{private_path, write_atomic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub last_selected_program_id: Option<String>,
    pub last_selected_week: u32,
    pub last_selected_day: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            last_selected_program_id: None,
            last_selected_week: DEFAULT_WEEK,
            last_selected_day: DEFAULT_DAY,
        }
    }
}

/// Preferences persisted as JSON; every update is written straight back.
pub struct PreferencesStore {
    path: PathBuf,
    preferences: UserPreferences,
}

impl PreferencesStore {
    /// Load preferences from `path`.
    ///
    /// A missing file means defaults. An unreadable or malformed file is logged
    /// and also yields defaults, so a bad file never blocks a workout.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let preferences = match read_preferences(&path) {
            Ok(preferences) => preferences,
            Err(e) => {
                log_error!("Error loading user preferences: {e:#}");
                UserPreferences::default()
            }
        };
        Self { path, preferences }
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn update_program(&mut self, program_id: &str) -> Result<()> {
        self.preferences.last_selected_program_id = Some(program_id.to_string());
        self.save()
    }

    pub fn update_week(&mut self, week: u32) -> Result<()> {
        self.preferences.last_selected_week = week;
        self.save()
    }

    pub fn update_day(&mut self, day: u32) -> Result<()> {
        self.preferences.last_selected_day = day;
        self.save()
    }

    pub fn update_program_and_week(&mut self, program_id: &str, week: u32) -> Result<()> {
        self.preferences.last_selected_program_id = Some(program_id.to_string());
        self.preferences.last_selected_week = week;
        self.save()
    }

    pub fn reset_to_defaults(&mut self) -> Result<()> {
        self.preferences = UserPreferences::default();
        self.save()
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.preferences)
            .context("Failed to serialize preferences")?;
        write_atomic(&self.path, json.as_bytes())
            .with_context(|| format!("Failed to save preferences to {}", private_path(&self.path)))
    }
}

fn read_preferences(path: &Path) -> Result<UserPreferences> {
    if !path.exists() {
        return Ok(UserPreferences::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", private_path(path)))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", private_path(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = PreferencesStore::load(dir.path().join("preferences.json"));
        assert_eq!(store.preferences(), &UserPreferences::default());
        assert_eq!(store.preferences().last_selected_week, 1);
        assert_eq!(store.preferences().last_selected_day, 1);
    }

    #[test]
    fn test_updates_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let mut store = PreferencesStore::load(&path);
        store.update_program_and_week("abc", 3).unwrap();
        store.update_day(2).unwrap();

        let reloaded = PreferencesStore::load(&path);
        assert_eq!(
            reloaded.preferences(),
            &UserPreferences {
                last_selected_program_id: Some("abc".into()),
                last_selected_week: 3,
                last_selected_day: 2,
            }
        );
    }

    #[test]
    fn test_partial_file_merges_onto_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{"last_selected_week": 5, "theme": "dark"}"#).unwrap();

        let store = PreferencesStore::load(&path);
        assert_eq!(store.preferences().last_selected_week, 5);
        assert_eq!(store.preferences().last_selected_day, DEFAULT_DAY);
        assert!(store.preferences().last_selected_program_id.is_none());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ nope").unwrap();

        let mut store = PreferencesStore::load(&path);
        assert_eq!(store.preferences(), &UserPreferences::default());

        store.update_week(4).unwrap();
        assert_eq!(PreferencesStore::load(&path).preferences().last_selected_week, 4);
    }

    #[test]
    fn test_reset_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let mut store = PreferencesStore::load(&path);
        store.update_program("xyz").unwrap();
        store.reset_to_defaults().unwrap();
        assert_eq!(
            PreferencesStore::load(&path).preferences(),
            &UserPreferences::default()
        );
    }
}
