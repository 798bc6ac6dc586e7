//! Multi-week program documents and week/day lookup.
//!
//! A program groups its weeks under string keys that are either a single week
//! number (`"3"`) or an inclusive range (`"1-2"`) sharing one block of days.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::exercise::WorkoutSections;
use crate::common::utils::private_path;

/// One training day: a display name plus its four sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayData {
    pub name: String,
    #[serde(flatten)]
    pub sections: WorkoutSections,
}

/// A block of one or more weeks sharing the same days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekData {
    pub phase: String,
    pub description: String,
    pub days: BTreeMap<String, DayData>,
}

/// A stored program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutProgram {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub weeks: BTreeMap<String, WeekData>,
    pub guidelines: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkoutProgram {
    /// Find the week block covering week `week`.
    pub fn week(&self, week: u32) -> Option<&WeekData> {
        self.weeks
            .iter()
            .find(|(key, _)| week_key_matches(key, week))
            .map(|(_, data)| data)
    }

    /// Find day `day` of week `week`.
    pub fn day(&self, week: u32, day: u32) -> Option<&DayData> {
        self.week(week)?.days.get(&day.to_string())
    }

    /// Highest week number any key covers.
    pub fn week_count(&self) -> u32 {
        self.weeks
            .keys()
            .filter_map(|key| week_key_bounds(key).map(|(_, end)| end))
            .max()
            .unwrap_or(0)
    }
}

/// Parse a week key into inclusive bounds.
fn week_key_bounds(key: &str) -> Option<(u32, u32)> {
    match key.split_once('-') {
        Some((start, end)) => {
            let start = start.trim().parse().ok()?;
            let end = end.trim().parse().ok()?;
            Some((start, end))
        }
        None => {
            let single = key.trim().parse().ok()?;
            Some((single, single))
        }
    }
}

fn week_key_matches(key: &str, week: u32) -> bool {
    week_key_bounds(key).is_some_and(|(start, end)| (start..=end).contains(&week))
}

/// Seed document format: `{ "program": { title, subtitle, weeks }, "guidelines": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSeed {
    pub program: SeedProgram,
    #[serde(default)]
    pub guidelines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedProgram {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub weeks: BTreeMap<String, WeekData>,
}

const EMBEDDED_PROGRAM: &str = include_str!("../../assets/default_program.json");

impl ProgramSeed {
    /// The program shipped with the binary.
    pub fn embedded() -> Result<Self> {
        serde_json::from_str(EMBEDDED_PROGRAM).context("Embedded default program is malformed")
    }

    /// Load a seed document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read program from {}", private_path(path)))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse program from {}", private_path(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{ExerciseId, SectionKey};

    fn program_with_weeks(keys: &[&str]) -> WorkoutProgram {
        let weeks = keys
            .iter()
            .map(|key| {
                (
                    key.to_string(),
                    WeekData {
                        phase: format!("Phase {key}"),
                        description: String::new(),
                        days: BTreeMap::new(),
                    },
                )
            })
            .collect();
        WorkoutProgram {
            id: "p1".into(),
            title: "Test".into(),
            subtitle: String::new(),
            weeks,
            guidelines: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_week_lookup_handles_ranges_and_singles() {
        let program = program_with_weeks(&["1-2", "3-4", "5"]);
        assert_eq!(program.week(1).unwrap().phase, "Phase 1-2");
        assert_eq!(program.week(2).unwrap().phase, "Phase 1-2");
        assert_eq!(program.week(4).unwrap().phase, "Phase 3-4");
        assert_eq!(program.week(5).unwrap().phase, "Phase 5");
        assert!(program.week(6).is_none());
        assert_eq!(program.week_count(), 5);
    }

    #[test]
    fn test_week_lookup_ignores_garbage_keys() {
        let program = program_with_weeks(&["intro", "1-x", "2"]);
        assert!(program.week(1).is_none());
        assert!(program.week(2).is_some());
    }

    #[test]
    fn test_embedded_program_parses() {
        let seed = ProgramSeed::embedded().unwrap();
        assert_eq!(
            seed.program.title,
            crate::common::constants::DEFAULT_PROGRAM_TITLE
        );
        assert!(!seed.guidelines.is_empty());

        let week = seed.program.weeks.get("1-2").unwrap();
        let day = week.days.get("1").unwrap();
        assert!(!day.sections.is_empty());
        assert!(
            day.sections
                .get(ExerciseId::new(SectionKey::Strength, 0))
                .is_some()
        );
    }

    #[test]
    fn test_day_data_flattens_sections() {
        let json = r#"{"name":"Push","core":[{"name":"Plank","sets":3,"reps":"45s","rest":"30s"}]}"#;
        let day: DayData = serde_json::from_str(json).unwrap();
        assert_eq!(day.name, "Push");
        assert_eq!(day.sections.section(SectionKey::Core).len(), 1);
    }

    #[test]
    fn test_day_with_zero_sets_is_rejected() {
        let json = r#"{"name": "Push", "strength": [{"name": "Push-up", "sets": 0, "reps": 10, "rest": "30s"}]}"#;
        let err = serde_json::from_str::<DayData>(json).unwrap_err();
        assert!(err.to_string().contains("positive number of sets"), "{err}");

        let json = r#"{"name": "Push", "strength": [{"name": "Push-up", "sets": 1, "reps": 10, "rest": "30s"}]}"#;
        let day: DayData = serde_json::from_str(json).unwrap();
        assert_eq!(day.sections.section(SectionKey::Strength)[0].sets, 1);
    }
}
