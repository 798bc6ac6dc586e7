//! Exercises, sections and the `"<section>-<index>"` exercise addressing scheme.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repetition target of an exercise: a plain count (`10`) or free text
/// (`"8-10"`, `"30s"`, `"max"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
    Count(u32),
    Text(String),
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reps::Count(n) => write!(f, "{n}"),
            Reps::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for Reps {
    fn from(count: u32) -> Self {
        Reps::Count(count)
    }
}

impl From<&str> for Reps {
    fn from(text: &str) -> Self {
        Reps::Text(text.to_string())
    }
}

/// One prescribed exercise of a workout day. Never mutated by the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub name: String,
    /// At least one. Program files with `"sets": 0` are rejected on load.
    #[serde(deserialize_with = "positive_sets")]
    pub sets: u32,
    pub reps: Reps,
    pub rest: String,
}

impl WorkoutExercise {
    pub fn new(name: &str, sets: u32, reps: impl Into<Reps>, rest: &str) -> Self {
        Self {
            name: name.to_string(),
            sets,
            reps: reps.into(),
            rest: rest.to_string(),
        }
    }
}

fn positive_sets<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let sets = u32::deserialize(deserializer)?;
    if sets == 0 {
        return Err(de::Error::invalid_value(
            Unexpected::Unsigned(0),
            &"a positive number of sets",
        ));
    }
    Ok(sets)
}

/// The four fixed sections of a workout day.
///
/// Declaration order is the priority order used to walk a day from its first
/// exercise to its last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Skill,
    Strength,
    Core,
    Conditioning,
}

impl SectionKey {
    /// All sections in priority order.
    pub const ALL: [SectionKey; 4] = [
        SectionKey::Skill,
        SectionKey::Strength,
        SectionKey::Core,
        SectionKey::Conditioning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Skill => "skill",
            SectionKey::Strength => "strength",
            SectionKey::Core => "core",
            SectionKey::Conditioning => "conditioning",
        }
    }

    /// Heading used when printing a day.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKey::Skill => "Skill Work",
            SectionKey::Strength => "Strength",
            SectionKey::Core => "Core",
            SectionKey::Conditioning => "Conditioning",
        }
    }

    /// Position of this section in priority order.
    pub fn priority(&self) -> usize {
        match self {
            SectionKey::Skill => 0,
            SectionKey::Strength => 1,
            SectionKey::Core => 2,
            SectionKey::Conditioning => 3,
        }
    }

    /// Sections that come after this one, in priority order.
    pub fn following(&self) -> &'static [SectionKey] {
        &Self::ALL[self.priority() + 1..]
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = ExerciseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skill" => Ok(SectionKey::Skill),
            "strength" => Ok(SectionKey::Strength),
            "core" => Ok(SectionKey::Core),
            "conditioning" => Ok(SectionKey::Conditioning),
            other => Err(ExerciseIdError::UnknownSection(other.to_string())),
        }
    }
}

/// Exercises of a workout day grouped by section.
///
/// A section may be absent or empty; both are skipped when walking the day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSections {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<Vec<WorkoutExercise>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<Vec<WorkoutExercise>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<Vec<WorkoutExercise>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditioning: Option<Vec<WorkoutExercise>>,
}

impl WorkoutSections {
    /// Builder-style setter, mostly for tests and embedders.
    pub fn with_section(mut self, key: SectionKey, exercises: Vec<WorkoutExercise>) -> Self {
        *self.slot_mut(key) = Some(exercises);
        self
    }

    /// Exercises of a section; absent sections read as empty.
    pub fn section(&self, key: SectionKey) -> &[WorkoutExercise] {
        let slot = match key {
            SectionKey::Skill => &self.skill,
            SectionKey::Strength => &self.strength,
            SectionKey::Core => &self.core,
            SectionKey::Conditioning => &self.conditioning,
        };
        slot.as_deref().unwrap_or(&[])
    }

    fn slot_mut(&mut self, key: SectionKey) -> &mut Option<Vec<WorkoutExercise>> {
        match key {
            SectionKey::Skill => &mut self.skill,
            SectionKey::Strength => &mut self.strength,
            SectionKey::Core => &mut self.core,
            SectionKey::Conditioning => &mut self.conditioning,
        }
    }

    /// Look up the exercise at `id`.
    pub fn get(&self, id: ExerciseId) -> Option<&WorkoutExercise> {
        self.section(id.section).get(id.index)
    }

    /// Total number of exercises across all sections.
    pub fn len(&self) -> usize {
        SectionKey::ALL.iter().map(|k| self.section(*k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All exercises with their ids, in workout order.
    pub fn iter(&self) -> impl Iterator<Item = (ExerciseId, &WorkoutExercise)> {
        SectionKey::ALL.into_iter().flat_map(move |section| {
            self.section(section)
                .iter()
                .enumerate()
                .map(move |(index, exercise)| (ExerciseId::new(section, index), exercise))
        })
    }
}

/// Position of an exercise within a day: section plus 0-based index.
///
/// Its string form `"<section>-<index>"` (e.g. `"strength-2"`) is how the
/// front end asks the timer to run one specific exercise, and is part of every
/// note key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExerciseId {
    pub section: SectionKey,
    pub index: usize,
}

impl ExerciseId {
    pub fn new(section: SectionKey, index: usize) -> Self {
        Self { section, index }
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.section, self.index)
    }
}

impl FromStr for ExerciseId {
    type Err = ExerciseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (section, index) = s
            .split_once('-')
            .ok_or_else(|| ExerciseIdError::MissingSeparator(s.to_string()))?;
        let section = section.parse::<SectionKey>()?;
        let index = index
            .parse::<usize>()
            .map_err(|_| ExerciseIdError::InvalidIndex(index.to_string()))?;
        Ok(Self { section, index })
    }
}

/// Why an exercise id string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseIdError {
    MissingSeparator(String),
    UnknownSection(String),
    InvalidIndex(String),
}

impl fmt::Display for ExerciseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseIdError::MissingSeparator(id) => {
                write!(f, "exercise id '{id}' is not of the form <section>-<index>")
            }
            ExerciseIdError::UnknownSection(section) => write!(
                f,
                "unknown section '{section}' (expected skill, strength, core or conditioning)"
            ),
            ExerciseIdError::InvalidIndex(index) => {
                write!(f, "exercise index '{index}' is not a non-negative number")
            }
        }
    }
}

impl std::error::Error for ExerciseIdError {}
