//! Stored workout programs.
//!
//! [`FileProgramStore`] keeps one JSON document per program in a directory,
//! named after the program id. On first use the store is seeded from a
//! [`ProgramSeed`] (the configured `program_file` or the built-in program).

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::utils::{private_path, write_atomic};
use crate::time_source;
use crate::workout::{ProgramSeed, WeekData, WorkoutProgram};

/// A program that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgram {
    pub title: String,
    pub subtitle: String,
    pub weeks: BTreeMap<String, WeekData>,
    pub guidelines: Vec<String>,
}

impl From<ProgramSeed> for NewProgram {
    fn from(seed: ProgramSeed) -> Self {
        Self {
            title: seed.program.title,
            subtitle: seed.program.subtitle,
            weeks: seed.program.weeks,
            guidelines: seed.guidelines,
        }
    }
}

/// Fields to replace on a stored program. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub weeks: Option<BTreeMap<String, WeekData>>,
    pub guidelines: Option<Vec<String>>,
}

#[cfg_attr(test, mockall::automock)]
pub trait ProgramStore: Send + Sync {
    /// Store a new program and return its id.
    fn save_program(&self, program: NewProgram) -> Result<String>;
    fn get_program(&self, id: &str) -> Result<Option<WorkoutProgram>>;
    /// Every stored program, most recently updated first.
    fn get_all_programs(&self) -> Result<Vec<WorkoutProgram>>;
    fn update_program(&self, id: &str, update: ProgramUpdate) -> Result<()>;
}

pub struct FileProgramStore {
    dir: PathBuf,
    counter: AtomicU64,
}

impl FileProgramStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn program_path(&self, id: &str) -> Result<PathBuf> {
        if !is_valid_id(id) {
            anyhow::bail!("Invalid program id '{id}'");
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    fn next_id(&self) -> String {
        let millis = time_source::now().timestamp_millis().max(0) as u64;
        let sequence = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{millis:x}{sequence:04x}")
    }

    fn write(&self, program: &WorkoutProgram) -> Result<()> {
        let path = self.program_path(&program.id)?;
        let json = serde_json::to_string_pretty(program).context("Failed to serialize program")?;
        write_atomic(&path, json.as_bytes())
    }

    fn read(path: &Path) -> Result<WorkoutProgram> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read program from {}", private_path(path)))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse program from {}", private_path(path)))
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

impl ProgramStore for FileProgramStore {
    fn save_program(&self, program: NewProgram) -> Result<String> {
        let mut id = self.next_id();
        while self.program_path(&id)?.exists() {
            id = self.next_id();
        }

        let now = time_source::now().with_timezone(&Utc);
        let stored = WorkoutProgram {
            id: id.clone(),
            title: program.title,
            subtitle: program.subtitle,
            weeks: program.weeks,
            guidelines: program.guidelines,
            created_at: now,
            updated_at: now,
        };
        self.write(&stored)
            .with_context(|| format!("Failed to save program '{}'", stored.title))?;
        Ok(id)
    }

    fn get_program(&self, id: &str) -> Result<Option<WorkoutProgram>> {
        let path = self.program_path(id)?;
        if !path.exists() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    fn get_all_programs(&self) -> Result<Vec<WorkoutProgram>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list programs in {}", private_path(&self.dir)))?;

        let mut programs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path) {
                Ok(program) => programs.push(program),
                Err(e) => log_warning!("Skipping unreadable program: {e:#}"),
            }
        }

        programs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(programs)
    }

    fn update_program(&self, id: &str, update: ProgramUpdate) -> Result<()> {
        let Some(mut program) = self.get_program(id)? else {
            anyhow::bail!("Program '{id}' not found");
        };

        if let Some(title) = update.title {
            program.title = title;
        }
        if let Some(subtitle) = update.subtitle {
            program.subtitle = subtitle;
        }
        if let Some(weeks) = update.weeks {
            program.weeks = weeks;
        }
        if let Some(guidelines) = update.guidelines {
            program.guidelines = guidelines;
        }
        program.updated_at = time_source::now().with_timezone(&Utc);

        self.write(&program)
    }
}

/// Make sure the seed program is stored, adding it when no stored program
/// carries its title. Returns the (possibly refreshed) program list.
pub fn ensure_programs_exist(
    store: &dyn ProgramStore,
    seed: &ProgramSeed,
) -> Result<Vec<WorkoutProgram>> {
    let programs = store
        .get_all_programs()
        .context("Failed to check stored programs")?;

    if programs.iter().any(|p| p.title == seed.program.title) {
        return Ok(programs);
    }

    log_decorated!("Seeding program: {}", seed.program.title);
    let id = store
        .save_program(NewProgram::from(seed.clone()))
        .context("Failed to seed program")?;
    log_indented!("Stored with id {id}");

    store.get_all_programs()
}
