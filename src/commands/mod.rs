//! Command-line command handlers for calistimer.
//!
//! Each command lives in its own submodule. The helpers here cover what they
//! share: loading configuration, opening the stores under the data directory,
//! and resolving which program, week and day a command works on.

pub mod export;
pub mod help;
pub mod notes;
pub mod programs;
pub mod run;
pub mod show;

use anyhow::{Context, Result};

use crate::args::DaySelection;
use crate::config::{self, Config};
use crate::storage::{
    DataPaths, FileNotesStore, FileProgramStore, PreferencesStore, SyncedNotes,
    ensure_programs_exist,
};
use crate::workout::{DayData, ProgramSeed, WorkoutProgram};

/// Configuration plus the data locations it resolves to.
pub(crate) struct AppContext {
    pub config: Config,
    pub paths: DataPaths,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let paths = DataPaths::from_config(&config)?;
        Ok(Self { config, paths })
    }

    pub fn log_config(&self) {
        let source = config::get_config_path().ok();
        self.config.log_config(source.as_deref());
    }

    pub fn program_store(&self) -> FileProgramStore {
        FileProgramStore::new(&self.paths.programs_dir)
    }

    /// Notes loaded from the data directory, with the local backup as fallback.
    pub fn notes(&self) -> SyncedNotes {
        let mut notes = SyncedNotes::new(
            Box::new(FileNotesStore::new(&self.paths.notes_file)),
            Box::new(FileNotesStore::new(&self.paths.notes_backup_file)),
        );
        notes.load();
        notes
    }

    pub fn preferences(&self) -> PreferencesStore {
        PreferencesStore::load(&self.paths.preferences_file)
    }

    /// The configured seed program, or the built-in one.
    pub fn seed(&self) -> Result<ProgramSeed> {
        match self.config.program_file() {
            Some(path) => ProgramSeed::from_path(&path),
            None => ProgramSeed::embedded(),
        }
    }

    /// Every stored program, seeding the store first if needed.
    pub fn programs(&self) -> Result<Vec<WorkoutProgram>> {
        let seed = self.seed()?;
        ensure_programs_exist(&self.program_store(), &seed)
    }
}

/// Pick the remembered program if it still exists, else the seed program,
/// else the most recently updated one.
pub(crate) fn choose_program(
    programs: Vec<WorkoutProgram>,
    remembered: Option<&str>,
    seed_title: &str,
) -> Option<WorkoutProgram> {
    if let Some(id) = remembered
        && let Some(program) = programs.iter().find(|p| p.id == id)
    {
        return Some(program.clone());
    }

    if let Some(program) = programs.iter().find(|p| p.title == seed_title) {
        return Some(program.clone());
    }

    programs.into_iter().next()
}

/// Week and day to use: command line first, then preferences.
pub(crate) fn resolve_selection(selection: DaySelection, store: &PreferencesStore) -> (u32, u32) {
    let prefs = store.preferences();
    (
        selection.week.unwrap_or(prefs.last_selected_week),
        selection.day.unwrap_or(prefs.last_selected_day),
    )
}

/// Day `day` of week `week`, or an error listing what the program does have.
pub(crate) fn lookup_day(program: &WorkoutProgram, week: u32, day: u32) -> Result<&DayData> {
    let week_data = program.week(week).with_context(|| {
        format!(
            "Week {week} is not part of '{}' (weeks 1-{})",
            program.title,
            program.week_count()
        )
    })?;

    week_data.days.get(&day.to_string()).with_context(|| {
        let days: Vec<&str> = week_data.days.keys().map(String::as_str).collect();
        format!(
            "Week {week} has no day {day} (available days: {})",
            days.join(", ")
        )
    })
}

/// Resolve the program and day a command works on, remembering the choice.
pub(crate) fn select_day(
    ctx: &AppContext,
    selection: DaySelection,
) -> Result<(WorkoutProgram, u32, u32)> {
    let seed = ctx.seed()?;
    let programs = ensure_programs_exist(&ctx.program_store(), &seed)?;

    let mut prefs = ctx.preferences();
    let program = choose_program(
        programs,
        prefs.preferences().last_selected_program_id.as_deref(),
        &seed.program.title,
    )
    .context("No workout programs available")?;

    let (week, day) = resolve_selection(selection, &prefs);
    lookup_day(&program, week, day)?;

    if let Err(e) = prefs
        .update_program_and_week(&program.id, week)
        .and_then(|_| prefs.update_day(day))
    {
        log_warning!("Failed to remember selection: {e:#}");
    }

    Ok((program, week, day))
}
