//! The `note` and `notes` commands: record and print per-exercise notes.

use anyhow::{Context, Result, bail};

use super::{AppContext, choose_program, lookup_day};
use crate::args::DaySelection;
use crate::storage::{SyncStatus, SyncedNotes, UserNotes};
use crate::workout::ExerciseId;

/// Record `text` as the note for one exercise.
///
/// The exercise must exist on that day of the selected program, so a typo in
/// the id does not leave an orphaned note behind.
pub fn handle_note_command(
    debug_enabled: bool,
    week: u32,
    day: u32,
    exercise_id: &str,
    text: &str,
) -> Result<()> {
    log_version!();

    let ctx = AppContext::load()?;
    if debug_enabled {
        ctx.log_config();
    }

    let id: ExerciseId = exercise_id
        .parse()
        .with_context(|| format!("Invalid exercise id '{exercise_id}'"))?;

    let seed = ctx.seed()?;
    let prefs = ctx.preferences();
    let program = choose_program(
        ctx.programs()?,
        prefs.preferences().last_selected_program_id.as_deref(),
        &seed.program.title,
    )
    .context("No workout programs available")?;

    let day_data = lookup_day(&program, week, day)?;
    let Some(exercise) = day_data.sections.get(id) else {
        bail!("Week {week}, day {day} has no exercise {id}");
    };

    let mut notes = ctx.notes();
    notes.update_note(week, day, &id, text.trim());
    notes.save()?;

    log_block_start!("Saved note for {} (week {week}, day {day})", exercise.name);
    log_indented!("{}", text.trim());
    log_sync_status(&notes);
    log_end!();

    Ok(())
}

/// Print recorded notes, optionally narrowed to one week or one day.
pub fn handle_notes_command(debug_enabled: bool, selection: DaySelection) -> Result<()> {
    log_version!();

    let ctx = AppContext::load()?;
    if debug_enabled {
        ctx.log_config();
    }

    let notes = ctx.notes();
    let shown = filter_notes(notes.notes(), selection);

    if shown.is_empty() {
        log_block_start!("No notes recorded");
    } else {
        log_block_start!("{} note(s)", shown.len());
        for (key, text) in shown {
            log_indented!("{key:<24}{text}");
        }
    }
    log_sync_status(&notes);
    log_end!();

    Ok(())
}

/// Notes whose key falls within `selection`, in key order.
pub(crate) fn filter_notes(notes: &UserNotes, selection: DaySelection) -> Vec<(&str, &str)> {
    let prefix = match (selection.week, selection.day) {
        (Some(week), Some(day)) => format!("w{week}-d{day}-"),
        (Some(week), None) => format!("w{week}-"),
        (None, Some(day)) => {
            let infix = format!("-d{day}-");
            return notes
                .iter()
                .filter(|(key, _)| key.contains(&infix))
                .map(|(key, text)| (key.as_str(), text.as_str()))
                .collect();
        }
        (None, None) => String::new(),
    };

    notes
        .iter()
        .filter(|(key, _)| key.starts_with(&prefix))
        .map(|(key, text)| (key.as_str(), text.as_str()))
        .collect()
}

fn log_sync_status(notes: &SyncedNotes) {
    match (notes.status(), notes.last_synced()) {
        (SyncStatus::Synced, Some(at)) => {
            log_indented!("Notes synced at {}", at.format("%Y-%m-%d %H:%M:%S"))
        }
        (status, _) => log_indented!("Notes status: {}", status.as_str()),
    }
}
