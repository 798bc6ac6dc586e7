//! The `show` command: print one training day with its exercise ids.

use anyhow::Result;

use super::{AppContext, lookup_day, select_day};
use crate::args::DaySelection;
use crate::storage::{UserNotes, note_key};
use crate::timer::{parse_rest_time, parse_work_time};
use crate::workout::{DayData, ExerciseId, SectionKey, WorkoutExercise};

pub fn handle_show_command(debug_enabled: bool, selection: DaySelection) -> Result<()> {
    log_version!();

    let ctx = AppContext::load()?;
    if debug_enabled {
        ctx.log_config();
    }

    let (program, week, day) = select_day(&ctx, selection)?;
    let day_data = lookup_day(&program, week, day)?;

    let notes = ctx.notes();

    log_block_start!("{}", program.title);
    if let Some(block) = program.week(week) {
        log_indented!("Week {week}: {} · {}", block.phase, block.description);
    }
    print_day(day_data, week, day, notes.notes());
    log_end!();

    Ok(())
}

fn print_day(day_data: &DayData, week: u32, day: u32, notes: &UserNotes) {
    log_block_start!("Day {day}: {}", day_data.name);

    if day_data.sections.is_empty() {
        log_indented!("No exercises");
        return;
    }

    for section in SectionKey::ALL {
        let exercises = day_data.sections.section(section);
        if exercises.is_empty() {
            continue;
        }
        log_block_start!(section.title());
        for (index, exercise) in exercises.iter().enumerate() {
            let id = ExerciseId::new(section, index);
            log_indented!("{}", exercise_line(id, exercise));
            if let Some(note) = notes.get(&note_key(week, day, &id)) {
                log_indented!("    note: {note}");
            }
        }
    }
}

/// One exercise: id, prescription and the timings the timer will use.
pub(crate) fn exercise_line(id: ExerciseId, exercise: &WorkoutExercise) -> String {
    let work = parse_work_time(&exercise.reps);
    let rest = parse_rest_time(&exercise.rest);
    format!(
        "{:<16}{} · {} × {} · rest {} ({}s work, {}s rest per set)",
        id.to_string(),
        exercise.name,
        exercise.sets,
        exercise.reps,
        exercise.rest,
        work,
        rest
    )
}
