//! The `programs` command: list stored programs, seeding the built-in one on
//! first use.

use anyhow::Result;

use super::AppContext;
use crate::workout::WorkoutProgram;

pub fn handle_programs_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    let ctx = AppContext::load()?;
    if debug_enabled {
        ctx.log_config();
    }

    let programs = ctx.programs()?;
    let prefs = ctx.preferences();
    let selected = prefs.preferences().last_selected_program_id.as_deref();

    log_block_start!("{} stored program(s)", programs.len());
    for program in &programs {
        let marker = if Some(program.id.as_str()) == selected { "*" } else { " " };
        log_indented!("{marker} {}", program_summary(program));
        if !program.subtitle.is_empty() {
            log_indented!("    {}", program.subtitle);
        }
        if debug_enabled {
            for guideline in &program.guidelines {
                log_indented!("    - {guideline}");
            }
        }
    }

    if programs.len() > 1 {
        log_pipe!();
        log_info!("* marks the program used by 'run', 'show' and 'notes'");
    }
    log_end!();

    Ok(())
}

/// `<title> [<id>] · <n> weeks · updated <date>`
pub(crate) fn program_summary(program: &WorkoutProgram) -> String {
    format!(
        "{} [{}] · {} weeks · updated {}",
        program.title,
        program.id,
        program.week_count(),
        program.updated_at.format("%Y-%m-%d")
    )
}
