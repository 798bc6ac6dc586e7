//! Help command implementation.
//!
//! Dispatches `calistimer help [COMMAND]` to the detailed help of one command,
//! or to the general command overview.

use anyhow::Result;

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("run") | Some("r") => display_run_help(),
        Some("show") | Some("s") => display_show_help(),
        Some("programs") | Some("p") => display_programs_help(),
        Some("note") | Some("n") => display_note_help(),
        Some("notes") => display_notes_help(),
        Some("export") | Some("x") => display_export_help(),
        Some("help") | Some("h") => display_help_help(),
        Some(unknown) => {
            log_pipe!();
            log_warning!("Unknown command: {unknown}");
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("run, r                  Run a timed session (default)");
    log_indented!("show, s                 Print the selected day's exercises");
    log_indented!("programs, p             List stored programs");
    log_indented!("note, n <w> <d> <id> <text>  Record a note for an exercise");
    log_indented!("notes                   Print recorded notes");
    log_indented!("export, x [path]        Export notes as JSON");
    log_indented!("help, h [COMMAND]       Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'calistimer help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'calistimer --help' to see all options and general usage.");
    log_end!();
}

fn display_run_help() {
    log_version!();
    log_block_start!("run - Run a timed workout session");
    log_block_start!("Usage: calistimer run [--week N] [--day N] [--exercise ID]");
    log_block_start!("Description:");
    log_indented!("Counts down every set and rest period of the selected day,");
    log_indented!("moving through skill, strength, core and conditioning in order.");
    log_indented!("Week and day default to the last selection.");
    log_block_start!("Options:");
    log_indented!("-w, --week <n>       Training week");
    log_indented!("-D, --day <n>        Training day");
    log_indented!("-e, --exercise <id>  Run only this exercise, e.g. strength-0");
    log_indented!("-l, --log <file>     Also write the session log to a file");
    log_block_start!("Keys:");
    log_indented!("space    Pause or resume");
    log_indented!("s        Skip the rest of the current set or rest period");
    log_indented!("n        Jump to the next exercise");
    log_indented!("+ / -    Add or remove time (time_adjust_step seconds)");
    log_indented!("q, Esc   Stop the session");
    log_block_start!("Examples:");
    log_indented!("calistimer run --week 3 --day 2");
    log_indented!("calistimer run -e core-1");
    log_end!();
}

fn display_show_help() {
    log_version!();
    log_block_start!("show - Print a training day");
    log_block_start!("Usage: calistimer show [--week N] [--day N]");
    log_block_start!("Description:");
    log_indented!("Lists every exercise of the day with its id, prescription,");
    log_indented!("the work and rest durations the timer will use, and any notes.");
    log_block_start!("Examples:");
    log_indented!("calistimer show");
    log_indented!("calistimer show -w 5 -D 1");
    log_end!();
}

fn display_programs_help() {
    log_version!();
    log_block_start!("programs - List stored programs");
    log_block_start!("Usage: calistimer programs");
    log_block_start!("Description:");
    log_indented!("Programs live in the data directory. The built-in program, or");
    log_indented!("the one named by program_file, is stored on first use.");
    log_indented!("With --debug each program's guidelines are printed too.");
    log_end!();
}

fn display_note_help() {
    log_version!();
    log_block_start!("note - Record a note for one exercise");
    log_block_start!("Usage: calistimer note <week> <day> <exercise-id> <text...>");
    log_block_start!("Arguments:");
    log_indented!("week, day     Training week and day");
    log_indented!("exercise-id   <section>-<index>, as printed by 'show'");
    log_indented!("text          Note text; use -- before text starting with '-'");
    log_block_start!("Examples:");
    log_indented!("calistimer note 1 2 strength-0 felt strong, add reps");
    log_indented!("calistimer note 1 2 core-1 -- -5s on the last set");
    log_end!();
}

fn display_notes_help() {
    log_version!();
    log_block_start!("notes - Print recorded notes");
    log_block_start!("Usage: calistimer notes [--week N] [--day N]");
    log_block_start!("Description:");
    log_indented!("Without options every note is printed. --week and --day narrow");
    log_indented!("the list independently.");
    log_end!();
}

fn display_export_help() {
    log_version!();
    log_block_start!("export - Export notes as JSON");
    log_block_start!("Usage: calistimer export [path]");
    log_block_start!("Description:");
    log_indented!("Writes all notes as a JSON object keyed by w<week>-d<day>-<id>.");
    log_indented!("The default path is ./calisthenics-progress.json.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: calistimer help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("calistimer help");
    log_indented!("calistimer help run");
    log_end!();
}
