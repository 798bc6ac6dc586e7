//! Main application entry point.
//!
//! Parses the command line, applies the process-wide `--config` override and
//! hands off to the matching command in [`calistimer::commands`]. Errors from a
//! command end the process with a logged error chain and exit status 1.

use anyhow::Result;

use calistimer::args::{self, CliAction, ParsedArgs};
use calistimer::commands;
use calistimer::common::constants::EXIT_FAILURE;
use calistimer::config;
use calistimer::log_error_exit;

fn main() {
    let parsed_args = ParsedArgs::from_env();

    if let Err(e) = dispatch(parsed_args.action) {
        log_error_exit!("{e}");
        eprintln!("{e:?}");
        std::process::exit(EXIT_FAILURE);
    }
}

fn dispatch(action: CliAction) -> Result<()> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp | CliAction::ShowHelpDueToError => {
            args::display_help();
            Ok(())
        }
        CliAction::HelpCommand { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Run {
            debug_enabled,
            config_dir,
            log_file,
            selection,
            exercise,
        } => {
            config::set_config_dir(config_dir)?;
            commands::run::handle_run_command(debug_enabled, log_file, selection, exercise)
        }
        CliAction::Show {
            debug_enabled,
            config_dir,
            selection,
        } => {
            config::set_config_dir(config_dir)?;
            commands::show::handle_show_command(debug_enabled, selection)
        }
        CliAction::Programs {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::programs::handle_programs_command(debug_enabled)
        }
        CliAction::Note {
            debug_enabled,
            config_dir,
            week,
            day,
            exercise_id,
            text,
        } => {
            config::set_config_dir(config_dir)?;
            commands::notes::handle_note_command(debug_enabled, week, day, &exercise_id, &text)
        }
        CliAction::Notes {
            debug_enabled,
            config_dir,
            selection,
        } => {
            config::set_config_dir(config_dir)?;
            commands::notes::handle_notes_command(debug_enabled, selection)
        }
        CliAction::Export {
            debug_enabled,
            config_dir,
            path,
        } => {
            config::set_config_dir(config_dir)?;
            commands::export::handle_export_command(debug_enabled, path)
        }
    }
}
