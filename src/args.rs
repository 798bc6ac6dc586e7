//! Command-line argument parsing and processing.
//!
//! Parses `calistimer [OPTIONS] [COMMAND] [ARGS]` into a [`CliAction`]. Flags may
//! appear anywhere; everything after `--` is taken literally, so note text can
//! start with a dash.

/// Week and day picked on the command line. `None` falls back to the saved
/// preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySelection {
    pub week: Option<u32>,
    pub day: Option<u32>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run a timed session (the default command)
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
        log_file: Option<String>,
        selection: DaySelection,
        /// Run a single exercise instead of the whole day
        exercise: Option<String>,
    },
    /// Print one training day
    Show {
        debug_enabled: bool,
        config_dir: Option<String>,
        selection: DaySelection,
    },
    /// List stored programs
    Programs {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Record a note for one exercise
    Note {
        debug_enabled: bool,
        config_dir: Option<String>,
        week: u32,
        day: u32,
        exercise_id: String,
        text: String,
    },
    /// Print recorded notes
    Notes {
        debug_enabled: bool,
        config_dir: Option<String>,
        selection: DaySelection,
    },
    /// Export all notes as JSON
    Export {
        debug_enabled: bool,
        config_dir: Option<String>,
        path: Option<String>,
    },
    /// `help [COMMAND]`
    HelpCommand { command: Option<String> },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

#[derive(Default)]
struct Flags {
    debug_enabled: bool,
    display_help: bool,
    display_version: bool,
    config_dir: Option<String>,
    log_file: Option<String>,
    week: Option<u32>,
    day: Option<u32>,
    exercise: Option<String>,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let action = match Self::parse_action(args) {
            Ok(action) => action,
            Err(message) => {
                log_error!("{}", message);
                CliAction::ShowHelpDueToError
            }
        };
        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }

    fn parse_action<I, S>(args: I) -> Result<CliAction, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut flags = Flags::default();
        let mut positional: Vec<String> = Vec::new();
        let mut literal = false;

        let mut iter = args_vec.into_iter();
        while let Some(arg) = iter.next() {
            if literal || !arg.starts_with('-') || arg == "-" {
                positional.push(arg);
                continue;
            }

            match arg.as_str() {
                "--" => literal = true,
                "--debug" | "-d" => flags.debug_enabled = true,
                "--help" | "-h" => flags.display_help = true,
                "--version" | "-V" | "-v" => flags.display_version = true,
                "--config" | "-c" => flags.config_dir = Some(value_for(&arg, iter.next())?),
                "--log" | "-l" => flags.log_file = Some(value_for(&arg, iter.next())?),
                "--week" | "-w" => flags.week = Some(positive(&arg, iter.next())?),
                "--day" | "-D" => flags.day = Some(positive(&arg, iter.next())?),
                "--exercise" | "-e" => flags.exercise = Some(value_for(&arg, iter.next())?),
                unknown => return Err(format!("Unknown option: {unknown}")),
            }
        }

        // Version and help take precedence over everything else
        if flags.display_version {
            return Ok(CliAction::ShowVersion);
        }
        if flags.display_help {
            return Ok(CliAction::ShowHelp);
        }

        let mut positional = positional.into_iter();
        let command = positional.next();
        let rest: Vec<String> = positional.collect();

        let command_name = command.as_deref().unwrap_or("run");
        if flags.exercise.is_some() && !matches!(command_name, "run" | "r") {
            return Err("--exercise only applies to 'run'".to_string());
        }
        if flags.log_file.is_some() && !matches!(command_name, "run" | "r") {
            return Err("--log only applies to 'run'".to_string());
        }

        let selection = DaySelection {
            week: flags.week,
            day: flags.day,
        };
        let Flags {
            debug_enabled,
            config_dir,
            log_file,
            exercise,
            ..
        } = flags;

        match command_name {
            "run" | "r" => {
                no_arguments(command_name, &rest)?;
                Ok(CliAction::Run {
                    debug_enabled,
                    config_dir,
                    log_file,
                    selection,
                    exercise,
                })
            }
            "show" | "s" => {
                no_arguments(command_name, &rest)?;
                Ok(CliAction::Show {
                    debug_enabled,
                    config_dir,
                    selection,
                })
            }
            "programs" | "p" => {
                no_arguments(command_name, &rest)?;
                Ok(CliAction::Programs {
                    debug_enabled,
                    config_dir,
                })
            }
            "note" | "n" => {
                if rest.len() < 4 {
                    return Err(
                        "Usage: calistimer note <week> <day> <exercise-id> <text...>".to_string(),
                    );
                }
                let week = parse_positive("week", &rest[0])?;
                let day = parse_positive("day", &rest[1])?;
                let exercise_id = rest[2].clone();
                let text = rest[3..].join(" ");
                Ok(CliAction::Note {
                    debug_enabled,
                    config_dir,
                    week,
                    day,
                    exercise_id,
                    text,
                })
            }
            "notes" => {
                no_arguments(command_name, &rest)?;
                Ok(CliAction::Notes {
                    debug_enabled,
                    config_dir,
                    selection,
                })
            }
            "export" | "x" => {
                if rest.len() > 1 {
                    return Err("Usage: calistimer export [path]".to_string());
                }
                Ok(CliAction::Export {
                    debug_enabled,
                    config_dir,
                    path: rest.into_iter().next(),
                })
            }
            "help" | "h" => {
                if rest.len() > 1 {
                    return Err("Usage: calistimer help [COMMAND]".to_string());
                }
                Ok(CliAction::HelpCommand {
                    command: rest.into_iter().next(),
                })
            }
            unknown => Err(format!("Unknown command: {unknown}")),
        }
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{flag} requires a value"))
}

fn positive(flag: &str, value: Option<String>) -> Result<u32, String> {
    let value = value_for(flag, value)?;
    parse_positive(flag, &value)
}

fn parse_positive(name: &str, value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("{name} must be a positive number (got '{value}')")),
    }
}

fn no_arguments(command: &str, rest: &[String]) -> Result<(), String> {
    match rest.first() {
        Some(extra) => Err(format!("Unexpected argument for '{command}': {extra}")),
        None => Ok(()),
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("calistimer [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>       Use custom configuration directory");
    log_indented!("-d, --debug              Enable detailed debug output");
    log_indented!("-w, --week <n>           Training week (default: last selected)");
    log_indented!("-D, --day <n>            Training day (default: last selected)");
    log_indented!("-e, --exercise <id>      Run a single exercise, e.g. strength-0");
    log_indented!("-l, --log <file>         Also write the session log to a file");
    log_indented!("-h, --help               Print help information");
    log_indented!("-V, --version            Print version information");
    log_block_start!("Commands:");
    log_indented!("run, r                   Run a timed session (default)");
    log_indented!("show, s                  Print the selected day's exercises");
    log_indented!("programs, p              List stored programs");
    log_indented!("note, n <w> <d> <id> <text> Record a note for an exercise");
    log_indented!("notes                    Print recorded notes");
    log_indented!("export, x [path]         Export notes as JSON");
    log_indented!("help, h [COMMAND]        Show detailed help for a command");
    log_end!();
}
