//! The `run` command: a timed session for one training day.
//!
//! On a terminal the session takes over the screen in raw mode and shows a
//! single status line redrawn after every event, with single-key controls.
//! Without a terminal (piped output, service manager) it logs each phase change
//! instead and can only be ended by a signal.

use anyhow::{Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::tty::IsTty;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{AppContext, lookup_day, select_day};
use crate::args::DaySelection;
use crate::audio::cue_player_from_config;
use crate::common::logger::Log;
use crate::common::utils::{TerminalGuard, expand_tilde, format_clock};
use crate::io::{lock::acquire_lock, signals::setup_signal_handler};
use crate::time_source;
use crate::timer::{DriverFlow, TimerCommand, TimerDriver, TimerEngine, TimerEvent, TimerPhase};
use crate::workout::ExerciseId;

const KEY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run a session for the selected day, or for a single exercise of it.
pub fn handle_run_command(
    debug_enabled: bool,
    log_file: Option<String>,
    selection: DaySelection,
    exercise: Option<String>,
) -> Result<()> {
    let _log_guard = match log_file {
        Some(path) => Some(Log::start_file_logging(
            expand_tilde(&path).display().to_string(),
        )?),
        None => None,
    };

    log_version!();

    let ctx = AppContext::load()?;
    if debug_enabled {
        ctx.log_config();
    }

    let _lock = match acquire_lock()? {
        Ok(lock) => lock,
        Err(holder) => bail!("calistimer is already running (PID {})", holder.pid),
    };

    let (program, week, day) = select_day(&ctx, selection)?;
    let day_data = lookup_day(&program, week, day)?.clone();

    log_block_start!("{}", program.title);
    log_indented!("Week {week}, day {day}: {}", day_data.name);
    log_indented!("{} exercises", day_data.sections.len());

    let clock = time_source::shared();
    let terminal_attached = std::io::stdout().is_tty();
    let cues = cue_player_from_config(&ctx.config, terminal_attached, debug_enabled);
    let mut engine =
        TimerEngine::new(day_data.sections, clock.clone(), cues).with_debug(debug_enabled);

    match exercise.as_deref() {
        Some(id) => engine.start_exercise(id),
        None => engine.start(),
    }
    if engine.session().is_idle() {
        match exercise {
            Some(id) => bail!("Exercise '{id}' is not part of week {week}, day {day}"),
            None => bail!("Week {week}, day {day} has no exercises"),
        }
    }

    let driver = TimerDriver::new(engine, clock);
    let sender = driver.sender();
    let _signals = setup_signal_handler(sender.clone(), debug_enabled)?;

    if terminal_attached {
        log_block_start!("space pause · s skip set · n next exercise · +/- time · q stop");
        log_pipe!();
    } else {
        log_block_start!("No terminal attached, logging phase changes");
    }

    let terminal = TerminalGuard::new()?;
    let interactive = terminal.is_active();
    let stop_requested = Arc::new(AtomicBool::new(false));
    let mut keyboard = None;

    if interactive {
        keyboard = Some(KeyboardReader::spawn(
            sender,
            ctx.config.time_adjust_step(),
            stop_requested.clone(),
        ));
        // Raw mode owns the terminal; keep file logging going if it was asked for
        if !Log::is_logging_to_file() {
            Log::set_enabled(false);
        }
    }

    let mut last_elapsed = 0;
    let mut last_step = None;
    let (engine, flow) = driver.run(|engine| {
        if !engine.session().is_idle() {
            last_elapsed = engine.elapsed();
        }

        if interactive {
            let mut stdout = std::io::stdout();
            let _ = write!(stdout, "\r\x1b[2K{}", render_status(engine));
            let _ = stdout.flush();
        } else {
            let step = step_of(engine);
            if step != last_step {
                if let Some(line) = describe_step(engine) {
                    log_decorated!("{line}");
                }
                last_step = step;
            }
        }
    });

    if let Some(reader) = keyboard {
        reader.stop();
    }
    drop(terminal);
    if interactive {
        println!();
    }
    Log::set_enabled(true);

    let session = engine.session();
    match flow {
        DriverFlow::Finished if stop_requested.load(Ordering::SeqCst) => {
            log_block_start!("Session stopped after {}", format_clock(last_elapsed));
        }
        DriverFlow::Finished => {
            log_block_start!("Workout complete");
            log_indented!("Total time: {}", format_clock(session.total_workout_time));
        }
        DriverFlow::Shutdown | DriverFlow::Continue => {
            log_block_start!("Session ended after {}", format_clock(last_elapsed));
        }
    }
    log_end!();

    Ok(())
}

/// Background thread turning key presses into timer commands.
struct KeyboardReader {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl KeyboardReader {
    fn spawn(sender: Sender<TimerEvent>, step: u32, stop_requested: Arc<AtomicBool>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = thread::spawn(move || {
            while flag.load(Ordering::SeqCst) {
                match event::poll(KEY_POLL_INTERVAL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(_) => break,
                }
                let Ok(Event::Key(key)) = event::read() else {
                    continue;
                };
                let Some(command) = command_for_key(&key, step) else {
                    continue;
                };
                if command == TimerCommand::Stop {
                    stop_requested.store(true, Ordering::SeqCst);
                }
                if sender.send(TimerEvent::Command(command)).is_err() {
                    break;
                }
            }
        });

        Self { running, handle }
    }

    fn stop(self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.handle.join();
    }
}

/// Map a key press to a timer command. Releases and repeats are ignored.
pub(crate) fn command_for_key(key: &KeyEvent, step: u32) -> Option<TimerCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let step = i64::from(step);
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(TimerCommand::Stop)
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(TimerCommand::TogglePause),
        KeyCode::Char('s') => Some(TimerCommand::SkipSet),
        KeyCode::Char('n') => Some(TimerCommand::SkipExercise),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(TimerCommand::AddTime(step)),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(TimerCommand::AddTime(-step)),
        KeyCode::Char('q') | KeyCode::Esc => Some(TimerCommand::Stop),
        _ => None,
    }
}

/// One status line for the live screen.
pub(crate) fn render_status(engine: &TimerEngine) -> String {
    let session = engine.session();
    if session.is_idle() {
        return format!("Done · total {}", format_clock(session.total_workout_time));
    }

    let (name, sets) = engine
        .current_exercise()
        .map(|e| (e.name.as_str(), e.sets))
        .unwrap_or(("?", 0));
    let state = if session.is_paused() { "paused" } else { session.phase.display_name() };

    format!(
        "{:>6} {} │ {} {} · {} │ set {}/{} │ total {}",
        state,
        format_clock(u64::from(session.time_remaining)),
        session.current_section,
        session.current_exercise_index + 1,
        name,
        session.current_set,
        sets,
        format_clock(engine.elapsed()),
    )
}

fn step_of(engine: &TimerEngine) -> Option<(TimerPhase, ExerciseId, u32)> {
    let session = engine.session();
    (!session.is_idle()).then(|| (session.phase, session.position(), session.current_set))
}

fn describe_step(engine: &TimerEngine) -> Option<String> {
    let session = engine.session();
    let exercise = engine.current_exercise()?;
    let line = match session.phase {
        TimerPhase::Idle => return None,
        TimerPhase::Working => format!(
            "{} set {}/{}: {} ({})",
            exercise.name,
            session.current_set,
            exercise.sets,
            exercise.reps,
            format_clock(u64::from(session.time_remaining))
        ),
        TimerPhase::Resting if session.current_set < exercise.sets => format!(
            "Rest {} before set {}",
            format_clock(u64::from(session.time_remaining)),
            session.current_set + 1
        ),
        TimerPhase::Resting => format!(
            "Rest {}",
            format_clock(u64::from(session.time_remaining))
        ),
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullCuePlayer;
    use crate::time_source::SimulatedTimeSource;
    use crate::workout::{SectionKey, WorkoutExercise, WorkoutSections};
    use chrono::{Local, TimeZone};
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn engine() -> TimerEngine {
        let clock = Arc::new(SimulatedTimeSource::new(
            Local.with_ymd_and_hms(2025, 3, 1, 7, 0, 0).unwrap(),
        ));
        let sections = WorkoutSections::default().with_section(
            SectionKey::Core,
            vec![WorkoutExercise::new("Hollow hold", 3, "30s", "45s")],
        );
        TimerEngine::new(sections, clock, Box::new(NullCuePlayer))
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            command_for_key(&press(KeyCode::Char(' ')), 15),
            Some(TimerCommand::TogglePause)
        );
        assert_eq!(
            command_for_key(&press(KeyCode::Char('s')), 15),
            Some(TimerCommand::SkipSet)
        );
        assert_eq!(
            command_for_key(&press(KeyCode::Char('n')), 15),
            Some(TimerCommand::SkipExercise)
        );
        assert_eq!(
            command_for_key(&press(KeyCode::Char('+')), 15),
            Some(TimerCommand::AddTime(15))
        );
        assert_eq!(
            command_for_key(&press(KeyCode::Char('-')), 10),
            Some(TimerCommand::AddTime(-10))
        );
        assert_eq!(command_for_key(&press(KeyCode::Esc), 15), Some(TimerCommand::Stop));
        assert_eq!(command_for_key(&press(KeyCode::Char('x')), 15), None);
    }

    #[test]
    fn test_ctrl_c_stops_but_plain_c_does_not() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(command_for_key(&ctrl_c, 15), Some(TimerCommand::Stop));
        assert_eq!(command_for_key(&press(KeyCode::Char('c')), 15), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(command_for_key(&release, 15), None);
    }

    #[test]
    fn test_render_status_shows_position_and_countdown() {
        let mut engine = engine();
        assert!(render_status(&engine).starts_with("Done"));

        engine.start();
        let line = render_status(&engine);
        assert!(line.contains("Work 0:30"), "{line}");
        assert!(line.contains("core 1 · Hollow hold"), "{line}");
        assert!(line.contains("set 1/3"), "{line}");

        engine.pause();
        assert!(render_status(&engine).contains("paused 0:30"));
    }

    #[test]
    fn test_describe_step_for_rest() {
        let mut engine = engine();
        engine.start();
        engine.skip_set();
        assert_eq!(describe_step(&engine).unwrap(), "Rest 0:45 before set 2");
    }
}
