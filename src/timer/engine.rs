//! Workout timer state machine.
//!
//! `TimerEngine` owns the session state for one workout day and applies
//! commands and countdown ticks to it:
//!
//! ```text
//! idle ──start──▶ working ──(rest > 0)──▶ resting ──▶ working (next set) ──▶ … ──▶ idle
//!                    │                                   ▲
//!                    └──────────(rest = 0)───────────────┘
//! ```
//!
//! The engine does no scheduling of its own. Whoever drives it (see
//! [`TimerDriver`](super::driver::TimerDriver)) calls [`TimerEngine::tick`] once
//! per second while [`TimerEngine::wants_ticks`] is true. Commands are applied
//! immediately and the next tick sees their result.
//!
//! Invalid requests (unknown exercise, empty day, commands that make no sense in
//! the current phase) leave the state untouched and at most log a warning.
//! Exercises with zero sets are never entered, so the current set never
//! exceeds the exercise's set count.

use chrono::{DateTime, Local};
use std::sync::Arc;

use super::duration::{parse_rest_time, parse_work_time};
use super::navigator::{first_exercise, next_exercise};
use crate::audio::{AudioCue, CuePlayer};
use crate::time_source::{TimeSource, elapsed_seconds};
use crate::workout::{ExerciseId, SectionKey, WorkoutExercise, WorkoutSections};

/// Where the session is in its work/rest cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerPhase {
    /// No session running. Both the initial and the final state.
    #[default]
    Idle,
    Working,
    Resting,
}

impl TimerPhase {
    pub fn display_name(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "Idle",
            TimerPhase::Working => "Work",
            TimerPhase::Resting => "Rest",
        }
    }
}

/// Snapshot of the timer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSession {
    /// Whether the countdown is running. A paused session keeps its position.
    pub is_active: bool,
    pub phase: TimerPhase,
    pub current_section: SectionKey,
    pub current_exercise_index: usize,
    /// 1-based set of the current exercise
    pub current_set: u32,
    /// Seconds left in the current phase
    pub time_remaining: u32,
    /// Whole seconds since `workout_start_time`, recomputed from the clock
    pub total_workout_time: u64,
    pub workout_start_time: Option<DateTime<Local>>,
    /// Stop after the current exercise instead of moving on
    pub is_single_exercise: bool,
}

impl Default for TimerSession {
    fn default() -> Self {
        Self {
            is_active: false,
            phase: TimerPhase::Idle,
            current_section: SectionKey::Skill,
            current_exercise_index: 0,
            current_set: 1,
            time_remaining: 0,
            total_workout_time: 0,
            workout_start_time: None,
            is_single_exercise: false,
        }
    }
}

impl TimerSession {
    pub fn position(&self) -> ExerciseId {
        ExerciseId::new(self.current_section, self.current_exercise_index)
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TimerPhase::Idle
    }

    pub fn is_paused(&self) -> bool {
        !self.is_active && !self.is_idle()
    }
}

/// Commands a front end can send to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    StartExercise(String),
    Pause,
    Resume,
    /// Pause a running session or resume a paused one
    TogglePause,
    Stop,
    AddTime(i64),
    SkipSet,
    SkipExercise,
}

/// The workout timer state machine for one workout day.
pub struct TimerEngine {
    sections: WorkoutSections,
    clock: Arc<dyn TimeSource>,
    cues: Box<dyn CuePlayer>,
    session: TimerSession,
    debug_enabled: bool,
}

impl TimerEngine {
    /// Create an idle engine for `sections`.
    pub fn new(
        sections: WorkoutSections,
        clock: Arc<dyn TimeSource>,
        cues: Box<dyn CuePlayer>,
    ) -> Self {
        Self {
            sections,
            clock,
            cues,
            session: TimerSession::default(),
            debug_enabled: false,
        }
    }

    /// Log every automatic advance.
    pub fn with_debug(mut self, debug_enabled: bool) -> Self {
        self.debug_enabled = debug_enabled;
        self
    }

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    pub fn sections(&self) -> &WorkoutSections {
        &self.sections
    }

    /// Exercise at the current position.
    pub fn current_exercise(&self) -> Option<&WorkoutExercise> {
        self.sections.get(self.session.position())
    }

    /// Whether the countdown clock should be running.
    pub fn wants_ticks(&self) -> bool {
        self.session.is_active && self.session.phase != TimerPhase::Idle
    }

    /// Apply a command by value.
    pub fn apply(&mut self, command: &TimerCommand) {
        match command {
            TimerCommand::Start => self.start(),
            TimerCommand::StartExercise(id) => self.start_exercise(id),
            TimerCommand::Pause => self.pause(),
            TimerCommand::Resume => self.resume(),
            TimerCommand::TogglePause => self.toggle_pause(),
            TimerCommand::Stop => self.stop(),
            TimerCommand::AddTime(delta) => self.add_time(*delta),
            TimerCommand::SkipSet => self.skip_set(),
            TimerCommand::SkipExercise => self.skip_exercise(),
        }
    }

    // # Commands

    /// Start the whole day from its first exercise.
    pub fn start(&mut self) {
        let first = first_exercise(&self.sections).and_then(|id| self.runnable_from(id));
        let Some(first) = first else {
            log_warning!("No exercises found to start workout");
            return;
        };
        self.begin(first, false);
    }

    /// Run exactly one exercise, addressed as `"<section>-<index>"`.
    pub fn start_exercise(&mut self, exercise_id: &str) {
        let id = match exercise_id.parse::<ExerciseId>() {
            Ok(id) => id,
            Err(e) => {
                log_warning!("Exercise not found: {exercise_id} ({e})");
                return;
            }
        };
        match self.sections.get(id) {
            None => {
                log_warning!("Exercise not found: {exercise_id}");
                return;
            }
            Some(exercise) if exercise.sets == 0 => {
                log_warning!("Exercise {exercise_id} has no sets to run");
                return;
            }
            Some(_) => {}
        }
        self.begin(id, true);
    }

    /// Freeze the countdown. Position and time remaining are kept.
    pub fn pause(&mut self) {
        self.session.is_active = false;
    }

    /// Continue a paused session from its current time remaining.
    pub fn resume(&mut self) {
        if self.session.is_idle() {
            return;
        }
        self.session.is_active = true;
    }

    pub fn toggle_pause(&mut self) {
        if self.session.is_active {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Abandon the session and return to the initial idle state.
    pub fn stop(&mut self) {
        self.session = TimerSession::default();
    }

    /// Add (or with a negative delta, remove) seconds from the current phase.
    pub fn add_time(&mut self, delta_seconds: i64) {
        if self.session.is_idle() {
            return;
        }
        let adjusted = i64::from(self.session.time_remaining).saturating_add(delta_seconds);
        self.session.time_remaining = adjusted.clamp(0, i64::from(u32::MAX)) as u32;
    }

    /// End the current phase now, exactly as if its countdown had run out.
    pub fn skip_set(&mut self) {
        if !self.wants_ticks() {
            return;
        }
        self.phase_transition();
    }

    /// Jump to the start of the next exercise, or finish if there is none.
    pub fn skip_exercise(&mut self) {
        if !self.wants_ticks() {
            return;
        }
        match self.next_runnable(self.session.position()) {
            Some(next) => {
                self.session.total_workout_time = self.elapsed();
                self.jump_to(next);
            }
            None => {
                self.stop();
                self.cues.play(AudioCue::Complete);
            }
        }
    }

    /// One countdown second. Either decrements the time remaining or, when it
    /// reaches zero, performs a single phase transition.
    pub fn tick(&mut self) {
        if !self.wants_ticks() {
            return;
        }

        self.session.total_workout_time = self.elapsed();
        let remaining = i64::from(self.session.time_remaining) - 1;
        if remaining <= 0 {
            self.phase_transition();
        } else {
            self.session.time_remaining = remaining as u32;
        }
    }

    /// Seconds since the session started, or the last recorded total when idle.
    pub fn elapsed(&self) -> u64 {
        match self.session.workout_start_time {
            Some(start) => elapsed_seconds(start, self.clock.now()),
            None => self.session.total_workout_time,
        }
    }

    // # Transitions

    /// `id` itself, or the first exercise after it, that has at least one set.
    fn runnable_from(&self, id: ExerciseId) -> Option<ExerciseId> {
        match self.sections.get(id) {
            Some(exercise) if exercise.sets > 0 => Some(id),
            _ => self.next_runnable(id),
        }
    }

    fn next_runnable(&self, from: ExerciseId) -> Option<ExerciseId> {
        let mut id = from;
        loop {
            id = next_exercise(&self.sections, id)?;
            match self.sections.get(id) {
                Some(exercise) if exercise.sets > 0 => return Some(id),
                Some(exercise) => log_warning!("Skipping {} ({id}): no sets", exercise.name),
                None => return None,
            }
        }
    }

    fn begin(&mut self, id: ExerciseId, single: bool) {
        let Some(exercise) = self.sections.get(id) else {
            return;
        };
        self.session = TimerSession {
            is_active: true,
            phase: TimerPhase::Working,
            current_section: id.section,
            current_exercise_index: id.index,
            current_set: 1,
            time_remaining: parse_work_time(&exercise.reps),
            total_workout_time: 0,
            workout_start_time: Some(self.clock.now()),
            is_single_exercise: single,
        };
        if self.debug_enabled {
            log_debug!(
                "Starting {} with {} ({id})",
                if single { "single exercise" } else { "workout" },
                exercise.name
            );
        }
        self.cues.play(AudioCue::Start);
    }

    fn jump_to(&mut self, id: ExerciseId) {
        let Some(exercise) = self.sections.get(id) else {
            return;
        };
        self.session.current_section = id.section;
        self.session.current_exercise_index = id.index;
        self.session.current_set = 1;
        self.session.phase = TimerPhase::Working;
        self.session.time_remaining = parse_work_time(&exercise.reps);
        if self.debug_enabled {
            log_decorated!("Advancing to next exercise: {} ({})", exercise.name, id.section);
        }
        self.cues.play(AudioCue::Start);
    }

    fn phase_transition(&mut self) {
        let Some(exercise) = self.current_exercise().cloned() else {
            return;
        };
        self.session.total_workout_time = self.elapsed();

        match self.session.phase {
            TimerPhase::Working => {
                let rest = parse_rest_time(&exercise.rest);
                if rest > 0 {
                    self.session.phase = TimerPhase::Resting;
                    self.session.time_remaining = rest;
                    self.cues.play(AudioCue::Rest);
                } else {
                    // No resting phase is ever entered with zero time
                    self.set_transition(&exercise);
                }
            }
            TimerPhase::Resting => self.set_transition(&exercise),
            TimerPhase::Idle => {}
        }
    }

    fn set_transition(&mut self, exercise: &WorkoutExercise) {
        let next_set = self.session.current_set + 1;
        if next_set <= exercise.sets {
            if self.debug_enabled {
                log_decorated!(
                    "Advancing to set {next_set}/{} of {}",
                    exercise.sets,
                    exercise.name
                );
            }
            self.session.current_set = next_set;
            self.session.phase = TimerPhase::Working;
            self.session.time_remaining = parse_work_time(&exercise.reps);
            self.cues.play(AudioCue::Start);
            return;
        }

        if self.session.is_single_exercise {
            if self.debug_enabled {
                log_decorated!("Single exercise completed: {}", exercise.name);
            }
            self.complete();
            return;
        }

        match self.next_runnable(self.session.position()) {
            Some(next) => self.jump_to(next),
            None => {
                if self.debug_enabled {
                    log_decorated!("Workout completed");
                }
                self.complete();
            }
        }
    }

    /// Finish the session. The final elapsed time stays readable until the next start.
    fn complete(&mut self) {
        let total = self.elapsed();
        self.session = TimerSession {
            total_workout_time: total,
            ..TimerSession::default()
        };
        self.cues.play(AudioCue::Complete);
    }
}
