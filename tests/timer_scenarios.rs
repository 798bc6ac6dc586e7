//! End-to-end timer sessions on a simulated clock.
//!
//! Every test builds a day, drives the engine one simulated second per tick and
//! checks both the observed session and the cues that were played.

use calistimer::audio::{AudioCue, RecordingCuePlayer};
use calistimer::time_source::SimulatedTimeSource;
use calistimer::timer::{DriverFlow, TimerCommand, TimerDriver, TimerEngine, TimerEvent, TimerPhase};
use calistimer::workout::{ExerciseId, ProgramSeed, SectionKey, WorkoutExercise, WorkoutSections};
use chrono::{Local, TimeZone};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    engine: TimerEngine,
    clock: Arc<SimulatedTimeSource>,
    cues: RecordingCuePlayer,
}

impl Harness {
    fn new(sections: WorkoutSections) -> Self {
        let clock = Arc::new(SimulatedTimeSource::new(
            Local.with_ymd_and_hms(2025, 6, 2, 6, 30, 0).unwrap(),
        ));
        let cues = RecordingCuePlayer::new();
        let engine = TimerEngine::new(sections, clock.clone(), Box::new(cues.clone()));
        Self {
            engine,
            clock,
            cues,
        }
    }

    fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.clock.advance(Duration::from_secs(1));
            self.engine.tick();
        }
    }

    fn phase(&self) -> TimerPhase {
        self.engine.session().phase
    }
}

fn push_up_only() -> WorkoutSections {
    WorkoutSections::default().with_section(
        SectionKey::Strength,
        vec![WorkoutExercise::new("Push-up", 2, 10, "30s")],
    )
}

fn full_day() -> WorkoutSections {
    WorkoutSections::default()
        .with_section(
            SectionKey::Skill,
            vec![WorkoutExercise::new("Wall handstand", 1, "20s", "-")],
        )
        .with_section(SectionKey::Strength, vec![])
        .with_section(
            SectionKey::Core,
            vec![
                WorkoutExercise::new("Hollow hold", 2, "15s", "10s"),
                WorkoutExercise::new("Dead bug", 1, 5, "-"),
            ],
        )
}

#[test]
fn test_push_up_day_rests_after_last_set_then_completes() {
    let mut h = Harness::new(push_up_only());
    h.engine.start();
    assert_eq!(h.phase(), TimerPhase::Working);
    assert_eq!(h.engine.session().time_remaining, 40);
    assert_eq!(h.engine.session().current_set, 1);

    h.ticks(40);
    assert_eq!(h.phase(), TimerPhase::Resting);
    assert_eq!(h.engine.session().time_remaining, 30);

    h.ticks(30);
    assert_eq!(h.phase(), TimerPhase::Working);
    assert_eq!(h.engine.session().current_set, 2);
    assert_eq!(h.engine.session().time_remaining, 40);

    h.ticks(40);
    assert_eq!(h.phase(), TimerPhase::Resting);

    h.ticks(30);
    assert_eq!(h.phase(), TimerPhase::Idle);
    assert!(!h.engine.session().is_active);
    assert_eq!(h.engine.session().total_workout_time, 140);

    assert_eq!(
        h.cues.played(),
        vec![
            AudioCue::Start,
            AudioCue::Rest,
            AudioCue::Start,
            AudioCue::Rest,
            AudioCue::Complete,
        ]
    );
}

#[test]
fn test_skip_exercise_on_last_exercise_completes() {
    let mut h = Harness::new(push_up_only());
    h.engine.start();
    h.ticks(3);

    h.engine.skip_exercise();
    assert_eq!(h.phase(), TimerPhase::Idle);
    assert_eq!(h.cues.played().last(), Some(&AudioCue::Complete));
}

#[test]
fn test_start_missing_exercise_changes_nothing() {
    let mut h = Harness::new(
        WorkoutSections::default().with_section(
            SectionKey::Core,
            vec![WorkoutExercise::new("Plank", 3, "30s", "30s")],
        ),
    );
    let before = h.engine.session().clone();

    h.engine.start_exercise("core-1");
    assert_eq!(h.engine.session(), &before);
    assert!(h.cues.played().is_empty());
}

#[test]
fn test_negative_adjustment_clamps_at_zero() {
    let mut h = Harness::new(push_up_only());
    h.engine.start();
    h.ticks(30);
    assert_eq!(h.engine.session().time_remaining, 10);

    h.engine.apply(&TimerCommand::AddTime(-15));
    assert_eq!(h.engine.session().time_remaining, 0);
    assert_eq!(h.phase(), TimerPhase::Working);

    // The next tick ends the phase
    h.ticks(1);
    assert_eq!(h.phase(), TimerPhase::Resting);
}

#[test]
fn test_paused_gap_keeps_countdown_but_counts_elapsed() {
    let mut h = Harness::new(push_up_only());
    h.engine.start();
    h.ticks(2);

    h.engine.pause();
    h.clock.advance(Duration::from_secs(5));
    h.engine.tick();
    h.engine.resume();

    assert_eq!(h.engine.session().time_remaining, 38);
    h.ticks(1);
    assert_eq!(h.engine.session().time_remaining, 37);
    assert_eq!(h.engine.session().total_workout_time, 8);
}

#[test]
fn test_day_walks_sections_in_priority_order() {
    let mut h = Harness::new(full_day());
    h.engine.start();
    assert_eq!(
        h.engine.session().position(),
        ExerciseId::new(SectionKey::Skill, 0)
    );

    // Zero rest goes straight to the next exercise, skipping the empty section
    h.ticks(20);
    assert_eq!(h.phase(), TimerPhase::Working);
    assert_eq!(
        h.engine.session().position(),
        ExerciseId::new(SectionKey::Core, 0)
    );

    h.ticks(15 + 10 + 15 + 10);
    assert_eq!(
        h.engine.session().position(),
        ExerciseId::new(SectionKey::Core, 1)
    );
    assert_eq!(h.engine.session().time_remaining, 20);

    h.ticks(20);
    assert_eq!(h.phase(), TimerPhase::Idle);
    assert_eq!(
        h.cues.played(),
        vec![
            AudioCue::Start,
            AudioCue::Start,
            AudioCue::Rest,
            AudioCue::Start,
            AudioCue::Rest,
            AudioCue::Start,
            AudioCue::Complete,
        ]
    );
}

#[test]
fn test_single_exercise_stops_after_its_sets() {
    let mut h = Harness::new(full_day());
    h.engine.start_exercise("core-0");
    assert!(h.engine.session().is_single_exercise);

    h.ticks(15 + 10 + 15 + 10);
    assert_eq!(h.phase(), TimerPhase::Idle);
    assert_eq!(h.cues.played().last(), Some(&AudioCue::Complete));
}

#[test]
fn test_embedded_program_day_runs_to_completion() {
    let seed = ProgramSeed::embedded().unwrap();
    let day = seed
        .program
        .weeks
        .values()
        .next()
        .and_then(|week| week.days.get("1"))
        .cloned()
        .expect("first week has a day 1");

    let mut h = Harness::new(day.sections);
    h.engine.start();

    let mut ticks = 0;
    while h.phase() != TimerPhase::Idle {
        let exercise = h.engine.current_exercise().expect("active exercise");
        assert!(h.engine.session().current_set <= exercise.sets);
        h.ticks(1);
        ticks += 1;
        assert!(ticks < 24 * 3600, "session never finished");
    }
    assert_eq!(h.cues.played().last(), Some(&AudioCue::Complete));
}

#[test]
fn test_driver_runs_short_session_to_the_end() {
    let clock = Arc::new(SimulatedTimeSource::new(
        Local.with_ymd_and_hms(2025, 6, 2, 6, 30, 0).unwrap(),
    ));
    let cues = RecordingCuePlayer::new();
    let sections = WorkoutSections::default().with_section(
        SectionKey::Conditioning,
        vec![WorkoutExercise::new("Burpees", 2, "3s", "2s")],
    );
    let mut engine = TimerEngine::new(sections, clock.clone(), Box::new(cues.clone()));
    engine.start();

    let driver = TimerDriver::new(engine, clock);
    let mut snapshots = 0;
    let (engine, flow) = driver.run(|_| snapshots += 1);

    assert_eq!(flow, DriverFlow::Finished);
    assert!(engine.session().is_idle());
    assert!(snapshots > 3 + 2 + 3);
    assert_eq!(
        cues.played(),
        vec![
            AudioCue::Start,
            AudioCue::Rest,
            AudioCue::Start,
            AudioCue::Rest,
            AudioCue::Complete,
        ]
    );
}

#[test]
fn test_driver_stop_command_finishes_session() {
    let clock = Arc::new(SimulatedTimeSource::new(
        Local.with_ymd_and_hms(2025, 6, 2, 6, 30, 0).unwrap(),
    ));
    let mut engine = TimerEngine::new(
        push_up_only(),
        clock.clone(),
        Box::new(RecordingCuePlayer::new()),
    );
    engine.start();

    let mut driver = TimerDriver::new(engine, clock);
    assert_eq!(
        driver.handle(TimerEvent::Command(TimerCommand::Pause)),
        DriverFlow::Continue
    );
    assert!(!driver.is_ticking());
    assert_eq!(
        driver.handle(TimerEvent::Command(TimerCommand::Stop)),
        DriverFlow::Finished
    );
    assert_eq!(driver.engine().session().total_workout_time, 0);
}
