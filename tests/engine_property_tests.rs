use calistimer::audio::NullCuePlayer;
use calistimer::common::logger::Log;
use calistimer::time_source::SimulatedTimeSource;
use calistimer::timer::{TimerCommand, TimerEngine, TimerPhase, TimerSession};
use calistimer::workout::{Reps, SectionKey, WorkoutExercise, WorkoutSections};
use chrono::{Local, TimeZone};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

/// Something that can happen to a running engine.
#[derive(Debug, Clone)]
enum Step {
    Command(TimerCommand),
    /// This many seconds pass, one tick per second
    Ticks(u8),
    /// Wall-clock time passes without any tick
    Gap(u8),
}

fn reps_strategy() -> impl Strategy<Value = Reps> {
    prop_oneof![
        (0u32..15).prop_map(Reps::Count),
        prop::sample::select(vec!["8-10", "30s", "20-30s", "max", "5 each side", ""])
            .prop_map(|s| Reps::Text(s.to_string())),
    ]
}

fn rest_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["-", "", "10s", "1 min", "45 seconds", "as needed"])
        .prop_map(str::to_string)
}

fn exercise_strategy() -> impl Strategy<Value = WorkoutExercise> {
    ("[A-Z][a-z]{2,8}", 0u32..4, reps_strategy(), rest_strategy()).prop_map(
        |(name, sets, reps, rest)| WorkoutExercise {
            name,
            sets,
            reps,
            rest,
        },
    )
}

fn sections_strategy() -> impl Strategy<Value = WorkoutSections> {
    prop::collection::vec(
        prop::option::of(prop::collection::vec(exercise_strategy(), 0..3)),
        4,
    )
    .prop_map(|slots| {
        let mut sections = WorkoutSections::default();
        for (key, slot) in SectionKey::ALL.into_iter().zip(slots) {
            if let Some(exercises) = slot {
                sections = sections.with_section(key, exercises);
            }
        }
        sections
    })
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Command(TimerCommand::Start)),
        prop::sample::select(vec!["skill-0", "strength-1", "core-0", "conditioning-2", "abs-0"])
            .prop_map(|id| Step::Command(TimerCommand::StartExercise(id.to_string()))),
        Just(Step::Command(TimerCommand::Pause)),
        Just(Step::Command(TimerCommand::Resume)),
        Just(Step::Command(TimerCommand::TogglePause)),
        Just(Step::Command(TimerCommand::Stop)),
        (-120i64..120).prop_map(|d| Step::Command(TimerCommand::AddTime(d))),
        Just(Step::Command(TimerCommand::SkipSet)),
        Just(Step::Command(TimerCommand::SkipExercise)),
        (1u8..90).prop_map(Step::Ticks),
        (1u8..30).prop_map(Step::Gap),
    ]
}

fn engine_for(sections: WorkoutSections) -> (TimerEngine, Arc<SimulatedTimeSource>) {
    // Unknown exercise ids warn on every case
    Log::set_enabled(false);
    let clock = Arc::new(SimulatedTimeSource::new(
        Local.with_ymd_and_hms(2025, 1, 6, 18, 0, 0).unwrap(),
    ));
    let engine = TimerEngine::new(sections, clock.clone(), Box::new(NullCuePlayer));
    (engine, clock)
}

fn apply(engine: &mut TimerEngine, clock: &SimulatedTimeSource, step: &Step) {
    match step {
        Step::Command(command) => engine.apply(command),
        Step::Ticks(n) => {
            for _ in 0..*n {
                clock.advance(Duration::from_secs(1));
                engine.tick();
            }
        }
        Step::Gap(n) => clock.advance(Duration::from_secs(u64::from(*n))),
    }
}

fn check_invariants(engine: &TimerEngine) -> Result<(), TestCaseError> {
    let session = engine.session();

    if session.is_idle() {
        prop_assert!(!session.is_active);
        prop_assert!(!engine.wants_ticks());
        prop_assert_eq!(
            session,
            &TimerSession {
                total_workout_time: session.total_workout_time,
                ..TimerSession::default()
            }
        );
        return Ok(());
    }

    let exercise = engine.current_exercise();
    prop_assert!(exercise.is_some(), "non-idle session points at no exercise");
    let exercise = exercise.unwrap();
    // Exercises without sets are never entered
    prop_assert!(exercise.sets >= 1);
    prop_assert!(session.current_set >= 1);
    prop_assert!(session.current_set <= exercise.sets);
    prop_assert!(session.workout_start_time.is_some());
    Ok(())
}

proptest! {
    /// Arbitrary command and tick sequences never leave the session in an
    /// impossible state.
    #[test]
    fn test_random_sessions_keep_invariants(
        sections in sections_strategy(),
        steps in prop::collection::vec(step_strategy(), 1..60)
    ) {
        let (mut engine, clock) = engine_for(sections);
        for step in &steps {
            apply(&mut engine, &clock, step);
            check_invariants(&engine)?;
        }
    }

    /// Pausing twice is the same as pausing once.
    #[test]
    fn test_pause_is_idempotent(
        sections in sections_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..30)
    ) {
        let (mut engine, clock) = engine_for(sections);
        for step in &steps {
            apply(&mut engine, &clock, step);
        }

        engine.pause();
        let once = engine.session().clone();
        engine.pause();
        prop_assert_eq!(engine.session(), &once);
    }

    /// While paused, time passing and ticks arriving leave the countdown alone.
    #[test]
    fn test_paused_countdown_is_frozen(
        sections in sections_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..30),
        idle_seconds in 1u8..120
    ) {
        let (mut engine, clock) = engine_for(sections);
        for step in &steps {
            apply(&mut engine, &clock, step);
        }

        engine.pause();
        let before = engine.session().clone();
        apply(&mut engine, &clock, &Step::Ticks(idle_seconds));

        let after = engine.session();
        prop_assert_eq!(after.phase, before.phase);
        prop_assert_eq!(after.time_remaining, before.time_remaining);
        prop_assert_eq!(after.current_set, before.current_set);
        prop_assert_eq!(after.position(), before.position());
    }

    /// Every tick of a running session either counts down by exactly one second
    /// or changes phase, set or exercise.
    #[test]
    fn test_tick_never_batches_transitions(
        sections in sections_strategy(),
        ticks in 1usize..400
    ) {
        let (mut engine, clock) = engine_for(sections);
        engine.start();

        for _ in 0..ticks {
            if !engine.wants_ticks() {
                break;
            }
            let before = engine.session().clone();
            clock.advance(Duration::from_secs(1));
            engine.tick();
            let after = engine.session();

            let same_step = after.phase == before.phase
                && after.current_set == before.current_set
                && after.position() == before.position();
            if same_step {
                prop_assert_eq!(after.time_remaining + 1, before.time_remaining);
            }
            // No zero-length rest is ever entered
            prop_assert!(after.phase != TimerPhase::Resting || after.time_remaining > 0);
        }
    }
}
