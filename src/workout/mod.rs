//! Workout data model: exercises, day sections and multi-week programs.

pub mod exercise;
pub mod program;

pub use exercise::{ExerciseId, ExerciseIdError, Reps, SectionKey, WorkoutExercise, WorkoutSections};
pub use program::{DayData, ProgramSeed, SeedProgram, WeekData, WorkoutProgram};
