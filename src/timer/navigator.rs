//! Walking a workout day in order: first exercise and "what comes after this one".
//!
//! Both functions are stateless and cheap; callers re-evaluate them on every
//! transition instead of caching a cursor.

use crate::workout::{ExerciseId, SectionKey, WorkoutSections};

/// First exercise of the day, if the day has any.
pub fn first_exercise(sections: &WorkoutSections) -> Option<ExerciseId> {
    SectionKey::ALL
        .into_iter()
        .find(|key| !sections.section(*key).is_empty())
        .map(|key| ExerciseId::new(key, 0))
}

/// The exercise after `current`: the next entry of the same section, else the
/// first entry of the next non-empty section in priority order. `None` once the
/// day is exhausted.
pub fn next_exercise(sections: &WorkoutSections, current: ExerciseId) -> Option<ExerciseId> {
    let next_index = current.index + 1;
    if next_index < sections.section(current.section).len() {
        return Some(ExerciseId::new(current.section, next_index));
    }

    current
        .section
        .following()
        .iter()
        .find(|key| !sections.section(**key).is_empty())
        .map(|key| ExerciseId::new(*key, 0))
}
