//! Conversion of prescribed reps and rest strings into phase durations.
//!
//! Both parsers are total: anything they do not recognise falls back to a
//! fixed default instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::constants::{DEFAULT_REST_SECONDS, DEFAULT_WORK_SECONDS, SECONDS_PER_REP};
use crate::workout::Reps;

static REST_MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*min").expect("valid rest minutes pattern"));
static REST_SECONDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*s").expect("valid rest seconds pattern"));

// "30-40s" or "45s": the leading number is already a duration in seconds
static TIMED_WORK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s*-\s*\d+\s*s|^(\d+)\s*s\b").expect("valid timed work pattern")
});
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)").expect("valid leading number pattern"));

/// Seconds of rest after a set.
///
/// `"-"` and `""` mean no rest. Otherwise the first `<n> min` wins, then the
/// first `<n> s`, both case-insensitive; anything else rests for 60 seconds.
pub fn parse_rest_time(rest: &str) -> u32 {
    if rest == "-" || rest.is_empty() {
        return 0;
    }

    if let Some(minutes) = first_number(&REST_MINUTES, rest) {
        return minutes.saturating_mul(60);
    }

    if let Some(seconds) = first_number(&REST_SECONDS, rest) {
        return seconds;
    }

    DEFAULT_REST_SECONDS
}

/// Seconds of work for one set.
///
/// A numeric reps value is a repetition count at four seconds per rep. Text
/// starting with a timed target (`"30s"`, `"20-30s"`) uses its first number as
/// seconds; text starting with a number (`"10"`, `"8-10"`) is a rep count.
/// The timed form is checked first so `"30s"` never reads as 30 reps.
/// Anything else works for 30 seconds.
pub fn parse_work_time(reps: &Reps) -> u32 {
    match reps {
        Reps::Count(count) => count.saturating_mul(SECONDS_PER_REP),
        Reps::Text(text) => {
            if let Some(caps) = TIMED_WORK.captures(text)
                && let Some(seconds) = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| saturating_number(m.as_str()))
            {
                return seconds;
            }

            if let Some(count) = first_number(&LEADING_NUMBER, text) {
                return count.saturating_mul(SECONDS_PER_REP);
            }

            DEFAULT_WORK_SECONDS
        }
    }
}

fn first_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| saturating_number(m.as_str()))
}

// Captures are plain digit runs, so overflow is the only parse failure
fn saturating_number(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_none() {
        assert_eq!(parse_rest_time("-"), 0);
        assert_eq!(parse_rest_time(""), 0);
    }

    #[test]
    fn test_rest_minutes_and_seconds() {
        assert_eq!(parse_rest_time("2 min"), 120);
        assert_eq!(parse_rest_time("2min"), 120);
        assert_eq!(parse_rest_time("3 MIN"), 180);
        assert_eq!(parse_rest_time("90s"), 90);
        assert_eq!(parse_rest_time("60 S"), 60);
        assert_eq!(parse_rest_time("45 sec"), 45);
    }

    #[test]
    fn test_rest_minutes_win_over_seconds() {
        assert_eq!(parse_rest_time("1-2 min"), 120);
        assert_eq!(parse_rest_time("2 mins 30s"), 120);
    }

    #[test]
    fn test_rest_fallback() {
        assert_eq!(parse_rest_time("garbage"), 60);
        assert_eq!(parse_rest_time("as needed"), 60);
        assert_eq!(parse_rest_time(" "), 60);
    }

    #[test]
    fn test_work_numeric_reps() {
        assert_eq!(parse_work_time(&Reps::Count(10)), 40);
        assert_eq!(parse_work_time(&Reps::Count(0)), 0);
        assert_eq!(parse_work_time(&"10".into()), 40);
        assert_eq!(parse_work_time(&"8-10".into()), 32);
    }

    #[test]
    fn test_work_timed_targets() {
        assert_eq!(parse_work_time(&"30s".into()), 30);
        assert_eq!(parse_work_time(&"20-30s".into()), 20);
        assert_eq!(parse_work_time(&"20 - 30 s".into()), 20);
        assert_eq!(parse_work_time(&"45 s hold".into()), 45);
    }

    #[test]
    fn test_work_seconds_suffix_needs_word_boundary() {
        // "30sec" is not the timed shorthand, so it reads as a leading rep count
        assert_eq!(parse_work_time(&"30sec".into()), 120);
    }

    #[test]
    fn test_work_fallback() {
        assert_eq!(parse_work_time(&"garbage".into()), 30);
        assert_eq!(parse_work_time(&"max reps".into()), 30);
        assert_eq!(parse_work_time(&"".into()), 30);
    }

    #[test]
    fn test_oversized_numbers_saturate() {
        let huge = Reps::Text("99999999999".into());
        assert_eq!(parse_work_time(&huge), u32::MAX);
        assert_eq!(parse_work_time(&Reps::Text("99999999999s".into())), u32::MAX);
        assert_eq!(parse_rest_time("99999999999 min"), u32::MAX);
        assert_eq!(parse_rest_time("99999999999s"), u32::MAX);
    }
}
