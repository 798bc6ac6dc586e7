//! Application-wide constants and defaults.
//!
//! Everything tunable through `calistimer.toml` has its default and its accepted
//! range here, next to the fixed values used by the timer core.

use std::time::Duration;

use crate::config::CueBackend;

// # Application

pub const APP_NAME: &str = "calistimer";
pub const CONFIG_FILE_NAME: &str = "calistimer.toml";
pub const EXIT_FAILURE: i32 = 1;

// # Timer core

/// Seconds assumed for a single repetition when a set is rep-based.
pub const SECONDS_PER_REP: u32 = 4;

/// Rest used when a rest string cannot be parsed.
pub const DEFAULT_REST_SECONDS: u32 = 60;

/// Work time used when a reps value cannot be parsed.
pub const DEFAULT_WORK_SECONDS: u32 = 30;

/// One countdown tick per wall-clock second.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

// # Audio cues

pub const CUE_START_FREQUENCY: f32 = 800.0;
pub const CUE_REST_FREQUENCY: f32 = 600.0;
pub const CUE_COMPLETE_FREQUENCY: f32 = 400.0;
pub const CUE_DURATION: Duration = Duration::from_millis(500);
pub const CUE_START_GAIN: f32 = 0.3;
pub const CUE_END_GAIN: f32 = 0.01;
pub const CUE_SAMPLE_RATE: u32 = 44_100;

// # Configuration defaults

pub const DEFAULT_AUDIO_CUES: bool = true;
pub const DEFAULT_CUE_BACKEND: CueBackend = CueBackend::Auto;
pub const DEFAULT_CUE_VOLUME: u8 = 100;
pub const DEFAULT_TIME_ADJUST_STEP: u32 = 15;

// # Configuration limits

pub const MINIMUM_CUE_VOLUME: u8 = 1;
pub const MAXIMUM_CUE_VOLUME: u8 = 100;
pub const MINIMUM_TIME_ADJUST_STEP: u32 = 1;
pub const MAXIMUM_TIME_ADJUST_STEP: u32 = 300;

// # Programs and persistence

pub const DEFAULT_PROGRAM_TITLE: &str = "8-Week Calisthenics Hybrid Program";
pub const NOTES_FILE_NAME: &str = "notes.json";
pub const NOTES_BACKUP_FILE_NAME: &str = "notes.local.json";
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";
pub const PROGRAMS_DIR_NAME: &str = "programs";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "calisthenics-progress.json";
pub const LOCK_FILE_NAME: &str = "calistimer.lock";

pub const DEFAULT_WEEK: u32 = 1;
pub const DEFAULT_DAY: u32 = 1;
