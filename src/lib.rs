//! # calistimer
//!
//! Terminal interval timer for multi-week calisthenics programs.
//!
//! The library holds everything the `calistimer` binary does, so it can be
//! tested and embedded without the terminal front end:
//!
//! - **Workout model**: `workout` with exercises, day sections, exercise ids and
//!   multi-week programs
//! - **Timer**: `timer` with the duration parser, day navigator, the session
//!   state machine and the event loop that drives it
//! - **Audio cues**: `audio` with tone, bell and silent players
//! - **Persistence**: `storage` for notes, stored programs and preferences
//! - **Configuration**: `config` for the TOML settings file
//! - **Infrastructure**: `io` (signals, session lock), `time_source`, logging and
//!   utilities in `common`
//! - **CLI**: `args` and `commands`

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod args;
pub mod audio;
pub mod commands;
pub mod config;
pub mod io;
pub mod storage;
pub mod time_source;
pub mod timer;
pub mod workout;
