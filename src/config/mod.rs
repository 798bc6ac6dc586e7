//! Configuration system for calistimer.
//!
//! Settings live in a TOML file, `calistimer.toml`, searched for at
//! `$XDG_CONFIG_HOME/calistimer/calistimer.toml` unless a directory was given
//! with `--config`. A commented default file is written on first start.
//!
//! ```toml
//! #[Program]
//! program_file = "~/workouts/program.json" # Seed program JSON (optional)
//! data_dir = "~/.local/share/calistimer"   # Where notes, programs and preferences live
//!
//! #[Audio cues]
//! audio_cues = true                        # Announce work, rest and completion
//! cue_backend = "auto"                     # "auto", "tone", "bell" or "none"
//! cue_volume = 100                         # Tone volume in percent (1-100)
//!
//! #[Controls]
//! time_adjust_step = 15                    # Seconds added or removed by +/- (1-300)
//! ```
//!
//! Every field is optional. Defaults live in [`crate::common::constants`] and
//! are filled in by the loader after validation.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::common::constants::*;
use crate::common::utils::{expand_tilde, private_path};

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// How audio cues are announced.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CueBackend {
    /// Synthesized tones when the binary has audio support, else the bell.
    Auto,
    /// Synthesized tones on the default output device.
    Tone,
    /// The terminal bell.
    Bell,
    /// No cues at all.
    None,
}

impl CueBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CueBackend::Auto => "auto",
            CueBackend::Tone => "tone",
            CueBackend::Bell => "bell",
            CueBackend::None => "none",
        }
    }
}

/// Settings loaded from `calistimer.toml`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Program document used to seed the program store.
    ///
    /// When unset, the program built into the binary is used.
    pub program_file: Option<String>,
    /// Directory for notes, stored programs and preferences.
    pub data_dir: Option<String>,

    pub audio_cues: Option<bool>,
    pub cue_backend: Option<CueBackend>,
    pub cue_volume: Option<u8>, // percent
    pub time_adjust_step: Option<u32>, // seconds
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Resolved data directory, `~` expanded.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(expand_tilde(dir)),
            None => Ok(dirs::data_dir()
                .context("Could not determine data directory")?
                .join(APP_NAME)),
        }
    }

    /// Resolved seed program path, if one is configured.
    pub fn program_file(&self) -> Option<PathBuf> {
        self.program_file.as_deref().map(expand_tilde)
    }

    pub fn time_adjust_step(&self) -> u32 {
        self.time_adjust_step.unwrap_or(DEFAULT_TIME_ADJUST_STEP)
    }

    pub fn log_config(&self, source: Option<&Path>) {
        match source {
            Some(path) => log_block_start!("Loaded configuration from {}", private_path(path)),
            None => log_block_start!("Loaded default configuration"),
        }

        match self.program_file() {
            Some(path) => log_indented!("Program: {}", private_path(&path)),
            None => log_indented!("Program: {DEFAULT_PROGRAM_TITLE} (built in)"),
        }

        if let Ok(dir) = self.data_dir() {
            log_indented!("Data directory: {}", private_path(&dir));
        }

        if self.audio_cues.unwrap_or(DEFAULT_AUDIO_CUES) {
            let backend = self.cue_backend.unwrap_or(DEFAULT_CUE_BACKEND);
            if backend == CueBackend::Bell || backend == CueBackend::None {
                log_indented!("Audio cues: {}", backend.as_str());
            } else {
                log_indented!(
                    "Audio cues: {} @ {}% volume",
                    backend.as_str(),
                    self.cue_volume.unwrap_or(DEFAULT_CUE_VOLUME)
                );
            }
        } else {
            log_indented!("Audio cues: disabled");
        }

        let step = self.time_adjust_step();
        log_indented!(
            "Time adjust step: {} {}",
            step,
            if step == 1 { "second" } else { "seconds" }
        );
    }
}
