//! Audio cues for phase changes.
//!
//! The timer engine only knows the [`CuePlayer`] trait. Players are
//! fire-and-forget: `play` returns immediately and any playback failure stays
//! inside the player.

pub mod tone;

use std::io::Write;

use crate::common::constants::{
    CUE_COMPLETE_FREQUENCY, CUE_REST_FREQUENCY, CUE_START_FREQUENCY, DEFAULT_AUDIO_CUES,
    DEFAULT_CUE_BACKEND, DEFAULT_CUE_VOLUME,
};
use crate::config::{Config, CueBackend};

pub use tone::DecayingTone;
#[cfg(feature = "audio")]
pub use tone::ToneCuePlayer;

/// The three moments the timer announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// A work phase begins
    Start,
    /// A rest phase begins
    Rest,
    /// The session finished
    Complete,
}

impl AudioCue {
    /// Tone frequency in Hz: high for start, medium for rest, low for complete.
    pub fn frequency(&self) -> f32 {
        match self {
            AudioCue::Start => CUE_START_FREQUENCY,
            AudioCue::Rest => CUE_REST_FREQUENCY,
            AudioCue::Complete => CUE_COMPLETE_FREQUENCY,
        }
    }
}

/// Something that can announce a cue.
#[cfg_attr(test, mockall::automock)]
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: AudioCue);
}

/// Silent player for headless runs and tests.
pub struct NullCuePlayer;

impl CuePlayer for NullCuePlayer {
    fn play(&self, _cue: AudioCue) {}
}

/// Rings the terminal bell, once for start and rest, twice for complete.
pub struct BellCuePlayer;

impl CuePlayer for BellCuePlayer {
    fn play(&self, cue: AudioCue) {
        let bells = match cue {
            AudioCue::Complete => "\x07\x07",
            AudioCue::Start | AudioCue::Rest => "\x07",
        };
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(bells.as_bytes());
        let _ = stdout.flush();
    }
}

/// Keeps every cue it is asked to play, in order.
#[cfg(any(test, feature = "testing-support"))]
#[derive(Clone, Default)]
pub struct RecordingCuePlayer {
    played: std::sync::Arc<std::sync::Mutex<Vec<AudioCue>>>,
}

#[cfg(any(test, feature = "testing-support"))]
impl RecordingCuePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far.
    pub fn played(&self) -> Vec<AudioCue> {
        self.played.lock().map(|cues| cues.clone()).unwrap_or_default()
    }
}

#[cfg(any(test, feature = "testing-support"))]
impl CuePlayer for RecordingCuePlayer {
    fn play(&self, cue: AudioCue) {
        if let Ok(mut cues) = self.played.lock() {
            cues.push(cue);
        }
    }
}

/// Backend that will actually announce cues.
///
/// `auto` means synthesized tones when the binary was built with the `audio`
/// feature and the terminal bell otherwise. The bell only rings into a
/// terminal: with stdout piped or redirected it becomes `None`.
pub fn resolve_cue_backend(config: &Config, terminal_attached: bool) -> CueBackend {
    if !config.audio_cues.unwrap_or(DEFAULT_AUDIO_CUES) {
        return CueBackend::None;
    }

    let bell = if terminal_attached {
        CueBackend::Bell
    } else {
        CueBackend::None
    };
    match config.cue_backend.unwrap_or(DEFAULT_CUE_BACKEND) {
        CueBackend::None => CueBackend::None,
        CueBackend::Bell => bell,
        CueBackend::Tone | CueBackend::Auto if cfg!(feature = "audio") => CueBackend::Tone,
        CueBackend::Tone | CueBackend::Auto => bell,
    }
}

/// Pick the cue player the configuration asks for.
pub fn cue_player_from_config(
    config: &Config,
    terminal_attached: bool,
    debug_enabled: bool,
) -> Box<dyn CuePlayer> {
    let backend = resolve_cue_backend(config, terminal_attached);
    let volume = config.cue_volume.unwrap_or(DEFAULT_CUE_VOLUME);

    let tone_requested = config.cue_backend == Some(CueBackend::Tone)
        && config.audio_cues.unwrap_or(DEFAULT_AUDIO_CUES);
    if tone_requested && !cfg!(feature = "audio") {
        log_pipe!();
        log_warning!("cue_backend = \"tone\" needs a build with the 'audio' feature");
        log_indented!("Falling back to: {}", backend.as_str());
    }
    if debug_enabled {
        log_debug!("Announcing cues with: {}", backend.as_str());
    }

    match backend {
        CueBackend::Bell => Box::new(BellCuePlayer),
        CueBackend::Tone | CueBackend::Auto => tone_player(volume),
        CueBackend::None => Box::new(NullCuePlayer),
    }
}

#[cfg(feature = "audio")]
fn tone_player(volume: u8) -> Box<dyn CuePlayer> {
    Box::new(ToneCuePlayer::new(volume))
}

// Never selected without the feature
#[cfg(not(feature = "audio"))]
fn tone_player(_volume: u8) -> Box<dyn CuePlayer> {
    Box::new(NullCuePlayer)
}
