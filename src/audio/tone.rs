//! Synthesized cue tones: a short sine wave with an exponentially decaying gain.

use std::time::Duration;

use super::AudioCue;
use crate::common::constants::{CUE_DURATION, CUE_END_GAIN, CUE_SAMPLE_RATE, CUE_START_GAIN};

/// Mono sine tone whose gain falls exponentially from `CUE_START_GAIN` to
/// `CUE_END_GAIN` over its duration.
#[derive(Debug, Clone)]
pub struct DecayingTone {
    frequency: f32,
    volume: f32,
    sample_rate: u32,
    total_samples: usize,
    position: usize,
}

impl DecayingTone {
    /// Tone for `cue`, scaled by `volume` percent.
    pub fn for_cue(cue: AudioCue, volume: u8) -> Self {
        Self::new(cue.frequency(), CUE_DURATION, volume)
    }

    pub fn new(frequency: f32, duration: Duration, volume: u8) -> Self {
        let sample_rate = CUE_SAMPLE_RATE;
        Self {
            frequency,
            volume: f32::from(volume.min(100)) / 100.0,
            sample_rate,
            total_samples: (duration.as_secs_f32() * sample_rate as f32) as usize,
            position: 0,
        }
    }

    /// Envelope gain at sample `n`.
    pub fn gain_at(&self, n: usize) -> f32 {
        if self.total_samples == 0 {
            return CUE_END_GAIN;
        }
        let progress = n as f32 / self.total_samples as f32;
        CUE_START_GAIN * (CUE_END_GAIN / CUE_START_GAIN).powf(progress)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f32(self.total_samples as f32 / self.sample_rate as f32)
    }
}

impl Iterator for DecayingTone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.position >= self.total_samples {
            return None;
        }
        let t = self.position as f32 / self.sample_rate as f32;
        let sample = (2.0 * std::f32::consts::PI * self.frequency * t).sin()
            * self.gain_at(self.position)
            * self.volume;
        self.position += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_samples - self.position;
        (remaining, Some(remaining))
    }
}

#[cfg(feature = "audio")]
impl rodio::Source for DecayingTone {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.position)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.duration())
    }
}

/// Plays cue tones on the default output device.
///
/// Each cue is played on its own short-lived thread. A missing or busy audio
/// device just means no sound.
#[cfg(feature = "audio")]
pub struct ToneCuePlayer {
    volume: u8,
}

#[cfg(feature = "audio")]
impl ToneCuePlayer {
    pub fn new(volume: u8) -> Self {
        Self { volume }
    }
}

#[cfg(feature = "audio")]
impl super::CuePlayer for ToneCuePlayer {
    fn play(&self, cue: AudioCue) {
        let tone = DecayingTone::for_cue(cue, self.volume);
        std::thread::spawn(move || {
            use rodio::{OutputStream, Sink};

            let Ok((_stream, stream_handle)) = OutputStream::try_default() else {
                return;
            };
            let Ok(sink) = Sink::try_new(&stream_handle) else {
                return;
            };

            sink.append(tone);
            sink.sleep_until_end();
        });
    }
}
