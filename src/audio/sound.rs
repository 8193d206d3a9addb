//! Unsigned 8-bit mono PCM buffers and the sample-level transforms applied to them.

use std::f64::consts::PI;

/// Sample rate of every buffer handled by the engine, in Hz.
pub const SAMPLE_RATE: u32 = 8_000;

/// Sample value of silence (midpoint of unsigned 8-bit PCM).
pub const SILENCE: u8 = 128;

/// Single-channel unsigned 8-bit PCM buffer at [`SAMPLE_RATE`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sound {
    samples: Vec<u8>,
}

impl Sound {
    /// Wrap raw samples.
    pub fn from_samples(samples: Vec<u8>) -> Self {
        Self { samples }
    }

    /// `len` samples of silence.
    pub fn silence(len: usize) -> Self {
        Self {
            samples: vec![SILENCE; len],
        }
    }

    /// Sample count.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in playback order.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Resample by index mapping at `factor`.
    ///
    /// Output length is `round(len / factor)`; `factor > 1` shortens the sound (faster, higher
    /// pitch), `factor < 1` lengthens it. Non-positive or non-finite factors leave it unchanged.
    pub fn change_speed(&self, factor: f64) -> Self {
        Self {
            samples: change_speed(&self.samples, factor),
        }
    }

    /// Scale amplitude around [`SILENCE`] by `level`, saturating at the sample range.
    pub fn set_level(&mut self, level: f64) {
        set_level(&mut self.samples, level);
    }

    /// Copy of the sound played backwards.
    pub fn reversed(&self) -> Self {
        let mut samples = self.samples.clone();
        samples.reverse();
        Self { samples }
    }

    /// Mix `src` into this sound starting at sample `offset`. Samples past the end are dropped.
    pub fn mix_at(&mut self, offset: usize, src: &Sound) {
        if offset >= self.samples.len() {
            return;
        }
        mix_sound(&mut self.samples[offset..], &src.samples);
    }
}

/// See [`Sound::change_speed`].
pub fn change_speed(samples: &[u8], factor: f64) -> Vec<u8> {
    if !factor.is_finite() || factor <= 0.0 || samples.is_empty() {
        return samples.to_vec();
    }
    let out_len = (samples.len() as f64 / factor).round() as usize;
    let last = samples.len() - 1;
    (0..out_len)
        .map(|i| {
            let src = ((i as f64) * factor) as usize;
            samples[src.min(last)]
        })
        .collect()
}

/// See [`Sound::set_level`].
pub fn set_level(samples: &mut [u8], level: f64) {
    for s in samples {
        let centered = f64::from(*s) - f64::from(SILENCE);
        if centered == 0.0 {
            continue;
        }
        let scaled = (centered * level + f64::from(SILENCE)).round();
        *s = scaled.clamp(0.0, 255.0) as u8;
    }
}

/// Add `src` onto `dst` sample by sample, centered on [`SILENCE`] and clipped to `0..=255`.
///
/// Only the overlapping prefix (`min(dst.len(), src.len())`) is touched.
pub fn mix_sound(dst: &mut [u8], src: &[u8]) {
    let center = i16::from(SILENCE);
    for (d, s) in dst.iter_mut().zip(src) {
        let sum = (i16::from(*d) - center) + (i16::from(*s) - center);
        *d = (sum + center).clamp(0, 255) as u8;
    }
}

/// Fixed sine tone with short linear fades at both ends.
pub(crate) fn tone(freq_hz: f64, duration_ms: u32, amplitude: f64) -> Sound {
    let len = (u64::from(SAMPLE_RATE) * u64::from(duration_ms) / 1000) as usize;
    let fade = (SAMPLE_RATE as usize / 200).min(len / 2).max(1);
    let samples = (0..len)
        .map(|i| {
            let t = i as f64 / f64::from(SAMPLE_RATE);
            let edge = i.min(len - 1 - i);
            let env = (edge as f64 / fade as f64).min(1.0);
            let v = (2.0 * PI * freq_hz * t).sin() * amplitude * env;
            (f64::from(SILENCE) + v).round().clamp(0.0, 255.0) as u8
        })
        .collect();
    Sound { samples }
}

/// Lead-in beep, played three times before the digits.
pub fn beep() -> Sound {
    tone(1_000.0, 150, 90.0)
}

/// Trailing beep marking the end of the recording.
pub fn ending_beep() -> Sound {
    tone(700.0, 400, 90.0)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/sound.rs"]
mod tests;
