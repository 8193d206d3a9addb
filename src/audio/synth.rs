use crate::{
    assets::store::{AssetStore, DigitSoundSet},
    audio::sound::{SAMPLE_RATE, SILENCE, Sound, beep, ending_beep},
    encode::{
        item::{Item, MIME_TYPE_AUDIO},
        wav::{encode_wav, encoded_len, write_wav},
    },
    foundation::{
        error::{CaptchaError, CaptchaResult},
        random::RandomSource,
    },
};

const SPEED_RANGE: (f64, f64) = (0.95, 1.10);
const LEVEL_RANGE: (f64, f64) = (0.85, 1.20);
const DIGIT_BOOST: f64 = 1.5;
const DECOY_LEVEL_RANGE: (f64, f64) = (0.04, 0.08);
const NOISE_LEVEL: u8 = 4;
// Gaps before, between and after digits: one to two seconds.
const GAP_RANGE: (i64, i64) = (SAMPLE_RATE as i64, 2 * SAMPLE_RATE as i64);
// One decoy per 100 ms of background.
const DECOY_SPACING: usize = SAMPLE_RATE as usize / 10;
const PRELUDE_SILENCE: usize = SAMPLE_RATE as usize / 5;

/// Spoken-digit captcha: three lead-in beeps, the digits over a noisy background, one trailing
/// beep. Unsigned 8-bit mono PCM at [`SAMPLE_RATE`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioCaptcha {
    body: Vec<u8>,
}

impl AudioCaptcha {
    /// Assemble `digits` (each `0..=9`) pronounced in `language`.
    ///
    /// A language without a sound set falls back to the store's default language.
    pub fn new(
        rng: &RandomSource,
        store: &AssetStore,
        digits: &[u8],
        language: &str,
    ) -> CaptchaResult<Self> {
        let sounds = store.digit_sounds(language)?;
        Self::with_sounds(rng, sounds, digits)
    }

    /// Assemble `digits` from an explicit sound set.
    pub fn with_sounds(
        rng: &RandomSource,
        sounds: &DigitSoundSet,
        digits: &[u8],
    ) -> CaptchaResult<Self> {
        if digits.is_empty() {
            return Err(CaptchaError::configuration("audio captcha needs at least one digit"));
        }

        let mut spoken = Vec::with_capacity(digits.len());
        for &d in digits {
            let mut snd = randomized_digit_sound(rng, sounds.get(d)?)?;
            snd.set_level(DIGIT_BOOST);
            spoken.push(snd);
        }

        let mut gaps = Vec::with_capacity(digits.len() + 1);
        for _ in 0..=digits.len() {
            gaps.push(rng.int_range(GAP_RANGE.0, GAP_RANGE.1)? as usize);
        }

        let total = spoken.iter().map(Sound::len).sum::<usize>() + gaps.iter().sum::<usize>();
        let mut background = background_sound(rng, sounds, total)?;

        let mut pos = gaps[0];
        for (snd, gap) in spoken.iter().zip(&gaps[1..]) {
            background.mix_at(pos, snd);
            pos += snd.len() + gap;
        }

        let lead = beep();
        let pause = Sound::silence(PRELUDE_SILENCE);
        let tail = ending_beep();
        let mut body = Vec::with_capacity(
            3 * lead.len() + 2 * pause.len() + background.len() + tail.len(),
        );
        body.extend_from_slice(lead.samples());
        body.extend_from_slice(pause.samples());
        body.extend_from_slice(lead.samples());
        body.extend_from_slice(pause.samples());
        body.extend_from_slice(lead.samples());
        body.extend_from_slice(background.samples());
        body.extend_from_slice(tail.samples());

        tracing::debug!(
            digits = digits.len(),
            samples = body.len(),
            "assembled audio captcha"
        );
        Ok(Self { body })
    }

    /// PCM body without the container header.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Size of [`Item::encode`] output in bytes.
    pub fn encoded_len(&self) -> usize {
        encoded_len(self.body.len())
    }
}

impl Item for AudioCaptcha {
    fn mime_type(&self) -> &'static str {
        MIME_TYPE_AUDIO
    }

    fn encode(&self) -> CaptchaResult<Vec<u8>> {
        encode_wav(&self.body)
    }

    fn write_to(&self, w: &mut dyn std::io::Write) -> CaptchaResult<u64> {
        write_wav(&self.body, w)
    }
}

/// `base` at a random speed in [0.95, 1.10) and a random level in [0.85, 1.20).
pub fn randomized_digit_sound(rng: &RandomSource, base: &Sound) -> CaptchaResult<Sound> {
    let speed = rng.float_range(SPEED_RANGE.0, SPEED_RANGE.1)?;
    let mut snd = base.change_speed(speed);
    snd.set_level(rng.float_range(LEVEL_RANGE.0, LEVEL_RANGE.1)?);
    Ok(snd)
}

/// `len` samples of low-level noise centered on [`SILENCE`], spanning `level` steps.
pub fn white_noise(rng: &RandomSource, len: usize, level: u8) -> CaptchaResult<Sound> {
    let level = level.max(1);
    let adj = SILENCE - level / 2;
    let mut samples = rng.bytes(len)?;
    for v in &mut samples {
        *v = *v % level + adj;
    }
    Ok(Sound::from_samples(samples))
}

/// White noise of `len` samples overlaid with reversed, strongly attenuated digit decoys.
pub fn background_sound(
    rng: &RandomSource,
    sounds: &DigitSoundSet,
    len: usize,
) -> CaptchaResult<Sound> {
    let mut bg = white_noise(rng, len, NOISE_LEVEL)?;
    for _ in 0..len / DECOY_SPACING {
        let digit = rng.below(sounds.sounds().len() as u64)? as u8;
        let mut decoy = sounds.get(digit)?.reversed();
        let place = rng.below(len.saturating_sub(decoy.len()) as u64)? as usize;
        decoy.set_level(rng.float_range(DECOY_LEVEL_RANGE.0, DECOY_LEVEL_RANGE.1)?);
        bg.mix_at(place, &decoy);
    }
    Ok(bg)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/synth.rs"]
mod tests;
