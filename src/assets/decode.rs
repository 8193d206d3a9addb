use std::{io::Cursor, sync::Arc};

use anyhow::{Context, bail};

use crate::audio::sound::{SAMPLE_RATE, SILENCE, Sound};

/// Register font bytes in a scratch font context and return the first family name.
pub(crate) fn font_family_name(bytes: &Arc<Vec<u8>>) -> anyhow::Result<String> {
    let mut font_ctx = parley::FontContext::default();
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::new(bytes.clone()), None);
    let Some((family_id, _)) = families.first() else {
        bail!("no font families registered from font bytes");
    };
    let name = font_ctx
        .collection
        .family_name(*family_id)
        .context("registered font family has no name")?;
    Ok(name.to_string())
}

/// Decode a mono WAV file at [`SAMPLE_RATE`] into unsigned 8-bit PCM.
///
/// 8-bit and 16-bit integer sources are accepted; 16-bit samples keep their high byte.
pub fn decode_wav_pcm_u8(bytes: &[u8]) -> anyhow::Result<Sound> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).context("parse wav header")?;
    let spec = reader.spec();
    if spec.channels != 1 {
        bail!("expected mono audio, got {} channels", spec.channels);
    }
    if spec.sample_rate != SAMPLE_RATE {
        bail!(
            "expected {SAMPLE_RATE} Hz audio, got {} Hz",
            spec.sample_rate
        );
    }

    let center = i16::from(SILENCE);
    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| (i16::from(v) + center) as u8))
            .collect::<Result<Vec<_>, _>>()
            .context("read 8-bit samples")?,
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| ((v >> 8) + center) as u8))
            .collect::<Result<Vec<_>, _>>()
            .context("read 16-bit samples")?,
        (format, bits) => bail!("unsupported sample format {format:?} with {bits} bits"),
    };
    Ok(Sound::from_samples(samples))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
