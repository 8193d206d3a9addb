//! Minimal RIFF/WAVE container for 8-bit mono PCM.

use std::io::Write;

use anyhow::Context;

use crate::{audio::sound::SAMPLE_RATE, foundation::error::CaptchaResult};

/// Size of the canonical PCM header.
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 8;
const CHANNELS: u16 = 1;
const FORMAT_PCM: u16 = 1;

/// Total container size for a body of `body_len` samples, including the pad byte.
pub fn encoded_len(body_len: usize) -> usize {
    WAV_HEADER_LEN + body_len + body_len % 2
}

fn header(body_len: u32) -> [u8; WAV_HEADER_LEN] {
    let padded = body_len + body_len % 2;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = SAMPLE_RATE * u32::from(block_align);

    let mut h = [0u8; WAV_HEADER_LEN];
    h[0..4].copy_from_slice(b"RIFF");
    h[4..8].copy_from_slice(&(36 + padded).to_le_bytes());
    h[8..12].copy_from_slice(b"WAVE");
    h[12..16].copy_from_slice(b"fmt ");
    h[16..20].copy_from_slice(&16u32.to_le_bytes());
    h[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
    h[22..24].copy_from_slice(&CHANNELS.to_le_bytes());
    h[24..28].copy_from_slice(&SAMPLE_RATE.to_le_bytes());
    h[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    h[32..34].copy_from_slice(&block_align.to_le_bytes());
    h[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    h[36..40].copy_from_slice(b"data");
    h[40..44].copy_from_slice(&body_len.to_le_bytes());
    h
}

/// Write header, body and (for odd bodies) one zero pad byte. Returns bytes written.
pub(crate) fn write_wav(body: &[u8], w: &mut dyn Write) -> CaptchaResult<u64> {
    let body_len = u32::try_from(body.len()).context("wav body exceeds 4 GiB")?;
    w.write_all(&header(body_len)).context("write wav header")?;
    w.write_all(body).context("write wav body")?;
    if body.len() % 2 == 1 {
        w.write_all(&[0]).context("write wav pad byte")?;
    }
    Ok(encoded_len(body.len()) as u64)
}

/// [`write_wav`] into a fresh buffer.
pub(crate) fn encode_wav(body: &[u8]) -> CaptchaResult<Vec<u8>> {
    let mut out = Vec::with_capacity(encoded_len(body.len()));
    write_wav(body, &mut out)?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/wav.rs"]
mod tests;
