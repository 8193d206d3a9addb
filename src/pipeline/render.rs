use crate::{
    assets::{color::light_color, store::AssetStore},
    audio::synth::AudioCaptcha,
    foundation::{
        error::{CaptchaError, CaptchaResult},
        random::{RandomSource, TXT_ALPHABET, TXT_NUMBERS, random_text},
    },
    pipeline::opts::{AudioCaptchaOpts, CharCaptchaOpts, DigitCaptchaOpts, Effect},
    render::{
        canvas::Canvas,
        paletted::{PalettedCanvas, calculate_sizes},
    },
};

const SLIM_LINE_COUNT: usize = 3;
const NOISE_EXTRA_CHARS: &str = ",.[]<>";
const WARP_AMPLITUDE: (f64, f64) = (5.0, 10.0);
const WARP_PERIOD: (f64, f64) = (100.0, 200.0);

/// Render `text` onto a true-color canvas.
///
/// Effects run in a fixed order: hollow line, slim lines, sine line, noise, then the text.
#[tracing::instrument(skip(rng, store, opts), fields(w = opts.width, h = opts.height))]
pub fn render_char_captcha(
    rng: &RandomSource,
    store: &AssetStore,
    text: &str,
    opts: &CharCaptchaOpts,
) -> CaptchaResult<Canvas> {
    if text.is_empty() {
        return Err(CaptchaError::configuration("text must not be empty, there is nothing to draw"));
    }
    let fonts = store.fonts(&opts.fonts)?;

    let background = match opts.bg_color {
        Some(c) => c,
        None => light_color(rng)?,
    };
    let mut canvas = Canvas::new(opts.width, opts.height, background)?;

    if opts.effects.contains(Effect::HollowLine) {
        canvas.draw_hollow_line(rng)?;
    }
    if opts.effects.contains(Effect::SlimLine) {
        canvas.draw_slim_lines(rng, SLIM_LINE_COUNT)?;
    }
    if opts.effects.contains(Effect::SineLine) {
        canvas.draw_sine_line(rng)?;
    }
    if opts.effects.contains(Effect::Noise) && opts.noise_count > 0 {
        let source = format!("{TXT_NUMBERS}{TXT_ALPHABET}{NOISE_EXTRA_CHARS}");
        let noise = random_text(rng, opts.noise_count, &source)?;
        canvas.draw_noise(rng, &noise, &fonts)?;
    }
    canvas.draw_text(rng, text, &fonts)?;
    Ok(canvas)
}

/// Render `digits` (each `0..=9`) as a warped dot-matrix captcha.
///
/// Steps: background circles, the digit row at a random offset, a strike-through band, then a
/// sinusoidal warp.
#[tracing::instrument(skip(rng, opts), fields(w = opts.width, h = opts.height))]
pub fn render_digit_captcha(
    rng: &RandomSource,
    digits: &[u8],
    opts: &DigitCaptchaOpts,
) -> CaptchaResult<PalettedCanvas> {
    if let Some(d) = digits.iter().find(|&&d| d > 9) {
        return Err(CaptchaError::configuration(format!("digit {d} is outside 0..=9")));
    }
    let layout = calculate_sizes(opts.width, opts.height, digits.len())?;
    tracing::debug!(?layout, "digit layout");

    let mut canvas =
        PalettedCanvas::new(rng, opts.width, opts.height, opts.dot_count, opts.max_skew)?;
    canvas.set_dot_size(layout.dot_size);
    canvas.fill_with_circles(rng, opts.dot_count, layout.dot_size)?;

    let w = opts.width as i32;
    let h = opts.height as i32;
    let border = w.min(h) / 5;
    let maxx = w - layout.row_width(digits.len()) - layout.dot_size;
    let maxy = h - layout.cell_height - layout.dot_size * 2;
    let mut x = rng.below_i32(maxx - border * 2)? + border;
    let y = rng.below_i32(maxy - border * 2)? + border;
    for &d in digits {
        canvas.draw_digit(rng, d, x, y)?;
        x += layout.cell_width + layout.dot_size;
    }

    canvas.strike_through(rng)?;
    let amplitude = rng.float_range(WARP_AMPLITUDE.0, WARP_AMPLITUDE.1)?;
    let period = rng.float_range(WARP_PERIOD.0, WARP_PERIOD.1)?;
    canvas.distort(amplitude, period);
    Ok(canvas)
}

/// Assemble a spoken-digit captcha for `digits` (each `0..=9`).
#[tracing::instrument(skip(rng, store, opts), fields(language = %opts.language))]
pub fn render_audio_captcha(
    rng: &RandomSource,
    store: &AssetStore,
    digits: &[u8],
    opts: &AudioCaptchaOpts,
) -> CaptchaResult<AudioCaptcha> {
    AudioCaptcha::new(rng, store, digits, &opts.language)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/render.rs"]
mod tests;
