use crate::foundation::{
    core::{Rgba8, hsl_to_rgb8},
    error::{CaptchaError, CaptchaResult},
    random::RandomSource,
};

// Lightness bands (HSL, 0..1). The gap between them keeps background and foreground apart.
const LIGHT_LIGHTNESS: (f64, f64) = (0.82, 0.95);
const LIGHT_SATURATION: (f64, f64) = (0.20, 0.60);
const DEEP_LIGHTNESS: (f64, f64) = (0.12, 0.35);
const DEEP_SATURATION: (f64, f64) = (0.40, 0.90);

// Primary palette channels are sampled below this bound.
const PRIMARY_CHANNEL_LIMIT: u64 = 128;

/// Largest dot count whose palette still fits 8-bit indices.
pub const MAX_DOT_COUNT: usize = 255;

/// Random opaque color with high lightness, safe as a background or noise color.
pub fn light_color(rng: &RandomSource) -> CaptchaResult<Rgba8> {
    banded_color(rng, LIGHT_SATURATION, LIGHT_LIGHTNESS)
}

/// Random opaque color with low lightness, safe as a foreground (glyph/line) color.
pub fn deep_color(rng: &RandomSource) -> CaptchaResult<Rgba8> {
    banded_color(rng, DEEP_SATURATION, DEEP_LIGHTNESS)
}

fn banded_color(
    rng: &RandomSource,
    saturation: (f64, f64),
    lightness: (f64, f64),
) -> CaptchaResult<Rgba8> {
    let h = rng.float_range(0.0, 360.0)?;
    let s = rng.float_range(saturation.0, saturation.1)?;
    let l = rng.float_range(lightness.0, lightness.1)?;
    Ok(hsl_to_rgb8(h, s, l))
}

/// Indexed color table for dot-matrix digit canvases.
///
/// Entry 0 is fully transparent, entry 1 is the primary color and every further entry is a
/// brightness variant of the primary with identical channel differences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorPalette {
    colors: Vec<Rgba8>,
}

impl ColorPalette {
    /// Build a palette of `dot_count + 1` entries.
    pub fn build(rng: &RandomSource, dot_count: usize) -> CaptchaResult<Self> {
        if dot_count == 0 {
            return Err(CaptchaError::configuration("dot count must be greater than 0"));
        }
        if dot_count > MAX_DOT_COUNT {
            return Err(CaptchaError::configuration(format!(
                "dot count must be at most {MAX_DOT_COUNT}, got {dot_count}"
            )));
        }

        let mut colors = Vec::with_capacity(dot_count + 1);
        colors.push(Rgba8::transparent());

        let primary = Rgba8::opaque(
            rng.below(PRIMARY_CHANNEL_LIMIT)? as u8,
            rng.below(PRIMARY_CHANNEL_LIMIT)? as u8,
            rng.below(PRIMARY_CHANNEL_LIMIT)? as u8,
        );
        colors.push(primary);

        for _ in 2..=dot_count {
            colors.push(random_brightness(rng, primary)?);
        }
        Ok(Self { colors })
    }

    /// Number of entries (always `dot_count + 1`).
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Palettes are never empty; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Entry at `idx`.
    pub fn get(&self, idx: u8) -> Option<Rgba8> {
        self.colors.get(usize::from(idx)).copied()
    }

    /// The primary color (entry 1).
    pub fn primary(&self) -> Rgba8 {
        self.colors[1]
    }

    /// All entries in index order.
    pub fn colors(&self) -> &[Rgba8] {
        &self.colors
    }
}

/// Shift every channel of `c` by one shared random offset, keeping all channels in `0..=255`.
fn random_brightness(rng: &RandomSource, c: Rgba8) -> CaptchaResult<Rgba8> {
    let minc = i64::from(c.r.min(c.g).min(c.b));
    let maxc = i64::from(c.r.max(c.g).max(c.b));
    let offset = rng.int_range(-minc, 255 - maxc)?;
    let shift = |v: u8| (i64::from(v) + offset) as u8;
    Ok(Rgba8 {
        r: shift(c.r),
        g: shift(c.g),
        b: shift(c.b),
        a: c.a,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
