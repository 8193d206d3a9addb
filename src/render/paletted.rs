//! Indexed-color canvas for dot-matrix digit captchas.

use std::f64::consts::PI;

use crate::{
    assets::color::ColorPalette,
    encode::{
        item::{Item, MIME_TYPE_IMAGE},
        png::encode_indexed_png,
    },
    foundation::{
        error::{CaptchaError, CaptchaResult},
        random::RandomSource,
    },
    render::digit_font::{DIGIT_FONT_HEIGHT, DIGIT_FONT_WIDTH, digit_glyph, is_set},
};

/// Palette index of the transparent background.
pub const BACKGROUND_INDEX: u8 = 0;
/// Palette index of the primary color (digits and strike-through).
pub const PRIMARY_INDEX: u8 = 1;

/// Digit cell geometry derived by [`calculate_sizes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DigitLayout {
    /// Side of one glyph dot in pixels (>= 1).
    pub dot_size: i32,
    /// Horizontal extent of one glyph, excluding the one-dot gap to the next.
    pub cell_width: i32,
    /// Vertical extent of one glyph.
    pub cell_height: i32,
}

impl DigitLayout {
    /// Width of `count` glyphs laid out side by side, gaps included.
    pub fn row_width(&self, count: usize) -> i32 {
        (self.cell_width + self.dot_size) * count as i32
    }
}

/// Fit `count` glyphs into a `width x height` canvas minus a border of a quarter of the shorter
/// side.
///
/// The fit is width-driven unless the glyph would then be taller than the available height.
pub fn calculate_sizes(width: u32, height: u32, count: usize) -> CaptchaResult<DigitLayout> {
    if count == 0 {
        return Err(CaptchaError::configuration("digit count must be greater than 0"));
    }
    let border = width.min(height) / 4;
    let w = f64::from(width - border * 2);
    let h = f64::from(height - border * 2);
    // One extra column for the gap between glyphs.
    let fw = (DIGIT_FONT_WIDTH + 1) as f64;
    let fh = DIGIT_FONT_HEIGHT as f64;

    let mut nw = w / count as f64;
    let mut nh = nw * fh / fw;
    if nh > h {
        nh = h;
        nw = fw / fh * nh;
    }

    let dot_size = ((nh / fh) as i32).max(1);
    Ok(DigitLayout {
        dot_size,
        cell_width: nw as i32 - dot_size,
        cell_height: nh as i32,
    })
}

/// Indexed pixel buffer plus the palette its indices refer to.
#[derive(Clone, Debug)]
pub struct PalettedCanvas {
    width: u32,
    height: u32,
    dot_size: i32,
    dot_count: usize,
    max_skew: f64,
    palette: ColorPalette,
    indices: Vec<u8>,
}

impl PalettedCanvas {
    /// Transparent canvas with a fresh random palette of `dot_count + 1` entries.
    pub fn new(
        rng: &RandomSource,
        width: u32,
        height: u32,
        dot_count: usize,
        max_skew: f64,
    ) -> CaptchaResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaptchaError::configuration(format!(
                "canvas must be at least 1x1, got {width}x{height}"
            )));
        }
        if !max_skew.is_finite() || max_skew < 0.0 {
            return Err(CaptchaError::configuration(format!(
                "max skew must be finite and >= 0, got {max_skew}"
            )));
        }
        let palette = ColorPalette::build(rng, dot_count)?;
        Ok(Self {
            width,
            height,
            dot_size: 1,
            dot_count,
            max_skew,
            palette,
            indices: vec![BACKGROUND_INDEX; width as usize * height as usize],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current dot size used by digits and the strike-through.
    pub fn dot_size(&self) -> i32 {
        self.dot_size
    }

    /// Set the dot size, usually from [`calculate_sizes`]. Clamped between 1 and the longer side.
    pub fn set_dot_size(&mut self, dot_size: i32) {
        let longest = self.width.max(self.height).min(u32::from(u16::MAX)) as i32;
        self.dot_size = dot_size.clamp(1, longest);
    }

    /// Palette the indices refer to.
    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Row-major palette indices.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Index at `(x, y)`; outside the canvas reads as [`BACKGROUND_INDEX`].
    pub fn index_at(&self, x: i32, y: i32) -> u8 {
        self.index_at_wide(i64::from(x), i64::from(y))
    }

    fn index_at_wide(&self, x: i64, y: i64) -> u8 {
        self.offset(x, y).map_or(BACKGROUND_INDEX, |i| self.indices[i])
    }

    /// Write `idx` at `(x, y)`. Out-of-canvas writes are ignored.
    pub fn set_index(&mut self, x: i32, y: i32, idx: u8) {
        self.draw_span(i64::from(x), i64::from(x), i64::from(y), idx);
    }

    // Clips the span to the canvas before touching any pixel.
    fn draw_span(&mut self, from_x: i64, to_x: i64, y: i64, idx: u8) {
        if y < 0 || y >= i64::from(self.height) {
            return;
        }
        let from = from_x.max(0);
        let to = to_x.min(i64::from(self.width) - 1);
        if from > to {
            return;
        }
        let row = y as usize * self.width as usize;
        self.indices[row + from as usize..=row + to as usize].fill(idx);
    }

    /// Filled circle via the integer midpoint algorithm, scan-filled with horizontal spans.
    ///
    /// A negative radius draws nothing.
    pub fn draw_circle(&mut self, x: i32, y: i32, radius: i32, idx: u8) {
        if radius < 0 {
            return;
        }
        let (x, y, radius) = (i64::from(x), i64::from(y), i64::from(radius));
        let mut f = 1 - radius;
        let mut dfx = 1;
        let mut dfy = -2 * radius;
        let mut xo = 0;
        let mut yo = radius;

        self.draw_span(x, x, y + radius, idx);
        self.draw_span(x, x, y - radius, idx);
        self.draw_span(x - radius, x + radius, y, idx);

        while xo < yo {
            if f >= 0 {
                yo -= 1;
                dfy += 2;
                f += dfy;
            }
            xo += 1;
            dfx += 2;
            f += dfx;
            self.draw_span(x - xo, x + xo, y + yo, idx);
            self.draw_span(x - xo, x + xo, y - yo, idx);
            self.draw_span(x - yo, x + yo, y + xo, idx);
            self.draw_span(x - yo, x + yo, y - xo, idx);
        }
    }

    /// Scatter `n` circles of radius `1..=max_radius` in random non-background colors.
    ///
    /// Centers are drawn so that each circle fits on the canvas whenever the canvas is large
    /// enough to hold it. `max_radius` is capped at the longer canvas side.
    pub fn fill_with_circles(
        &mut self,
        rng: &RandomSource,
        n: usize,
        max_radius: i32,
    ) -> CaptchaResult<()> {
        let maxx = self.width as i32;
        let maxy = self.height as i32;
        let top = self.dot_count.min(usize::from(u8::MAX)) as i32;
        let max_radius = max_radius.clamp(1, maxx.max(maxy));
        for _ in 0..n {
            let idx = rng.int_range_i32(1, top)? as u8;
            let r = rng.int_range_i32(1, max_radius)?;
            let x = rng.int_range_i32(r, maxx - 1 - r)?;
            let y = rng.int_range_i32(r, maxy - 1 - r)?;
            self.draw_circle(x, y, r, idx);
        }
        Ok(())
    }

    /// Draw one bitmap digit with its top-left dot at `(x, y)`.
    ///
    /// The glyph gets one random skew factor, accumulated row by row, and one vertical jitter
    /// of up to half a dot.
    pub fn draw_digit(
        &mut self,
        rng: &RandomSource,
        digit: u8,
        x: i32,
        y: i32,
    ) -> CaptchaResult<()> {
        let glyph = digit_glyph(digit).ok_or_else(|| {
            CaptchaError::configuration(format!("digit {digit} is outside 0..=9"))
        })?;
        let skew = rng.float_range(-self.max_skew, self.max_skew)?;
        let r = self.dot_size / 2;
        let y = y.saturating_add(rng.int_range_i32(-r, r)?);

        let mut xs = f64::from(x);
        let mut x = x;
        for row in 0..DIGIT_FONT_HEIGHT {
            for col in 0..DIGIT_FONT_WIDTH {
                if !is_set(glyph, col, row) {
                    continue;
                }
                self.draw_circle(
                    x.saturating_add(col as i32 * self.dot_size),
                    y.saturating_add(row as i32 * self.dot_size),
                    r,
                    PRIMARY_INDEX,
                );
            }
            xs += skew;
            x = xs as i32;
        }
        Ok(())
    }

    /// Wavy band of small primary-colored circles across the full width.
    pub fn strike_through(&mut self, rng: &RandomSource) -> CaptchaResult<()> {
        let maxx = self.width as i32;
        let maxy = self.height as i32;
        let y = rng.int_range_i32(maxy / 3, maxy - maxy / 3)?;
        let amplitude = rng.float_range(5.0, 20.0)?;
        let period = rng.float_range(80.0, 180.0)?;
        let dx = 2.0 * PI / period;

        let xo = (amplitude * (f64::from(y) * dx).cos()) as i32;
        for x in 0..maxx {
            let yo = (amplitude * (f64::from(x) * dx).sin()) as i32;
            for yn in 0..self.dot_size {
                let r = rng.below_i32(self.dot_size)?;
                self.draw_circle(x + xo, y + yo + yn * self.dot_size, r / 2, PRIMARY_INDEX);
            }
        }
        Ok(())
    }

    /// Sinusoidal warp: output `(x, y)` samples source
    /// `(x + amplitude*sin(y*2pi/period), y + amplitude*cos(x*2pi/period))`.
    ///
    /// Source reads outside the canvas yield the background index. A zero amplitude leaves the
    /// canvas unchanged.
    pub fn distort(&mut self, amplitude: f64, period: f64) {
        let w = self.width as i32;
        let h = self.height as i32;
        let dx = 2.0 * PI / period;

        let mut out = vec![BACKGROUND_INDEX; self.indices.len()];
        for y in 0..h {
            let xo = (amplitude * (f64::from(y) * dx).sin()) as i64;
            for x in 0..w {
                let yo = (amplitude * (f64::from(x) * dx).cos()) as i64;
                let sx = i64::from(x).saturating_add(xo);
                let sy = i64::from(y).saturating_add(yo);
                out[y as usize * w as usize + x as usize] = self.index_at_wide(sx, sy);
            }
        }
        self.indices = out;
    }
}

impl Item for PalettedCanvas {
    fn mime_type(&self) -> &'static str {
        MIME_TYPE_IMAGE
    }

    fn encode(&self) -> CaptchaResult<Vec<u8>> {
        encode_indexed_png(
            self.width,
            self.height,
            self.palette.colors(),
            &self.indices,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/paletted.rs"]
mod tests;
