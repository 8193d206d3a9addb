//! True-color canvas used by text captchas.
//!
//! Every primitive writes through [`Canvas::set_pixel`], which drops coordinates outside
//! `[0, width) x [0, height)`. Random geometry is therefore never clamped before drawing.

use std::f64::consts::PI;

use crate::{
    assets::{
        color::{deep_color, light_color},
        shape::{GlyphShaper, PlacedRun},
        store::FontAsset,
    },
    encode::{
        item::{Item, MIME_TYPE_IMAGE},
        png::encode_rgba_png,
    },
    foundation::{
        core::{Point, Rgba8},
        error::{CaptchaError, CaptchaResult},
        random::RandomSource,
    },
};

/// Owned RGBA pixel buffer with captcha drawing primitives.
#[derive(Clone, Debug)]
pub struct Canvas {
    background: Rgba8,
    pixels: image::RgbaImage,
}

impl Canvas {
    /// Canvas of `width x height` filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba8) -> CaptchaResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaptchaError::configuration(format!(
                "canvas must be at least 1x1, got {width}x{height}"
            )));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(CaptchaError::configuration(format!(
                "canvas {width}x{height} exceeds {0}x{0}",
                u16::MAX
            )));
        }
        Ok(Self {
            background,
            pixels: image::RgbaImage::from_pixel(width, height, image::Rgba(background.to_array())),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Fill color the canvas was created with.
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Underlying pixel buffer.
    pub fn image(&self) -> &image::RgbaImage {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        let (x, y) = self.checked(x, y)?;
        let [r, g, b, a] = self.pixels.get_pixel(x, y).0;
        Some(Rgba8 { r, g, b, a })
    }

    /// Overwrite `(x, y)` with `color`. Out-of-canvas writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba8) {
        if let Some((x, y)) = self.checked(x, y) {
            self.pixels.put_pixel(x, y, image::Rgba(color.to_array()));
        }
    }

    fn checked(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.width() && y < self.height()).then_some((x, y))
    }

    fn dims(&self) -> (i32, i32) {
        (self.width() as i32, self.height() as i32)
    }

    /// Thick light-colored sine band spanning roughly 5% to 95% of the width.
    pub fn draw_hollow_line(&mut self, rng: &RandomSource) -> CaptchaResult<()> {
        let (w, h) = self.dims();
        let first = w / 20;
        let end = first * 19;

        let color = light_color(rng)?;
        let x1 = rng.below_i32(first)?;
        let x2 = rng.below_i32(first)? + end;

        let k = rng.below(8)? as i32 + 3;
        let mut multiple = f64::from(k) / 5.0;
        // Tenths of the multiple divisible by 3 flip the curve into the lower half.
        if (k * 2) % 3 == 0 {
            multiple = -multiple;
        }

        let thickness = h / 20;
        for x in x1..x2 {
            let mut y = (f64::from(x) * PI * multiple / f64::from(w)).sin() * f64::from(h / 3);
            if multiple < 0.0 {
                y += f64::from(h / 2);
            }
            let y = y as i32;
            for i in 0..=thickness {
                self.set_pixel(x, y + i, color);
            }
        }
        Ok(())
    }

    /// Single deep-colored sine wave drawn over 80-100% of the width.
    pub fn draw_sine_line(&mut self, rng: &RandomSource) -> CaptchaResult<()> {
        let (w, h) = self.dims();

        let amplitude = rng.below_i32(h / 2)? as f64;
        let offset_y = rng.float_range(f64::from(-h / 4), f64::from(h / 4))?;
        let phase = rng.float_range(f64::from(-h / 4), f64::from(h / 4))?;

        let period = if h > w / 2 {
            rng.float_range(f64::from(w / 2), f64::from(h))?
        } else if h == w / 2 {
            f64::from(h)
        } else {
            rng.float_range(f64::from(h), f64::from(w / 2))?
        };
        let end = rng.float_range(f64::from((f64::from(w) * 0.8) as i32), f64::from(w))? as i32;
        let color = deep_color(rng)?;

        if period <= 0.0 {
            return Ok(());
        }
        let omega = 2.0 * PI / period;
        let band = h / 5;
        let center = f64::from(h / 2);
        for px in 0..end {
            let py = amplitude * (omega * f64::from(px) + phase).sin() + offset_y + center;
            let py = py as i32;
            for i in (1..=band).rev() {
                self.set_pixel(px + i, py, color);
            }
        }
        Ok(())
    }

    /// `n` thin straight segments joining opposite vertical thirds, each in its own deep color.
    pub fn draw_slim_lines(&mut self, rng: &RandomSource, n: usize) -> CaptchaResult<()> {
        let (w, h) = self.dims();
        let first = w / 10;
        let end = first * 9;
        let third = h / 3;

        for i in 0..n {
            let mut p1 = Point::new(rng.below_i32(first)?, rng.below_i32(third)?);
            let mut p2 = Point::new(rng.below_i32(first)? + end, rng.below_i32(third)?);
            if i % 2 == 0 {
                p1.y = rng.below_i32(third)? + third * 2;
                p2.y = rng.below_i32(third)?;
            } else {
                p1.y = rng.below_i32(third)? + third;
                p2.y = rng.below_i32(third)? + third * 2;
            }
            let color = deep_color(rng)?;
            self.draw_beeline(p1, p2, color);
        }
        Ok(())
    }

    /// Integer Bresenham segment from `from` to `to`, widened two pixels left and right.
    pub fn draw_beeline(&mut self, from: Point, to: Point, color: Rgba8) {
        let dx = (from.x - to.x).abs();
        let dy = (to.y - from.y).abs();
        let sx = if from.x >= to.x { -1 } else { 1 };
        let sy = if from.y >= to.y { -1 } else { 1 };

        let mut p = from;
        let mut err = dx - dy;
        loop {
            for ox in -2..=2 {
                self.set_pixel(p.x + ox, p.y, color);
            }
            if p == to {
                return;
            }
            let e2 = err * 2;
            if e2 > -dy {
                err -= dy;
                p.x += sx;
            }
            if e2 < dx {
                err += dx;
                p.y += sy;
            }
        }
    }

    /// Scatter every character of `text` at a random position, size, light color and font.
    pub fn draw_noise(
        &mut self,
        rng: &RandomSource,
        text: &str,
        fonts: &[FontAsset],
    ) -> CaptchaResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        if fonts.is_empty() {
            return Err(CaptchaError::configuration("noise needs at least one font"));
        }
        let (w, h) = self.dims();

        let raw_size = f64::from(h) / (1.0 + rng.below(7)? as f64 / 10.0);
        let mut shaper = GlyphShaper::new();
        let mut runs = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let x = rng.below_i32(w)?;
            let y = rng.below_i32(h)?;
            let size = raw_size / 2.0 + rng.below(5)? as f64;
            let color = light_color(rng)?;
            let font = rng.choose(fonts)?;

            let run = shaper.shape_char(font, ch, size as f32)?;
            runs.push(PlacedRun {
                font: font.clone(),
                run,
                origin: (f64::from(x), f64::from(y)),
                color,
            });
        }
        crate::assets::shape::paint_runs(&mut self.pixels, &runs)
    }

    /// Lay out `text` in equal-width slots, one glyph per slot, each with its own random size,
    /// vertical jitter, deep color and font.
    pub fn draw_text(
        &mut self,
        rng: &RandomSource,
        text: &str,
        fonts: &[FontAsset],
    ) -> CaptchaResult<()> {
        let count = text.chars().count();
        if count == 0 {
            return Err(CaptchaError::configuration(
                "text must not be empty, there is nothing to draw",
            ));
        }
        if fonts.is_empty() {
            return Err(CaptchaError::configuration("text needs at least one font"));
        }
        let (w, h) = self.dims();
        let slot = w / count as i32;

        let mut shaper = GlyphShaper::new();
        let mut runs = Vec::with_capacity(count);
        for (i, ch) in text.chars().enumerate() {
            let size = (h * (rng.below_i32(7)? + 7) / 16).max(1);
            let color = deep_color(rng)?;
            let font = rng.choose(fonts)?;
            let x = slot * i as i32 + slot / size;
            let y = h / 2 + size / 2 - rng.below_i32(h / 16 * 3)?;

            let run = shaper.shape_char(font, ch, size as f32)?;
            runs.push(PlacedRun {
                font: font.clone(),
                run,
                origin: (f64::from(x), f64::from(y)),
                color,
            });
        }
        crate::assets::shape::paint_runs(&mut self.pixels, &runs)
    }
}

impl Item for Canvas {
    fn mime_type(&self) -> &'static str {
        MIME_TYPE_IMAGE
    }

    fn encode(&self) -> CaptchaResult<Vec<u8>> {
        encode_rgba_png(&self.pixels)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
