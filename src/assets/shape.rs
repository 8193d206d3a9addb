use std::{borrow::Cow, collections::HashMap};

use crate::{
    assets::store::FontAsset,
    foundation::{
        core::Rgba8,
        error::{CaptchaError, CaptchaResult},
    },
};

/// One character shaped at a given size, with glyph positions relative to its baseline origin.
#[derive(Clone, Debug)]
pub(crate) struct ShapedRun {
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
    pub(crate) font_size: f32,
}

/// A shaped run placed on the canvas: pen origin (baseline-left) plus fill color.
#[derive(Clone, Debug)]
pub(crate) struct PlacedRun {
    pub(crate) font: FontAsset,
    pub(crate) run: ShapedRun,
    pub(crate) origin: (f64, f64),
    pub(crate) color: Rgba8,
}

/// Stateful helper for shaping single characters through Parley.
///
/// Fonts are registered with the internal font context the first time they are used and
/// remembered by asset name afterwards.
pub(crate) struct GlyphShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    families: HashMap<String, String>,
}

impl Default for GlyphShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphShaper {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &FontAsset) -> CaptchaResult<String> {
        if let Some(family) = self.families.get(font.name()) {
            return Ok(family.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::new(font.bytes().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CaptchaError::configuration(format!("font '{}' registers no families", font.name()))
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                CaptchaError::configuration(format!("font '{}' family has no name", font.name()))
            })?
            .to_string();

        self.families.insert(font.name().to_string(), family.clone());
        Ok(family)
    }

    /// Shape `ch` in `font` at `size_px` pixels.
    pub(crate) fn shape_char(
        &mut self,
        font: &FontAsset,
        ch: char,
        size_px: f32,
    ) -> CaptchaResult<ShapedRun> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CaptchaError::configuration("glyph size must be finite and > 0"));
        }

        let family = self.family_for(font)?;
        let mut buf = [0u8; 4];
        let text: &str = ch.encode_utf8(&mut buf);

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let baseline = run.baseline();
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y - baseline,
                }));
            }
        }

        Ok(ShapedRun {
            glyphs,
            font_size: size_px,
        })
    }
}

/// Rasterize `runs` and composite them source-over onto `img`.
pub(crate) fn paint_runs(img: &mut image::RgbaImage, runs: &[PlacedRun]) -> CaptchaResult<()> {
    if runs.is_empty() {
        return Ok(());
    }
    let (width, height) = img.dimensions();
    let w: u16 = width
        .try_into()
        .map_err(|_| CaptchaError::configuration("canvas width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CaptchaError::configuration("canvas height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    for placed in runs {
        if placed.run.glyphs.is_empty() {
            continue;
        }
        let c = placed.color;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate(placed.origin));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        ctx.glyph_run(placed.font.render_data())
            .font_size(placed.run.font_size)
            .fill_glyphs(placed.run.glyphs.iter().copied());
    }

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    for (dst, src) in img
        .pixels_mut()
        .zip(pixmap.data_as_u8_slice().chunks_exact(4))
    {
        let sa = u16::from(src[3]);
        if sa == 0 {
            continue;
        }
        let under = Rgba8 {
            r: dst.0[0],
            g: dst.0[1],
            b: dst.0[2],
            a: dst.0[3],
        }
        .to_premul();
        let mut out = [0u8; 4];
        for i in 0..4 {
            let blended = u16::from(src[i]) + (u16::from(under[i]) * (255 - sa) + 127) / 255;
            out[i] = blended.min(255) as u8;
        }
        dst.0 = Rgba8::from_premul(out).to_array();
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/shape.rs"]
mod tests;
