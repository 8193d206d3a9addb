use std::io::Cursor;

use crate::foundation::{
    core::Rgba8,
    error::{CaptchaError, CaptchaResult},
};

/// Encode a straight-alpha RGBA image as a true-color PNG.
pub(crate) fn encode_rgba_png(img: &image::RgbaImage) -> CaptchaResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CaptchaError::encode(format!("png encode failed: {e}")))?;
    Ok(buf)
}

/// Encode one palette index per pixel as an indexed-color PNG with a `tRNS` alpha table.
pub(crate) fn encode_indexed_png(
    width: u32,
    height: u32,
    palette: &[Rgba8],
    indices: &[u8],
) -> CaptchaResult<Vec<u8>> {
    if indices.len() != width as usize * height as usize {
        return Err(CaptchaError::encode(format!(
            "indexed buffer holds {} pixels, expected {width}x{height}",
            indices.len()
        )));
    }
    if palette.is_empty() || palette.len() > 256 {
        return Err(CaptchaError::encode(format!(
            "palette must hold 1..=256 entries, got {}",
            palette.len()
        )));
    }

    let rgb: Vec<u8> = palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    let alpha: Vec<u8> = palette.iter().map(|c| c.a).collect();

    let png_err = |e: png::EncodingError| CaptchaError::encode(format!("png encode failed: {e}"));
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(rgb);
        encoder.set_trns(alpha);
        let mut writer = encoder.write_header().map_err(png_err)?;
        writer.write_image_data(indices).map_err(png_err)?;
        writer.finish().map_err(png_err)?;
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
