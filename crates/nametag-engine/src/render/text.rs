//! Centered single-line text drawn straight into the badge canvas

use crate::types::Rgb;
use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::Pixmap;

/// Horizontal advance of `text` at `px_size`, kerning included.
pub fn measure_text(font: &FontArc, text: &str, px_size: f32) -> f32 {
    layout_line(font, text, px_size)
        .last()
        .map(|&(id, x)| x + font.as_scaled(PxScale::from(px_size)).h_advance(id))
        .unwrap_or(0.0)
}

/// Draw one line of text with its visual middle at (`center_x`, `center_y`).
///
/// Coordinates are canvas pixels. The canvas must be opaque.
pub fn draw_text_centered(
    canvas: &mut Pixmap,
    font: &FontArc,
    text: &str,
    px_size: f32,
    center_x: f32,
    center_y: f32,
    color: Rgb,
) {
    if text.is_empty() || !(px_size.is_finite() && px_size > 0.0) {
        return;
    }

    let scaled = font.as_scaled(PxScale::from(px_size));
    let width = measure_text(font, text, px_size);
    let origin_x = center_x - width / 2.0;
    // descent is negative
    let baseline = center_y + (scaled.ascent() + scaled.descent()) / 2.0;

    let canvas_width = canvas.width() as i32;
    let canvas_height = canvas.height() as i32;
    let pixels = canvas.data_mut();

    for (id, x) in layout_line(font, text, px_size) {
        let glyph = id.with_scale_and_position(px_size, point(origin_x + x, baseline));
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i32 + gx as i32;
            let y = bounds.min.y as i32 + gy as i32;
            if x < 0 || y < 0 || x >= canvas_width || y >= canvas_height {
                return;
            }
            let idx = (y as usize * canvas_width as usize + x as usize) * 4;
            blend(&mut pixels[idx..idx + 3], color, coverage);
        });
    }
}

fn layout_line(font: &FontArc, text: &str, px_size: f32) -> Vec<(GlyphId, f32)> {
    let scaled = font.as_scaled(PxScale::from(px_size));
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = 0.0f32;
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars().filter(|c| !c.is_control()) {
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push((id, caret));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    glyphs
}

fn blend(pixel: &mut [u8], color: Rgb, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0);
    for (channel, source) in pixel.iter_mut().zip([color.r, color.g, color.b]) {
        let dst = *channel as f32;
        *channel = (dst + (source as f32 - dst) * alpha).round() as u8;
    }
}
