//! Badge rasterization
//!
//! Every badge is drawn at a fixed reference width ([`RENDER_WIDTH`]),
//! supersampled by [`RENDER_SCALE`], with a height matching the physical
//! badge shape so the raster never gets distorted on the page.
//!
//! - Built-in template: drawn procedurally (see [`builtin`])
//! - Image template: decoded and stretched to the raster size
//! - Text: every configured field, or the legacy single line when none are set

mod builtin;
mod fonts;
mod text;

pub use builtin::CardGeometry;
pub use fonts::FontBook;
pub use text::{draw_text_centered, measure_text};

use crate::constants::{JPEG_QUALITY, RENDER_SCALE, RENDER_WIDTH};
use crate::model::{
    DefaultTemplateConfig, RosterEntry, Template, TemplateSource, TextConfig, TextFieldSpec,
    TextStyle,
};
use crate::types::{RenderError, Rgb};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{Rgb as Pixel, RgbImage};
use tiny_skia::Pixmap;

/// Text shown by the legacy single-line mode when an entry has no data
const LEGACY_PLACEHOLDER: &str = "Name";

/// Grey used for badges whose template could not be drawn at all
const PLACEHOLDER_FILL: Rgb = Rgb::new(0xf1, 0xf5, 0xf9);

/// Read-only inputs shared by every badge of a run
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub text_fields: &'a [TextFieldSpec],
    pub legacy_text: &'a TextConfig,
    pub design: &'a DefaultTemplateConfig,
    pub fonts: &'a FontBook,
}

/// One rasterized badge
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNametag {
    pub image: RgbImage,
}

impl RenderedNametag {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Flat placeholder used when even the template cannot be drawn.
    pub fn placeholder(width: u32, height: u32) -> Self {
        let fill = Pixel([PLACEHOLDER_FILL.r, PLACEHOLDER_FILL.g, PLACEHOLDER_FILL.b]);
        Self {
            image: RgbImage::from_pixel(width.max(1), height.max(1), fill),
        }
    }

    /// Encode as baseline JPEG for embedding in the document.
    pub fn encode_jpeg(&self) -> Result<Vec<u8>, RenderError> {
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
            .encode_image(&self.image)
            .map_err(RenderError::Encode)?;
        Ok(buffer)
    }
}

/// Raster size in pixels for a badge of the given physical size.
pub fn raster_size(badge_width_mm: f32, badge_height_mm: f32) -> Result<(u32, u32), RenderError> {
    let ratio = badge_height_mm / badge_width_mm;
    let width = (RENDER_WIDTH * RENDER_SCALE).round();
    let height = (RENDER_WIDTH * ratio * RENDER_SCALE).round();
    if !ratio.is_finite() || ratio <= 0.0 || height < 1.0 {
        return Err(RenderError::InvalidDimensions {
            width: width as u32,
            height: if height.is_finite() { height.max(0.0) as u32 } else { 0 },
        });
    }
    Ok((width as u32, height as u32))
}

/// Render a complete badge: template plus the entry's text.
///
/// `badge_size_mm` is the physical size the badge will be placed at.
/// `header_color` only affects the built-in template.
pub fn render_nametag(
    entry: &RosterEntry,
    template: &Template,
    header_color: Option<Rgb>,
    badge_size_mm: (f32, f32),
    ctx: &RenderContext<'_>,
) -> Result<RenderedNametag, RenderError> {
    let mut canvas = draw_template(template, header_color, badge_size_mm, ctx)?;
    let scale = canvas.width() as f32 / RENDER_WIDTH;

    if ctx.text_fields.is_empty() {
        let name = entry
            .first_value()
            .filter(|value| !value.is_empty())
            .unwrap_or(LEGACY_PLACEHOLDER);
        let position = ctx.legacy_text.position;
        draw_line(&mut canvas, ctx.fonts, &ctx.legacy_text.style, name, position.x, position.y, scale);
    } else {
        for field in ctx.text_fields {
            let value = entry.value(&field.column);
            if value.is_empty() {
                continue;
            }
            let position = field.position;
            draw_line(&mut canvas, ctx.fonts, &field.style, value, position.x, position.y, scale);
        }
    }

    Ok(finish(&canvas))
}

/// Render only the template, without any entry text.
pub fn render_template_only(
    template: &Template,
    header_color: Option<Rgb>,
    badge_size_mm: (f32, f32),
    ctx: &RenderContext<'_>,
) -> Result<RenderedNametag, RenderError> {
    let canvas = draw_template(template, header_color, badge_size_mm, ctx)?;
    Ok(finish(&canvas))
}

fn draw_template(
    template: &Template,
    header_color: Option<Rgb>,
    badge_size_mm: (f32, f32),
    ctx: &RenderContext<'_>,
) -> Result<Pixmap, RenderError> {
    let (width, height) = raster_size(badge_size_mm.0, badge_size_mm.1)?;
    let mut canvas =
        Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;

    match &template.source {
        TemplateSource::BuiltIn => {
            builtin::draw_builtin(
                &mut canvas,
                ctx.design,
                header_color,
                ctx.fonts,
                width as f32 / RENDER_WIDTH,
            );
        }
        TemplateSource::Image(bytes) => {
            if bytes.is_empty() {
                return Err(RenderError::MissingImage(template.id.clone()));
            }
            let decoded = image::load_from_memory(bytes)?.to_rgba8();
            let stretched = image::imageops::resize(&decoded, width, height, FilterType::Triangle);
            // Flatten onto white so the canvas stays opaque
            for (dst, src) in canvas.data_mut().chunks_exact_mut(4).zip(stretched.pixels()) {
                let alpha = src[3] as u32;
                for channel in 0..3 {
                    let blended = src[channel] as u32 * alpha + 255 * (255 - alpha);
                    dst[channel] = ((blended + 127) / 255) as u8;
                }
                dst[3] = 255;
            }
        }
    }

    Ok(canvas)
}

fn draw_line(
    canvas: &mut Pixmap,
    fonts: &FontBook,
    style: &TextStyle,
    text: &str,
    x_pct: f32,
    y_pct: f32,
    scale: f32,
) {
    let Some(font) = fonts.resolve(&style.font_family, style.font_weight) else {
        log::debug!("No font for '{}', skipping text", style.font_family);
        return;
    };
    let center_x = canvas.width() as f32 * x_pct / 100.0;
    let center_y = canvas.height() as f32 * y_pct / 100.0;
    draw_text_centered(canvas, font, text, style.font_size * scale, center_x, center_y, style.color);
}

/// Drop the alpha channel. The canvas is opaque, so premultiplied and
/// straight color agree.
fn finish(canvas: &Pixmap) -> RenderedNametag {
    let rgb: Vec<u8> = canvas
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let image = RgbImage::from_raw(canvas.width(), canvas.height(), rgb)
        .unwrap_or_else(|| RgbImage::new(canvas.width(), canvas.height()));
    RenderedNametag { image }
}
