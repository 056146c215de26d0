//! Procedural drawing of the built-in template
//!
//! All geometry is computed in reference units (the badge is
//! [`RENDER_WIDTH`](crate::constants::RENDER_WIDTH) wide) and scaled onto
//! the canvas with a single transform.

use super::fonts::FontBook;
use super::text::draw_text_centered;
use crate::model::{DefaultTemplateConfig, FontWeight};
use crate::types::Rgb;
use tiny_skia::{
    FillRule, GradientStop, LineCap, LinearGradient, Paint, Path, PathBuilder, Pixmap, Point,
    Rect, SpreadMode, Stroke, Transform,
};

const BACKGROUND_TOP: Rgb = Rgb::new(0xf8, 0xfa, 0xfc);
const BACKGROUND_BOTTOM: Rgb = Rgb::new(0xe2, 0xe8, 0xf0);
const CARD_BORDER: Rgb = Rgb::new(0xcb, 0xd5, 0xe1);
const DIVIDER: Rgb = Rgb::new(0xe2, 0xe8, 0xf0);
const FOOTER_TEXT: Rgb = Rgb::new(0x94, 0xa3, 0xb8);

const BORDER_WIDTH: f32 = 2.0;
const LABEL_FAMILY: &str = "Pretendard";

/// Cubic approximation constant for quarter circles
const KAPPA: f32 = 0.552_284_8;

/// Card geometry in reference units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub header_height: f32,
    pub divider_y: f32,
}

impl CardGeometry {
    pub fn new(width: f32, height: f32, header_height_pct: f32) -> Self {
        let padding = width.min(height) * 0.03;
        let card_width = width - padding * 2.0;
        let card_height = height - padding * 2.0;
        Self {
            x: padding,
            y: padding,
            width: card_width,
            height: card_height,
            radius: card_width.min(card_height) * 0.05,
            header_height: card_height * header_height_pct.clamp(0.0, 100.0) / 100.0,
            divider_y: padding + card_height - card_height * 0.18,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Draw the built-in card onto an empty canvas.
///
/// `scale` maps reference units to canvas pixels. `header_color` overrides
/// the design's header color, used for role colors.
pub fn draw_builtin(
    canvas: &mut Pixmap,
    design: &DefaultTemplateConfig,
    header_color: Option<Rgb>,
    fonts: &FontBook,
    scale: f32,
) {
    let width = canvas.width() as f32 / scale;
    let height = canvas.height() as f32 / scale;
    let transform = Transform::from_scale(scale, scale);
    let card = CardGeometry::new(width, height, design.header_height_pct);

    // Background gradient
    if let Some(rect) = Rect::from_xywh(0.0, 0.0, width, height) {
        let mut paint = Paint::default();
        paint.anti_alias = true;
        match LinearGradient::new(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(width, height),
            vec![
                GradientStop::new(0.0, BACKGROUND_TOP.to_skia()),
                GradientStop::new(1.0, BACKGROUND_BOTTOM.to_skia()),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        ) {
            Some(shader) => paint.shader = shader,
            None => paint.set_color(BACKGROUND_TOP.to_skia()),
        }
        canvas.fill_rect(rect, &paint, transform, None);
    }

    // Card body and border
    if let Some(path) = rounded_rect(card.x, card.y, card.width, card.height, card.radius, card.radius) {
        canvas.fill_path(&path, &solid(Rgb::WHITE), FillRule::Winding, transform, None);
        let stroke = Stroke {
            width: BORDER_WIDTH,
            ..Stroke::default()
        };
        canvas.stroke_path(&path, &solid(CARD_BORDER), &stroke, transform, None);
    }

    // Header band, rounded on top only
    let header = header_color.unwrap_or(design.header_color);
    let header_radius = card.radius.min(card.header_height);
    if let Some(path) = rounded_rect(card.x, card.y, card.width, card.header_height, header_radius, 0.0) {
        canvas.fill_path(&path, &solid(header), FillRule::Winding, transform, None);
    }

    // Footer divider
    let mut builder = PathBuilder::new();
    builder.move_to(card.x + card.width * 0.1, card.divider_y);
    builder.line_to(card.x + card.width * 0.9, card.divider_y);
    if let Some(path) = builder.finish() {
        let stroke = Stroke {
            width: BORDER_WIDTH,
            line_cap: LineCap::Butt,
            ..Stroke::default()
        };
        canvas.stroke_path(&path, &solid(DIVIDER), &stroke, transform, None);
    }

    let header_font_size = (card.width * 0.08).min(card.header_height * 0.5);
    if let Some(font) = fonts.resolve(LABEL_FAMILY, FontWeight::Bold) {
        draw_text_centered(
            canvas,
            font,
            &design.header_text,
            header_font_size * scale,
            card.center_x() * scale,
            (card.y + card.header_height / 2.0) * scale,
            Rgb::WHITE,
        );
    }

    let footer_font_size = (card.width * 0.045).min(12.0);
    if let Some(font) = fonts.resolve(LABEL_FAMILY, FontWeight::Normal) {
        draw_text_centered(
            canvas,
            font,
            &design.footer_text,
            footer_font_size * scale,
            card.center_x() * scale,
            (card.divider_y + card.height * 0.08) * scale,
            FOOTER_TEXT,
        );
    }
}

fn solid(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

/// Rectangle with separate radii for the top and bottom corners.
fn rounded_rect(x: f32, y: f32, w: f32, h: f32, top: f32, bottom: f32) -> Option<Path> {
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let limit = (w / 2.0).min(h / 2.0);
    let top = top.clamp(0.0, limit);
    let bottom = bottom.clamp(0.0, limit);
    let (right, base) = (x + w, y + h);

    let mut pb = PathBuilder::new();
    pb.move_to(x + top, y);
    pb.line_to(right - top, y);
    if top > 0.0 {
        pb.cubic_to(right - top + top * KAPPA, y, right, y + top - top * KAPPA, right, y + top);
    }
    pb.line_to(right, base - bottom);
    if bottom > 0.0 {
        pb.cubic_to(
            right,
            base - bottom + bottom * KAPPA,
            right - bottom + bottom * KAPPA,
            base,
            right - bottom,
            base,
        );
    }
    pb.line_to(x + bottom, base);
    if bottom > 0.0 {
        pb.cubic_to(
            x + bottom - bottom * KAPPA,
            base,
            x,
            base - bottom + bottom * KAPPA,
            x,
            base - bottom,
        );
    }
    pb.line_to(x, y + top);
    if top > 0.0 {
        pb.cubic_to(x, y + top - top * KAPPA, x + top - top * KAPPA, y, x + top, y);
    }
    pb.close();
    pb.finish()
}
