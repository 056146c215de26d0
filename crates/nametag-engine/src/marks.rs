//! Page decorations: crop marks and watermark
//!
//! These functions produce PDF content stream operations. All coordinates
//! are PDF points with the origin at the bottom-left of the page.

use crate::constants::{
    CROP_MARK_GAP, CROP_MARK_LENGTH, CROP_MARK_WIDTH, WATERMARK_FONT_SIZE, WATERMARK_GREY,
    WATERMARK_X_STEP, WATERMARK_Y_STEP,
};

/// First watermark column (points from the left edge)
const WATERMARK_START_X: f32 = 50.0;

/// First watermark row (points from the bottom edge)
const WATERMARK_START_Y: f32 = 100.0;

/// Bounds of a placed badge, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl MarkBounds {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// L-shaped trim marks outside each corner of every badge.
pub fn generate_crop_marks(badges: &[MarkBounds]) -> String {
    if badges.is_empty() {
        return String::new();
    }

    let mut ops = String::new();
    ops.push_str("q\n");
    ops.push_str("0 0 0 RG\n");
    ops.push_str(&format!("{} w\n", CROP_MARK_WIDTH));
    ops.push_str("[] 0 d\n");

    for badge in badges {
        let (left, bottom, right, top) = (badge.x, badge.y, badge.right(), badge.top());
        for (x, y, dx, dy) in [
            (left, top, -1.0, 1.0),
            (right, top, 1.0, 1.0),
            (left, bottom, -1.0, -1.0),
            (right, bottom, 1.0, -1.0),
        ] {
            // Horizontal arm, then vertical arm
            ops.push_str(&line(
                x + dx * CROP_MARK_GAP,
                y,
                x + dx * (CROP_MARK_GAP + CROP_MARK_LENGTH),
                y,
            ));
            ops.push_str(&line(
                x,
                y + dy * CROP_MARK_GAP,
                x,
                y + dy * (CROP_MARK_GAP + CROP_MARK_LENGTH),
            ));
        }
    }

    ops.push_str("Q\n");
    ops
}

fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> String {
    format!("{} {} m {} {} l S\n", x1, y1, x2, y2)
}

/// Light grey text repeated in a grid over the whole page.
///
/// `font_resource` is the page resource name of a Type1 font (e.g. `F1`).
pub fn generate_watermark(
    text: &str,
    page_width_pt: f32,
    page_height_pt: f32,
    font_resource: &str,
) -> String {
    let literal = pdf_literal(text);
    if literal.is_empty() {
        return String::new();
    }

    let mut ops = String::new();
    ops.push_str("q\n");
    ops.push_str(&format!("{g} {g} {g} rg\n", g = WATERMARK_GREY));

    let mut y = WATERMARK_START_Y;
    while y < page_height_pt {
        let mut x = WATERMARK_START_X;
        while x < page_width_pt {
            ops.push_str(&format!(
                "BT /{} {} Tf {} {} Td ({}) Tj ET\n",
                font_resource, WATERMARK_FONT_SIZE, x, y, literal
            ));
            x += WATERMARK_X_STEP;
        }
        y += WATERMARK_Y_STEP;
    }

    ops.push_str("Q\n");
    ops
}

/// Characters of `text` a standard WinAnsi font cannot show.
pub fn unencodable_chars(text: &str) -> usize {
    text.chars().filter(|&c| !is_winansi(c) && !c.is_control()).count()
}

fn is_winansi(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\u{a0}'..='\u{ff}')
}

/// Escape text for a PDF literal string in a WinAnsi-encoded font.
///
/// Characters outside Latin-1 cannot be shown by the standard fonts and
/// are replaced with `?`.
fn pdf_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", ch as u32)),
            c if c.is_control() => {}
            _ => out.push('?'),
        }
    }
    out
}
