//! Shared constants for badge generation
//!
//! This module centralizes magic numbers used by the layout planner,
//! the rasterizer and the document assembler.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Layout
// =============================================================================

/// Default spacing between grid cells (mm)
pub const DEFAULT_GRID_GAP_MM: f32 = 7.0;

/// Spacing between badges in fixed-size mode (mm)
pub const FIXED_MODE_GAP_MM: f32 = 2.0;

/// Tolerance used when comparing physical dimensions
pub const LAYOUT_EPSILON: f32 = 1e-3;

// =============================================================================
// Rasterization
// =============================================================================

/// Reference width of a badge raster, before supersampling
pub const RENDER_WIDTH: f32 = 400.0;

/// Supersampling factor applied to the reference width
pub const RENDER_SCALE: f32 = 2.0;

/// JPEG quality for embedded badge images
pub const JPEG_QUALITY: u8 = 85;

// =============================================================================
// Batch Processing
// =============================================================================

/// Number of badges processed between batch boundaries
pub const BATCH_SIZE: usize = 20;

/// Default maximum roster size per run
pub const DEFAULT_MAX_ENTRIES: usize = 300;

/// Absolute ceiling on the roster size, regardless of configuration
pub const MAX_ENTRIES_LIMIT: usize = 1000;

/// Most blank badges one run may append
pub const MAX_BLANK_ENTRIES: usize = 100;

// =============================================================================
// Templates and Roles
// =============================================================================

/// Identifier of the procedurally drawn template
pub const DEFAULT_TEMPLATE_ID: &str = "default-template";

/// Role-mapping key used for entries whose role column is empty
pub const NO_ROLE_KEY: &str = "__no_role__";

// =============================================================================
// Watermark
// =============================================================================

/// Font size of watermark text (points)
pub const WATERMARK_FONT_SIZE: f32 = 40.0;

/// Horizontal distance between watermark repetitions (points)
pub const WATERMARK_X_STEP: f32 = 200.0;

/// Vertical distance between watermark repetitions (points)
pub const WATERMARK_Y_STEP: f32 = 150.0;

/// Grey level of watermark text (0 = black, 1 = white)
pub const WATERMARK_GREY: f32 = 0.8;

// =============================================================================
// Crop Marks
// =============================================================================

/// Line width for crop marks (points)
pub const CROP_MARK_WIDTH: f32 = 0.25;

/// Length of crop marks (points)
pub const CROP_MARK_LENGTH: f32 = 8.0;

/// Gap between crop mark and badge edge (points)
pub const CROP_MARK_GAP: f32 = 2.0;
