//! Grid layout calculation
//!
//! This module turns paper size, margins and sizing options into the
//! column/row grid and the badge size used for a whole run.

use crate::constants::FIXED_MODE_GAP_MM;
use crate::options::{ExportConfig, SizingMode};
use crate::types::{NametagError, Result};

use super::{GridPosition, LayoutPlan, Rect, fit_contain};

// =============================================================================
// Grid Creation
// =============================================================================

/// Create the layout plan for a run.
///
/// # Arguments
/// * `config` - Paper, margin and sizing options
/// * `reference_aspect` - Width/height of the template the grid is sized for
pub fn plan_layout(config: &ExportConfig, reference_aspect: f32) -> Result<LayoutPlan> {
    let (page_width_mm, page_height_mm) = config.paper.dimensions_mm();
    let margin_mm = config.margin_mm;

    let available_width = page_width_mm - 2.0 * margin_mm;
    let available_height = page_height_mm - 2.0 * margin_mm;
    if available_width <= 0.0 || available_height <= 0.0 {
        return Err(NametagError::Config(format!(
            "Margin of {}mm leaves no printable area",
            margin_mm
        )));
    }

    let plan = match config.sizing {
        SizingMode::Fixed {
            width_mm,
            height_mm,
        } => {
            let cols = fixed_count(available_width, width_mm);
            let rows = fixed_count(available_height, height_mm);

            if width_mm > available_width || height_mm > available_height {
                log::warn!(
                    "Badge size {}x{}mm exceeds the printable area {:.1}x{:.1}mm; badges will be clipped",
                    width_mm,
                    height_mm,
                    available_width,
                    available_height
                );
            }

            LayoutPlan {
                page_width_mm,
                page_height_mm,
                margin_mm,
                cols,
                rows,
                gap_mm: 0.0,
                cell_width_mm: available_width / cols as f32,
                cell_height_mm: available_height / rows as f32,
                badge_width_mm: width_mm,
                badge_height_mm: height_mm,
                fixed_size: true,
            }
        }
        SizingMode::Grid { preset, gap_mm } => {
            let (cols, rows) = preset.dimensions();
            let content_width = available_width - (cols - 1) as f32 * gap_mm;
            let content_height = available_height - (rows - 1) as f32 * gap_mm;
            if content_width <= 0.0 || content_height <= 0.0 {
                return Err(NametagError::Config(format!(
                    "Grid gap of {}mm leaves no room for a {} grid",
                    gap_mm,
                    preset.label()
                )));
            }

            let cell_width_mm = content_width / cols as f32;
            let cell_height_mm = content_height / rows as f32;
            let (badge_width_mm, badge_height_mm) =
                fit_contain(cell_width_mm, cell_height_mm, reference_aspect);

            LayoutPlan {
                page_width_mm,
                page_height_mm,
                margin_mm,
                cols,
                rows,
                gap_mm,
                cell_width_mm,
                cell_height_mm,
                badge_width_mm,
                badge_height_mm,
                fixed_size: false,
            }
        }
    };

    Ok(plan)
}

/// How many fixed-size badges fit along one axis. Always at least one.
fn fixed_count(available_mm: f32, badge_mm: f32) -> usize {
    let fit = ((available_mm + FIXED_MODE_GAP_MM) / (badge_mm + FIXED_MODE_GAP_MM)).floor();
    if fit.is_finite() && fit >= 1.0 {
        fit as usize
    } else {
        1
    }
}

// =============================================================================
// Cell Calculations
// =============================================================================

/// Calculate the bounds of a cell at the given grid position.
pub fn cell_bounds(plan: &LayoutPlan, pos: GridPosition) -> Rect {
    let x = plan.margin_mm + pos.col as f32 * (plan.cell_width_mm + plan.gap_mm);
    let y = plan.margin_mm + pos.row as f32 * (plan.cell_height_mm + plan.gap_mm);
    Rect::new(x, y, plan.cell_width_mm, plan.cell_height_mm)
}

/// Bounds of a badge of the given size centered in its cell.
pub fn badge_bounds(plan: &LayoutPlan, pos: GridPosition, badge_size: (f32, f32)) -> Rect {
    let cell = cell_bounds(plan, pos);
    let (width, height) = badge_size;
    Rect::new(
        cell.x + (cell.width - width) / 2.0,
        cell.y + (cell.height - height) / 2.0,
        width,
        height,
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LAYOUT_EPSILON;
    use crate::options::{GridPreset, PaperSize};

    fn grid_config(preset: GridPreset, gap_mm: f32) -> ExportConfig {
        ExportConfig {
            paper: PaperSize::A4,
            margin_mm: 10.0,
            sizing: SizingMode::Grid { preset, gap_mm },
            ..Default::default()
        }
    }

    fn fixed_config(width_mm: f32, height_mm: f32) -> ExportConfig {
        ExportConfig {
            paper: PaperSize::A4,
            margin_mm: 10.0,
            sizing: SizingMode::Fixed {
                width_mm,
                height_mm,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_grid_two_by_two() {
        let plan = plan_layout(&grid_config(GridPreset::TwoByTwo, 0.0), 1.0).unwrap();

        assert_eq!(plan.cols, 2);
        assert_eq!(plan.rows, 2);
        assert_eq!(plan.per_page(), 4);
        assert!((plan.cell_width_mm - 95.0).abs() < LAYOUT_EPSILON);
        assert!((plan.cell_height_mm - 138.5).abs() < LAYOUT_EPSILON);
        // Square template is limited by the cell width
        assert!((plan.badge_width_mm - 95.0).abs() < LAYOUT_EPSILON);
        assert!((plan.badge_height_mm - 95.0).abs() < LAYOUT_EPSILON);
    }

    #[test]
    fn test_grid_gap_reduces_cells() {
        let plan = plan_layout(&grid_config(GridPreset::TwoByThree, 7.0), 400.0 / 240.0).unwrap();

        // (190 - 7) / 2 and (277 - 14) / 3
        assert!((plan.cell_width_mm - 91.5).abs() < LAYOUT_EPSILON);
        assert!((plan.cell_height_mm - 87.666_664).abs() < LAYOUT_EPSILON);
        assert!((plan.badge_width_mm / plan.badge_height_mm - 400.0 / 240.0).abs() < LAYOUT_EPSILON);
    }

    #[test]
    fn test_grid_tall_template_limited_by_height() {
        let plan = plan_layout(&grid_config(GridPreset::ThreeByThree, 0.0), 0.25).unwrap();

        assert!((plan.badge_height_mm - plan.cell_height_mm).abs() < LAYOUT_EPSILON);
        assert!(plan.badge_width_mm < plan.cell_width_mm);
        assert!((plan.badge_width_mm / plan.badge_height_mm - 0.25).abs() < LAYOUT_EPSILON);
    }

    #[test]
    fn test_grid_gap_too_large() {
        let result = plan_layout(&grid_config(GridPreset::ThreeByThree, 100.0), 1.0);
        assert!(matches!(result, Err(NametagError::Config(_))));
    }

    #[test]
    fn test_fixed_mode_counts() {
        // 190mm wide: floor(192 / 92) = 2; 277mm high: floor(279 / 57) = 4
        let plan = plan_layout(&fixed_config(90.0, 55.0), 1.0).unwrap();

        assert_eq!(plan.cols, 2);
        assert_eq!(plan.rows, 4);
        assert_eq!(plan.gap_mm, 0.0);
        assert!((plan.cell_width_mm - 95.0).abs() < LAYOUT_EPSILON);
        assert!((plan.cell_height_mm - 69.25).abs() < LAYOUT_EPSILON);
        assert_eq!(plan.badge_width_mm, 90.0);
        assert_eq!(plan.badge_height_mm, 55.0);
    }

    #[test]
    fn test_fixed_mode_ignores_template_aspect() {
        let plan = plan_layout(&fixed_config(90.0, 55.0), 3.0).unwrap();
        assert_eq!(plan.badge_size_for(0.5), (90.0, 55.0));
    }

    #[test]
    fn test_fixed_mode_oversized_badge_degrades_to_single_cell() {
        let plan = plan_layout(&fixed_config(500.0, 400.0), 1.0).unwrap();

        assert_eq!(plan.cols, 1);
        assert_eq!(plan.rows, 1);
        assert_eq!(plan.badge_width_mm, 500.0);
    }

    #[test]
    fn test_grid_invariant_holds_for_all_presets() {
        let presets = [
            GridPreset::TwoByTwo,
            GridPreset::TwoByThree,
            GridPreset::ThreeByThree,
            GridPreset::TwoByFour,
        ];
        let aspects = [0.3, 0.75, 1.0, 400.0 / 240.0, 4.0];

        for paper in [PaperSize::A4, PaperSize::Letter] {
            for preset in presets {
                for gap in [0.0, 2.5, 7.0] {
                    for aspect in aspects {
                        let mut config = grid_config(preset, gap);
                        config.paper = paper;
                        let plan = plan_layout(&config, aspect).unwrap();
                        assert!(plan.cols >= 1 && plan.rows >= 1);
                        assert!(plan.badge_width_mm <= plan.cell_width_mm + LAYOUT_EPSILON);
                        assert!(plan.badge_height_mm <= plan.cell_height_mm + LAYOUT_EPSILON);
                        let ratio = plan.badge_width_mm / plan.badge_height_mm;
                        assert!((ratio - aspect).abs() / aspect < 1e-4);
                    }
                }
            }
        }

        for paper in [PaperSize::A4, PaperSize::Letter] {
            for (w, h) in [(90.0, 55.0), (85.0, 54.0), (60.0, 100.0), (190.0, 277.0)] {
                let mut config = fixed_config(w, h);
                config.paper = paper;
                let plan = plan_layout(&config, 1.0).unwrap();
                assert!(plan.cols >= 1 && plan.rows >= 1);
                if w <= 190.0 && h <= 259.4 {
                    assert!(plan.badge_width_mm <= plan.cell_width_mm + LAYOUT_EPSILON);
                    assert!(plan.badge_height_mm <= plan.cell_height_mm + LAYOUT_EPSILON);
                }
            }
        }
    }

    #[test]
    fn test_cell_bounds_include_gap() {
        let plan = plan_layout(&grid_config(GridPreset::TwoByTwo, 10.0), 1.0).unwrap();

        let first = cell_bounds(&plan, GridPosition::new(0, 0));
        assert_eq!(first.x, 10.0);
        assert_eq!(first.y, 10.0);

        let second = cell_bounds(&plan, GridPosition::new(1, 1));
        assert!((second.x - (10.0 + plan.cell_width_mm + 10.0)).abs() < LAYOUT_EPSILON);
        assert!((second.y - (10.0 + plan.cell_height_mm + 10.0)).abs() < LAYOUT_EPSILON);
    }

    #[test]
    fn test_badge_centered_in_cell() {
        let plan = plan_layout(&fixed_config(90.0, 55.0), 1.0).unwrap();
        let cell = cell_bounds(&plan, GridPosition::new(0, 1));
        let badge = badge_bounds(&plan, GridPosition::new(0, 1), (90.0, 55.0));

        assert!((badge.center_x() - cell.center_x()).abs() < LAYOUT_EPSILON);
        assert!((badge.center_y() - cell.center_y()).abs() < LAYOUT_EPSILON);
    }
}
