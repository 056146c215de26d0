//! Entry placement
//!
//! Maps the linear position of an entry in the run to a page, a cell and
//! a physical rectangle.

use super::{BadgePlacement, GridPosition, LayoutPlan, SlotPosition, badge_bounds};

/// Slot for the entry at `index`, filling pages row by row.
pub fn slot_for_index(index: usize, cols: usize, per_page: usize) -> SlotPosition {
    let cols = cols.max(1);
    let per_page = per_page.max(1);
    let cell_index = index % per_page;
    SlotPosition {
        page_index: index / per_page,
        cell_index,
        grid_pos: GridPosition::new(cell_index / cols, cell_index % cols),
    }
}

/// Full placement for the entry at `index` rendered with a template of the given aspect ratio.
pub fn place_entry(plan: &LayoutPlan, index: usize, aspect_ratio: f32) -> BadgePlacement {
    let slot = slot_for_index(index, plan.cols, plan.per_page());
    let rect = badge_bounds(plan, slot.grid_pos, plan.badge_size_for(aspect_ratio));
    BadgePlacement {
        entry_index: index,
        slot,
        rect,
    }
}
