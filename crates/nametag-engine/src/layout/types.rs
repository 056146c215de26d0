//! Layout data types for badge placement
//!
//! These types sit between the layout planner and the document assembler.
//! All physical values are millimeters with the origin at the top-left
//! corner of the page, matching how badges are read on paper.

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Where a single entry lands in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPosition {
    /// Zero-based page number
    pub page_index: usize,
    /// Index within the page, row-major
    pub cell_index: usize,
    pub grid_pos: GridPosition,
}

/// A rectangular area in millimeters, y growing downwards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Computed grid geometry for one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    /// Number of badge columns per page
    pub cols: usize,
    /// Number of badge rows per page
    pub rows: usize,
    /// Space between adjacent cells (0 in fixed mode, where cells absorb the slack)
    pub gap_mm: f32,
    pub cell_width_mm: f32,
    pub cell_height_mm: f32,
    /// Badge size for the reference template
    pub badge_width_mm: f32,
    pub badge_height_mm: f32,
    /// Fixed-size mode: every badge has the configured size
    pub fixed_size: bool,
}

impl LayoutPlan {
    /// Badges per page
    pub fn per_page(&self) -> usize {
        self.cols * self.rows
    }

    /// Horizontal space left in a cell around the reference badge
    pub fn slack_x_mm(&self) -> f32 {
        self.cell_width_mm - self.badge_width_mm
    }

    /// Vertical space left in a cell around the reference badge
    pub fn slack_y_mm(&self) -> f32 {
        self.cell_height_mm - self.badge_height_mm
    }

    /// Page count for a number of filled slots. Never zero.
    pub fn page_count(&self, slots: usize) -> usize {
        slots.div_ceil(self.per_page()).max(1)
    }

    /// Badge size for a template with the given aspect ratio.
    ///
    /// Fixed mode ignores the aspect; grid mode fits it inside the cell.
    pub fn badge_size_for(&self, aspect_ratio: f32) -> (f32, f32) {
        if self.fixed_size {
            (self.badge_width_mm, self.badge_height_mm)
        } else {
            fit_contain(self.cell_width_mm, self.cell_height_mm, aspect_ratio)
        }
    }
}

/// Largest size with the given aspect ratio that fits in `width` x `height`.
pub fn fit_contain(width: f32, height: f32, aspect_ratio: f32) -> (f32, f32) {
    let aspect = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        aspect_ratio
    } else {
        1.0
    };

    let mut fit_width = width;
    let mut fit_height = width / aspect;
    if fit_height > height {
        fit_height = height;
        fit_width = height * aspect;
    }
    (fit_width, fit_height)
}

/// A badge placed on the page
#[derive(Debug, Clone, PartialEq)]
pub struct BadgePlacement {
    /// Index of the entry in the run's queue
    pub entry_index: usize,
    pub slot: SlotPosition,
    /// Physical position and size of the badge image
    pub rect: Rect,
}
