//! Layout calculation modules for badge sheets
//!
//! This module handles all the geometric calculations:
//! - Grid layout (columns, rows, cell and badge dimensions)
//! - Entry placement (page, cell and physical rectangle per entry)

mod grid;
mod placement;
mod types;

pub use grid::*;
pub use placement::*;
pub use types::*;
