pub mod assemble;
pub mod compose;
pub mod constants;
pub mod layout;
pub mod marks;
mod model;
mod options;
pub mod render;
pub mod role;
mod stats;
mod types;

pub use compose::{
    BatchListener, CancelToken, GenerationReport, ProgressFn, compose_document, generate,
    generate_pdf,
};
pub use model::*;
pub use options::*;
pub use render::FontBook;
pub use stats::{GenerationStatistics, calculate_page_count, calculate_statistics};
pub use types::*;
