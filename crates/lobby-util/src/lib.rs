pub mod export;
pub mod render;

pub use crate::export::{save_csv, write_csv, ExportError, DEFAULT_CSV_FILE};
pub use crate::render::render_table;
