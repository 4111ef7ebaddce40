//! Reporting utilities: run summaries, text matrices, and cell captions.

pub mod format;

pub use format::{cell_caption, format_matrix, format_run_summary, month_name};
