//! Utility functions for cell and table formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{cell_text, render_table};
