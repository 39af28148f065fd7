//! Utility functions for terminal output formatting.

pub mod format;

pub use format::{fit_column, format_place, format_points};
