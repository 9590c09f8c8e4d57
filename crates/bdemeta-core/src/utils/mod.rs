//! Utility functions and helpers.
//!
//! Common functionality used across multiple bdemeta crates.

pub mod path;

// Re-export commonly used utilities
pub use path::{is_c_source, normalize_path, utf8_path};
