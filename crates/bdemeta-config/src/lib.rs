//! Configuration loading for bdemeta
//!
//! This crate handles parsing and validation of bdemeta.toml and bdemeta.json
//! files, and layers environment and command line roots on top of them to
//! produce the `BuildConfig` the resolver consumes.

pub mod json;
pub mod merge;
pub mod toml;

// Re-export main types
pub use crate::merge::{ConfigLayering, ConfigLoader, ConfigSource, ROOTS_ENV_VAR};
pub use crate::toml::{parse_bdemeta_toml, serialize_bdemeta_toml, validate_config};
pub use crate::json::parse_bdemeta_json;

use bdemeta_core::error::BdeError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, BdeError>;
