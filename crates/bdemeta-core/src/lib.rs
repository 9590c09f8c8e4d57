//! # bdemeta-core
//!
//! Core types and utilities shared across all bdemeta crates.
//!
//! This crate provides:
//! - The Build-Unit model (`Unit`, `Component`, `UnitKind`) produced by resolution
//! - The `BuildConfig` structure consumed by the resolver
//! - `BdeError` for unified error handling
//! - Path helpers used by the locator and the config loader
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (Unit, BuildConfig, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{BdeError, BdeResult};
pub use types::{
    BuildConfig, Component, Unit, UnitConfig, UnitDetail, UnitFlags, UnitKind, UnitSummary,
    UNIVERSAL,
};
