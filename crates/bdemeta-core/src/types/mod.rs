//! Core data types for bdemeta.
//!
//! This module provides the fundamental types used throughout the workspace:
//! - Build units and their components
//! - The configuration structure consumed by the resolver

pub mod config;
pub mod unit;

// Re-export all public types
pub use config::{BuildConfig, UnitConfig};
pub use unit::{Component, Unit, UnitDetail, UnitFlags, UnitKind, UnitSummary, UNIVERSAL};
