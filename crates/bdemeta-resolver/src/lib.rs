//! Dependency resolution engine for BDE-style source trees
//!
//! This crate turns unit names into a fully ordered, de-duplicated sequence of
//! build units. The graph is discovered lazily from `.dep` and `.mem` files
//! under a list of search roots, sorted topologically with cycle detection, and
//! built bottom-up so that every unit is constructed exactly once.

pub mod graph;
pub mod items;
pub mod locate;
pub mod resolver;

// Re-export main types
pub use graph::{tsort, DependencyGraph, EdgeKind};
pub use items::{bde_items, parse_items};
pub use locate::{Location, Locator};
pub use resolver::{resolve, resolve_into, Resolve, Resolver, UnitResolver};

use bdemeta_core::error::BdeError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, BdeError>;
