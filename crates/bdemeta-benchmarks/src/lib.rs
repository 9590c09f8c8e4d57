//! bdemeta benchmarking suite
//!
//! Benchmarks for the topological sort, full resolution over generated source
//! trees, and item and configuration parsing.

pub mod common;

pub use common::*;
