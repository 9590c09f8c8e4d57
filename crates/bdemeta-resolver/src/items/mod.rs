//! Reader for `.dep` and `.mem` item files
//!
//! Both file kinds share one format: whitespace separated names, any number per
//! line, with `#` comment lines and blank lines ignored.

use std::fs;

use bdemeta_core::error::BdeError;
use camino::Utf8Path;
use indexmap::IndexSet;

use crate::ResolverResult;

/// Read the items listed in `path`
///
/// Duplicates collapse; the first occurrence keeps its position so membership
/// files retain their declared order.
pub fn bde_items(path: &Utf8Path) -> ResolverResult<IndexSet<String>> {
    let content = fs::read_to_string(path).map_err(|e| BdeError::from_io(path, e))?;
    Ok(parse_items(&content))
}

/// Parse the items out of an item file's contents
pub fn parse_items(content: &str) -> IndexSet<String> {
    content
        .lines()
        .filter(|line| !is_skipped(line))
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

fn is_skipped(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty() || line.starts_with('#')
}
