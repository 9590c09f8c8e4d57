//! `bdemeta components`: component sources and test drivers
//!
//! Groups contribute their member packages, so `bdemeta components bsl` lists
//! every component of the group.

use std::sync::Arc;

use bdemeta_core::error::BdeResult;
use bdemeta_core::types::{Unit, UnitKind};
use indexmap::IndexMap;

use super::CommandContext;
use crate::output::colors::ColorSupport;

pub fn execute(names: &[String], ctx: &CommandContext) -> BdeResult<()> {
    let units = ctx.resolve(names)?;
    let packages = packages(&units);
    if packages.is_empty() {
        ctx.output.warn("No packages among the resolved units");
        return Ok(());
    }
    ctx.output.emit(&render(&packages, ctx.output.colors()));
    Ok(())
}

/// Packages among `units` and their group members, first occurrence wins
pub fn packages(units: &[Arc<Unit>]) -> Vec<Arc<Unit>> {
    let mut packages = IndexMap::new();
    for unit in units {
        match unit.kind() {
            UnitKind::Group => {
                for package in unit.packages() {
                    packages
                        .entry(package.name().to_string())
                        .or_insert_with(|| Arc::clone(package));
                }
            },
            UnitKind::Package => {
                packages
                    .entry(unit.name().to_string())
                    .or_insert_with(|| Arc::clone(unit));
            },
            _ => {},
        }
    }
    packages.into_values().collect()
}

/// `<package>:` headings followed by `<component> <source> [<driver>]` lines
pub fn render(packages: &[Arc<Unit>], colors: &ColorSupport) -> String {
    let mut output = String::new();
    for package in packages {
        output.push_str(&colors.bold(package.name()));
        output.push_str(":\n");
        for component in package.components() {
            output.push_str(&format!("  {} {}", component.name, component.source));
            if let Some(driver) = &component.driver {
                output.push_str(&format!(" {}", driver));
            }
            output.push('\n');
        }
    }
    output
}
