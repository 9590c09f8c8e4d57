//! `bdemeta walk`: resolved unit names, dependencies first

use std::sync::Arc;

use bdemeta_core::error::BdeResult;
use bdemeta_core::types::Unit;

use super::CommandContext;

pub fn execute(names: &[String], ctx: &CommandContext) -> BdeResult<()> {
    let units = ctx.resolve(names)?;
    ctx.output.emit(&render(&units));
    Ok(())
}

/// One unit name per line
pub fn render(units: &[Arc<Unit>]) -> String {
    units
        .iter()
        .map(|unit| unit.name())
        .collect::<Vec<_>>()
        .join("\n")
}
