//! `bdemeta show`: resolved units as JSON

use std::sync::Arc;

use bdemeta_core::error::{BdeError, BdeResult};
use bdemeta_core::types::{Unit, UnitSummary};

use super::CommandContext;

pub fn execute(names: &[String], ctx: &CommandContext) -> BdeResult<()> {
    let units = ctx.resolve(names)?;
    ctx.output.emit(&render(&units)?);
    Ok(())
}

/// Pretty-printed JSON array of unit summaries, in resolution order
pub fn render(units: &[Arc<Unit>]) -> BdeResult<String> {
    let summaries: Vec<UnitSummary> = units.iter().map(|unit| unit.summary()).collect();
    serde_json::to_string_pretty(&summaries)
        .map_err(|e| BdeError::io("Failed to serialize unit summaries".to_string(), e.into()))
}
