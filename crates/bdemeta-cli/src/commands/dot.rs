//! `bdemeta dot`: Graphviz rendering of the resolved closure

use bdemeta_core::error::BdeResult;
use bdemeta_resolver::DependencyGraph;

use super::CommandContext;

pub fn execute(names: &[String], ctx: &CommandContext) -> BdeResult<()> {
    let units = ctx.resolve(names)?;
    let graph = DependencyGraph::from_units(&units);
    ctx.output.emit(&graph.to_dot());
    Ok(())
}
