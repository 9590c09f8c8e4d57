//! `bdemeta dependents`: direct dependents of one unit within a closure

use bdemeta_core::error::BdeResult;
use bdemeta_resolver::DependencyGraph;

use super::CommandContext;

pub fn execute(name: &str, names: &[String], ctx: &CommandContext) -> BdeResult<()> {
    let units = ctx.resolve(names)?;
    let dependents = render(name, &DependencyGraph::from_units(&units))?;
    if dependents.is_empty() {
        ctx.output.warn(&format!("Nothing in the closure of {} depends on {}", names.join(" "), name));
    } else {
        ctx.output.emit(&dependents);
    }
    Ok(())
}

/// Sorted dependent names, one per line
pub fn render(name: &str, graph: &DependencyGraph) -> BdeResult<String> {
    Ok(graph.dependents(name)?.join("\n"))
}
