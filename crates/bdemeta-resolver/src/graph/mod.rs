//! Topological sorting and dependency graph inspection
//!
//! `tsort` walks an implicit graph: edges come from a callback, so the sort
//! itself never touches the filesystem. `DependencyGraph` is an explicit
//! petgraph view over units that have already been resolved.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use bdemeta_core::error::BdeError;
use bdemeta_core::types::{Unit, UnitKind};

use crate::ResolverResult;

/// Lexicographic tie-break, the default sibling ordering
pub fn lexicographic(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Compute the closure of `roots` with every dependency before its dependents
///
/// Roots are visited in the order given; the direct dependencies of each node
/// are visited in `tie_break` order. `next` is called at most once per
/// distinct name and its errors are returned unchanged.
///
/// # Errors
///
/// Returns `BdeError::CyclicDependency` with the closed cycle (first and last
/// names equal) when a name is reached again while it is still being visited.
pub fn tsort<I, F, N, C>(roots: I, mut next: F, tie_break: C) -> ResolverResult<Vec<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    F: FnMut(&str) -> ResolverResult<N>,
    N: IntoIterator<Item = String>,
    C: Fn(&str, &str) -> Ordering,
{
    let mut sort = TopoSort::default();
    for root in roots {
        sort.visit(root.as_ref(), &mut next, &tie_break)?;
    }
    Ok(sort.order)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

#[derive(Debug, Default)]
struct TopoSort {
    marks: HashMap<String, Mark>,
    /// Names currently being visited, outermost first
    path: Vec<String>,
    order: Vec<String>,
}

/// A name whose dependencies are still being walked
struct Frame {
    name: String,
    children: std::vec::IntoIter<String>,
}

impl TopoSort {
    /// Walk everything reachable from `root` with an explicit stack, so deep
    /// dependency chains cannot exhaust the call stack
    fn visit<F, N, C>(&mut self, root: &str, next: &mut F, tie_break: &C) -> ResolverResult<()>
    where
        F: FnMut(&str) -> ResolverResult<N>,
        N: IntoIterator<Item = String>,
        C: Fn(&str, &str) -> Ordering,
    {
        let mut stack: Vec<Frame> = Vec::new();
        stack.extend(self.enter(root, next, tie_break)?);

        while let Some(frame) = stack.last_mut() {
            match frame.children.next() {
                Some(child) => stack.extend(self.enter(&child, next, tie_break)?),
                None => {
                    if let Some(frame) = stack.pop() {
                        self.path.pop();
                        self.marks.insert(frame.name.clone(), Mark::Done);
                        self.order.push(frame.name);
                    }
                },
            }
        }
        Ok(())
    }

    /// Mark `name` as visiting and fetch its sorted children
    ///
    /// Returns `None` for a name that is already done.
    fn enter<F, N, C>(&mut self, name: &str, next: &mut F, tie_break: &C) -> ResolverResult<Option<Frame>>
    where
        F: FnMut(&str) -> ResolverResult<N>,
        N: IntoIterator<Item = String>,
        C: Fn(&str, &str) -> Ordering,
    {
        match self.marks.get(name) {
            Some(Mark::Done) => return Ok(None),
            Some(Mark::Visiting) => return Err(self.cycle_through(name)),
            None => {},
        }

        self.marks.insert(name.to_string(), Mark::Visiting);
        self.path.push(name.to_string());

        let mut children: Vec<String> = next(name)?.into_iter().collect();
        children.sort_by(|a, b| tie_break(a, b));
        Ok(Some(Frame {
            name: name.to_string(),
            children: children.into_iter(),
        }))
    }

    fn cycle_through(&self, name: &str) -> BdeError {
        let start = self.path.iter().position(|n| n == name).unwrap_or(0);
        let mut cycle = self.path[start..].to_vec();
        cycle.push(name.to_string());
        BdeError::CyclicDependency { cycle }
    }
}

/// Relationship carried by an edge of the dependency graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Dependent depends on dependency
    Dependency,
    /// Group owns package
    Member,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Dependency => f.write_str("depends"),
            EdgeKind::Member => f.write_str("member"),
        }
    }
}

/// Node in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitNode {
    pub name: String,
    pub kind: UnitKind,
}

impl fmt::Display for UnitNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Explicit graph over resolved units; edges point from dependent to dependency
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<UnitNode, EdgeKind>,
    node_map: IndexMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph spanned by `units`, their dependencies and group members
    pub fn from_units(units: &[Arc<Unit>]) -> Self {
        let mut graph = Self::new();
        for unit in units {
            graph.add_unit_tree(unit);
        }
        graph
    }

    fn add_unit_tree(&mut self, unit: &Arc<Unit>) -> NodeIndex {
        if let Some(index) = self.node_map.get(unit.name()) {
            return *index;
        }
        let index = self.add_unit(unit.name(), unit.kind());
        for dependency in unit.dependencies() {
            let target = self.add_unit_tree(dependency);
            self.graph.add_edge(index, target, EdgeKind::Dependency);
        }
        for package in unit.packages() {
            let target = self.add_unit_tree(package);
            self.graph.add_edge(index, target, EdgeKind::Member);
        }
        index
    }

    /// Add a unit node; adding an existing name returns its index
    pub fn add_unit(&mut self, name: &str, kind: UnitKind) -> NodeIndex {
        if let Some(index) = self.node_map.get(name) {
            return *index;
        }
        let index = self.graph.add_node(UnitNode {
            name: name.to_string(),
            kind,
        });
        self.node_map.insert(name.to_string(), index);
        index
    }

    /// Add an edge between two existing units
    pub fn add_edge(&mut self, from: &str, to: &str, kind: EdgeKind) -> ResolverResult<()> {
        let from_index = self.index_of(from)?;
        let to_index = self.index_of(to)?;
        self.graph.add_edge(from_index, to_index, kind);
        Ok(())
    }

    fn index_of(&self, name: &str) -> ResolverResult<NodeIndex> {
        self.node_map
            .get(name)
            .copied()
            .ok_or_else(|| BdeError::TargetNotFound {
                name: name.to_string(),
            })
    }

    /// Get number of units in the graph
    pub fn unit_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get number of dependency edges in the graph (membership edges excluded)
    pub fn dependency_count(&self) -> usize {
        self.graph
            .edge_references()
            .filter(|edge| *edge.weight() == EdgeKind::Dependency)
            .count()
    }

    /// Names of the units that directly depend on `name`, sorted
    pub fn dependents(&self, name: &str) -> ResolverResult<Vec<&str>> {
        let index = self.index_of(name)?;
        let mut dependents: Vec<&str> = self
            .graph
            .edges_directed(index, Direction::Incoming)
            .filter(|edge| *edge.weight() == EdgeKind::Dependency)
            .map(|edge| self.graph[edge.source()].name.as_str())
            .collect();
        dependents.sort_unstable();
        Ok(dependents)
    }

    /// All units in build order (dependencies first)
    pub fn build_order(&self) -> ResolverResult<Vec<String>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(sorted) => Ok(sorted
                .into_iter()
                .rev()
                .map(|index| self.graph[index].name.clone())
                .collect()),
            Err(cycle) => Err(BdeError::CyclicDependency {
                cycle: self.cycle_from(cycle.node_id()),
            }),
        }
    }

    /// Names on the shortest path from `start` back to itself, closed
    fn cycle_from(&self, start: NodeIndex) -> Vec<String> {
        let mut previous: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            for next in self.graph.neighbors(node) {
                if next == start {
                    let mut path = vec![start, node];
                    let mut current = node;
                    while let Some(&before) = previous.get(&current) {
                        path.push(before);
                        current = before;
                    }
                    if current != start {
                        path.push(start);
                    }
                    return path
                        .into_iter()
                        .rev()
                        .map(|index| self.graph[index].name.clone())
                        .collect();
                }
                if let Entry::Vacant(entry) = previous.entry(next) {
                    entry.insert(node);
                    queue.push_back(next);
                }
            }
        }

        let name = self.graph[start].name.clone();
        vec![name.clone(), name]
    }

    /// Render the graph in Graphviz DOT format
    pub fn to_dot(&self) -> String {
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[Config::EdgeNoLabel],
            &|_, edge| match edge.weight() {
                EdgeKind::Dependency => String::new(),
                EdgeKind::Member => "style = dashed".to_string(),
            },
            &|_, (_, node)| format!("shape = {}", node_shape(node.kind)),
        );
        format!("{}", dot)
    }
}

fn node_shape(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::Universal => "point",
        UnitKind::Application => "doubleoctagon",
        UnitKind::Group => "box",
        UnitKind::Package => "ellipse",
        UnitKind::Target => "diamond",
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    // Edges only point from lower to higher indices, so the graph is a DAG
    fn dag(num_nodes: usize, edges: &[(usize, usize)]) -> HashMap<String, Vec<String>> {
        let mut graph: HashMap<String, Vec<String>> = (0..num_nodes)
            .map(|i| (format!("n{}", i), Vec::new()))
            .collect();
        for &(from, to) in edges {
            if from < num_nodes && to < num_nodes && from < to {
                if let Some(deps) = graph.get_mut(&format!("n{}", from)) {
                    deps.push(format!("n{}", to));
                }
            }
        }
        graph
    }

    proptest! {
        #[test]
        fn tsort_orders_dependencies_first(
            num_nodes in 1usize..10,
            edges in prop::collection::vec((0usize..10, 0usize..10), 0..25)
        ) {
            let graph = dag(num_nodes, &edges);
            let roots: Vec<String> = (0..num_nodes).map(|i| format!("n{}", i)).collect();
            let order = tsort(
                &roots,
                |name: &str| Ok(graph[name].clone()),
                lexicographic,
            ).unwrap();

            // Property: every node appears exactly once
            prop_assert_eq!(order.len(), num_nodes);
            let unique: HashSet<_> = order.iter().collect();
            prop_assert_eq!(unique.len(), num_nodes);

            // Property: every dependency precedes its dependent
            let position: HashMap<&str, usize> = order
                .iter()
                .enumerate()
                .map(|(i, name)| (name.as_str(), i))
                .collect();
            for (name, deps) in &graph {
                for dep in deps {
                    prop_assert!(position[dep.as_str()] < position[name.as_str()]);
                }
            }
        }

        #[test]
        fn tsort_rejects_back_edges(
            num_nodes in 2usize..8,
            edges in prop::collection::vec((0usize..8, 0usize..8), 0..15),
            back in (0usize..8, 0usize..8)
        ) {
            let mut graph = dag(num_nodes, &edges);
            let (low, high) = (back.0.min(back.1) % num_nodes, back.0.max(back.1) % num_nodes);
            prop_assume!(low < high);

            // Close a cycle low -> ... -> high -> low through a forced chain
            for i in low..high {
                graph.get_mut(&format!("n{}", i)).unwrap().push(format!("n{}", i + 1));
            }
            graph.get_mut(&format!("n{}", high)).unwrap().push(format!("n{}", low));

            let result = tsort(
                [format!("n{}", low)],
                |name: &str| Ok(graph[name].clone()),
                lexicographic,
            );
            let err = result.unwrap_err();
            let cycle = err.cycle().unwrap();
            prop_assert!(cycle.len() >= 2);
            prop_assert_eq!(cycle.first(), cycle.last());
        }
    }
}
