//! Dependency resolution performance benchmarks
//!
//! Benchmarks the lazy topological sort on synthetic graphs and full
//! resolution over generated source trees, cold and memoized.

use std::collections::HashMap;

use bdemeta_benchmarks::{criterion_config, generate_tree, SourceTree};
use bdemeta_core::types::BuildConfig;
use bdemeta_resolver::{graph::lexicographic, tsort, DependencyGraph, Resolver};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Each node depends on the previous one
fn chain(size: usize) -> HashMap<String, Vec<String>> {
    (0..size)
        .map(|i| {
            let deps = if i == 0 { Vec::new() } else { vec![format!("n{}", i - 1)] };
            (format!("n{}", i), deps)
        })
        .collect()
}

/// Layers of `width` nodes, each depending on every node of the layer below
fn layered(layers: usize, width: usize) -> HashMap<String, Vec<String>> {
    let mut graph = HashMap::new();
    for layer in 0..layers {
        for node in 0..width {
            let deps = if layer == 0 {
                Vec::new()
            } else {
                (0..width).map(|n| format!("l{}n{}", layer - 1, n)).collect()
            };
            graph.insert(format!("l{}n{}", layer, node), deps);
        }
    }
    graph
}

fn sort(graph: &HashMap<String, Vec<String>>, roots: &[String]) -> usize {
    tsort(
        roots,
        |name: &str| Ok(graph.get(name).cloned().unwrap_or_default()),
        lexicographic,
    )
    .map(|order| order.len())
    .unwrap_or(0)
}

/// Benchmark the sort on deep and on wide graphs
fn bench_tsort(c: &mut Criterion) {
    let mut group = c.benchmark_group("tsort");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        let graph = chain(*size);
        let roots = vec![format!("n{}", size - 1)];

        group.bench_with_input(BenchmarkId::new("chain", size), &graph, |b, graph| {
            b.iter(|| black_box(sort(graph, &roots)));
        });
    }

    for width in [5, 20, 50].iter() {
        let graph = layered(10, *width);
        group.throughput(Throughput::Elements(graph.len() as u64));
        let roots: Vec<String> = (0..*width).map(|n| format!("l9n{}", n)).collect();

        group.bench_with_input(BenchmarkId::new("layered", width), &graph, |b, graph| {
            b.iter(|| black_box(sort(graph, &roots)));
        });
    }

    group.finish();
}

fn last_group(tree: &SourceTree) -> Vec<String> {
    tree.groups.last().cloned().into_iter().collect()
}

/// Benchmark resolution of a generated tree with a fresh session per iteration
fn bench_resolve_cold(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_cold");
    group.sample_size(20);

    for groups in [2, 10, 25].iter() {
        let tree = generate_tree(*groups, 10, 5).expect("Failed to generate source tree");
        let names = last_group(&tree);
        group.throughput(Throughput::Elements((*groups * 11) as u64));

        group.bench_with_input(BenchmarkId::new("groups", groups), &tree, |b, tree| {
            b.iter(|| {
                let mut resolver = Resolver::new(BuildConfig::new([tree.root.clone()]));
                black_box(resolver.resolve(&names).expect("resolution failed").len())
            });
        });
    }

    group.finish();
}

/// Benchmark a repeated request answered from the session store
fn bench_resolve_memoized(c: &mut Criterion) {
    let tree = generate_tree(25, 10, 5).expect("Failed to generate source tree");
    let names = last_group(&tree);
    let mut resolver = Resolver::new(BuildConfig::new([tree.root.clone()]));
    resolver.resolve(&names).expect("resolution failed");

    c.bench_function("resolve_memoized", |b| {
        b.iter(|| black_box(resolver.resolve(&names).expect("resolution failed").len()));
    });
}

/// Benchmark building and rendering the explicit graph
fn bench_dependency_graph(c: &mut Criterion) {
    let tree = generate_tree(10, 10, 1).expect("Failed to generate source tree");
    let mut resolver = Resolver::new(BuildConfig::new([tree.root.clone()]));
    let units = resolver.resolve(&last_group(&tree)).expect("resolution failed");

    c.bench_function("dependency_graph_dot", |b| {
        b.iter(|| black_box(DependencyGraph::from_units(&units).to_dot().len()));
    });
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_tsort, bench_resolve_cold, bench_resolve_memoized, bench_dependency_graph
}
criterion_main!(benches);
