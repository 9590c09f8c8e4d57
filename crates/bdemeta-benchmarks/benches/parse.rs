//! Item file and configuration parsing performance benchmarks

use bdemeta_benchmarks::{criterion_config, item_file};
use bdemeta_config::{parse_bdemeta_json, parse_bdemeta_toml};
use bdemeta_resolver::parse_items;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Benchmark .dep/.mem parsing
fn bench_item_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("item_parsing");

    for count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        let content = item_file(*count);

        group.bench_with_input(BenchmarkId::new("items", count), &content, |b, content| {
            b.iter(|| black_box(parse_items(content).len()));
        });
    }

    group.finish();
}

fn create_toml_content(units: usize) -> String {
    let mut content = String::from("roots = [\"/src/bde\", \"/src/thirdparty\"]\n");
    for i in 0..units {
        content.push_str(&format!(
            "\n[units.target{}]\ndeps = [\"target{}\"]\nld_args = [\"-ltarget{}\"]\n",
            i,
            i.saturating_sub(1),
            i
        ));
    }
    content
}

fn create_json_content(units: usize) -> String {
    let entries: Vec<String> = (0..units)
        .map(|i| format!("\"target{}\": {{ \"ld_args\": [\"-ltarget{}\"] }}", i, i))
        .collect();
    format!("{{ \"roots\": [\"/src/bde\"], \"units\": {{ {} }} }}", entries.join(", "))
}

/// Benchmark bdemeta.toml and bdemeta.json parsing
fn bench_config_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_parsing");
    group.measurement_time(std::time::Duration::from_secs(5));

    for units in [10, 100, 500].iter() {
        group.throughput(Throughput::Elements(*units as u64));
        let toml = create_toml_content(*units);
        let json = create_json_content(*units);

        group.bench_with_input(BenchmarkId::new("toml", units), &toml, |b, content| {
            b.iter(|| black_box(parse_bdemeta_toml(content).expect("invalid TOML")));
        });
        group.bench_with_input(BenchmarkId::new("json", units), &json, |b, content| {
            b.iter(|| black_box(parse_bdemeta_json(content).expect("invalid JSON")));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_item_parsing, bench_config_parsing
}
criterion_main!(benches);
