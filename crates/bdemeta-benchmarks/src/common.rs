//! Common utilities for benchmarks

use std::fs;
use std::io;

use camino::Utf8PathBuf;
use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};
use tempfile::TempDir;

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// A generated source tree removed on drop
pub struct SourceTree {
    _temp: TempDir,
    pub root: Utf8PathBuf,
    pub groups: Vec<String>,
}

/// Generate `groups` groups of `packages` packages with `components` components each
///
/// Group `n` depends on group `n - 1`; inside a group, package `n` depends on
/// package `n - 1`.
pub fn generate_tree(groups: usize, packages: usize, components: usize) -> io::Result<SourceTree> {
    let temp = tempfile::tempdir()?;
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "non UTF-8 temp dir"))?;

    let names: Vec<String> = (0..groups).map(group_name).collect();
    for (g, group) in names.iter().enumerate() {
        let group_dir = root.join("groups").join(group);
        let members: Vec<String> = (0..packages).map(|p| format!("{}{}", group, p)).collect();

        let deps = if g == 0 { String::new() } else { names[g - 1].clone() };
        write(&group_dir.join("group").join(format!("{}.dep", group)), &deps)?;
        write(&group_dir.join("group").join(format!("{}.mem", group)), &members.join("\n"))?;

        for (p, package) in members.iter().enumerate() {
            let package_dir = group_dir.join(package);
            let deps = if p == 0 { String::new() } else { members[p - 1].clone() };
            let items: Vec<String> = (0..components).map(|c| format!("{}_c{}", package, c)).collect();
            write(&package_dir.join("package").join(format!("{}.dep", package)), &deps)?;
            write(&package_dir.join("package").join(format!("{}.mem", package)), &items.join("\n"))?;
        }
    }

    Ok(SourceTree {
        _temp: temp,
        root,
        groups: names,
    })
}

/// Three-letter group name for index `n`
pub fn group_name(n: usize) -> String {
    let letters = b"abcdefghijklmnopqrstuvwxyz";
    [n / 676 % 26, n / 26 % 26, n % 26]
        .iter()
        .map(|&i| letters[i] as char)
        .collect()
}

/// Contents of an item file with `count` names over lines of eight, with comments
pub fn item_file(count: usize) -> String {
    let mut content = String::from("# generated\n");
    for line in (0..count).collect::<Vec<_>>().chunks(8) {
        let names: Vec<String> = line.iter().map(|i| format!("pkg{}", i)).collect();
        content.push_str(&names.join(" "));
        content.push_str("\n\n");
    }
    content
}

fn write(path: &camino::Utf8Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
