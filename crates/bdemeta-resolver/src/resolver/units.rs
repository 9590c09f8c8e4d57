//! Filesystem-backed resolver for BDE units

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use camino::Utf8Path;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use bdemeta_core::error::BdeError;
use bdemeta_core::types::{BuildConfig, Component, Unit, UnitFlags, UNIVERSAL};
use bdemeta_core::utils::is_c_source;

use super::{resolve_into, Resolve, Store};
use crate::items::bde_items;
use crate::locate::{is_third_party, Location, Locator};
use crate::ResolverResult;

/// Resolves unit names against a configuration and a set of search roots
///
/// Locations and dependency sets are cached, so no directory is probed and no
/// `.dep` file is read more than once per name.
#[derive(Debug)]
pub struct UnitResolver {
    config: BuildConfig,
    locator: Locator,
    locations: HashMap<String, Location>,
    edges: HashMap<String, IndexSet<String>>,
    /// Groups whose members are being built, with their members
    building: IndexMap<String, Vec<String>>,
}

impl UnitResolver {
    pub fn new(config: BuildConfig) -> Self {
        let locator = Locator::new(config.roots.clone());
        Self {
            config,
            locator,
            locations: HashMap::new(),
            edges: HashMap::new(),
            building: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Classify and locate `name`
    ///
    /// A name that is not found on disk must at least be configured.
    pub fn identify(&mut self, name: &str) -> ResolverResult<Location> {
        if let Some(location) = self.locations.get(name) {
            return Ok(location.clone());
        }

        let location = self.locator.locate(name);
        if location == Location::Target && !self.config.contains(name) {
            return Err(BdeError::TargetNotFound {
                name: name.to_string(),
            });
        }

        self.locations.insert(name.to_string(), location.clone());
        Ok(location)
    }

    fn flags(&self, name: &str) -> UnitFlags {
        self.config
            .unit(name)
            .map(|unit| unit.flags())
            .unwrap_or_default()
    }

    fn components(&self, name: &str, path: &Utf8Path, location: &Location) -> ResolverResult<Vec<Component>> {
        if is_third_party(name) {
            return scan_sources(path);
        }

        let items = read_items(location.mem_file(name))?;
        Ok(items
            .into_iter()
            .map(|item| {
                let source = path.join(format!("{}.cpp", item));
                let driver = path.join(format!("{}.t.cpp", item));
                let component = Component::new(item, source);
                if driver.is_file() {
                    component.with_driver(driver)
                } else {
                    component
                }
            })
            .collect())
    }

    /// Shortest path from `group` through its members back to `group`
    ///
    /// Only cached edges are followed, so no file is read.
    fn membership_cycle(&self, group: &str) -> Vec<String> {
        let mut previous: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::from([group]);

        while let Some(node) = queue.pop_front() {
            let members = self.building.get(node).into_iter().flatten();
            let deps = self.edges.get(node).into_iter().flatten();

            for next in members.chain(deps) {
                if next == group {
                    let mut cycle = vec![group.to_string(), node.to_string()];
                    let mut current = node;
                    while let Some(&before) = previous.get(current) {
                        cycle.push(before.to_string());
                        current = before;
                    }
                    if current != group {
                        cycle.push(group.to_string());
                    }
                    cycle.reverse();
                    return cycle;
                }
                if !previous.contains_key(next.as_str()) {
                    previous.insert(next, node);
                    queue.push_back(next);
                }
            }
        }

        vec![group.to_string(), group.to_string()]
    }
}

impl Resolve for UnitResolver {
    type Output = Arc<Unit>;

    fn dependencies(&mut self, name: &str) -> ResolverResult<IndexSet<String>> {
        if let Some(deps) = self.edges.get(name) {
            return Ok(deps.clone());
        }

        let location = self.identify(name)?;
        let overrides = self
            .config
            .unit(name)
            .map(|unit| unit.deps.clone())
            .unwrap_or_default();

        let deps = match location {
            Location::Universal => {
                if !overrides.is_empty() {
                    warn!("Ignoring dependencies configured for {}", UNIVERSAL);
                }
                IndexSet::new()
            },
            Location::Application(_) | Location::Group(_) => {
                let mut deps = overrides;
                deps.extend(read_items(location.dep_file(name))?);
                deps.insert(UNIVERSAL.to_string());
                deps
            },
            // Packages reach the universal unit through their group
            Location::Package(_) => {
                let mut deps = overrides;
                deps.extend(read_items(location.dep_file(name))?);
                deps
            },
            Location::Target => {
                let mut deps = overrides;
                deps.insert(UNIVERSAL.to_string());
                deps
            },
        };

        trace!("Dependencies of {}: {:?}", name, deps);
        self.edges.insert(name.to_string(), deps.clone());
        Ok(deps)
    }

    fn resolve(&mut self, name: &str, store: &mut Store<Arc<Unit>>) -> ResolverResult<Arc<Unit>> {
        // A member of `name` depends back on it
        if self.building.contains_key(name) {
            let cycle = self.membership_cycle(name);
            debug!("Membership cycle: {:?}", cycle);
            return Err(BdeError::CyclicDependency { cycle });
        }

        let location = self.identify(name)?;
        let dependencies = self
            .dependencies(name)?
            .iter()
            .map(|dep| built(store, dep))
            .collect::<ResolverResult<Vec<_>>>()?;
        let flags = self.flags(name);

        let unit = match &location {
            Location::Universal => Unit::universal(flags),
            Location::Application(path) => {
                Unit::application(name, path.clone(), dependencies, flags)
            },
            Location::Group(path) => {
                let members: Vec<String> = read_items(location.mem_file(name))?.into_iter().collect();
                self.building.insert(name.to_string(), members.clone());
                let nested = resolve_into(self, &members, store);
                self.building.shift_remove(name);
                nested?;
                let packages = members
                    .iter()
                    .map(|member| built(store, member))
                    .collect::<ResolverResult<Vec<_>>>()?;
                Unit::group(name, path.clone(), dependencies, flags, packages)
            },
            Location::Package(path) => {
                let components = self.components(name, path, &location)?;
                Unit::package(name, path.clone(), dependencies, flags, components)
            },
            Location::Target => Unit::target(name, dependencies, flags),
        };

        debug!(
            "Built {:?} {} with {} dependencies",
            unit.kind(),
            name,
            unit.dependencies().len()
        );
        Ok(Arc::new(unit))
    }
}

fn built(store: &Store<Arc<Unit>>, name: &str) -> ResolverResult<Arc<Unit>> {
    store
        .get(name)
        .cloned()
        .ok_or_else(|| BdeError::TargetNotFound {
            name: name.to_string(),
        })
}

fn read_items(path: Option<camino::Utf8PathBuf>) -> ResolverResult<IndexSet<String>> {
    match path {
        Some(path) => bde_items(&path),
        None => Ok(IndexSet::new()),
    }
}

/// Components of a third-party package: every `.c`/`.cpp` file directly in `path`
fn scan_sources(path: &Utf8Path) -> ResolverResult<Vec<Component>> {
    let mut components = Vec::new();

    for entry in WalkDir::new(path).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| BdeError::io(format!("Failed to scan {}", path), e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file) = Utf8Path::from_path(entry.path()) else {
            warn!("Skipping non UTF-8 file in {}: {}", path, entry.path().display());
            continue;
        };
        if !is_c_source(file) {
            continue;
        }
        if let Some(stem) = file.file_stem() {
            components.push(Component::new(stem, file.to_path_buf()));
        }
    }

    Ok(components)
}
