//! Memoized resolution of unit names into build units
//!
//! Resolution is two passes: the closure of the requested names is sorted
//! topologically through `Resolve::dependencies`, then each name is built once,
//! in that order, so every dependency already sits in the store when its
//! dependents are built.

mod units;


use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use bdemeta_core::types::{BuildConfig, Unit};

use crate::graph::{lexicographic, tsort};
use crate::locate::Location;
use crate::ResolverResult;

pub use units::UnitResolver;

/// Already-built outputs keyed by name, in build order
pub type Store<T> = IndexMap<String, T>;

/// A source of dependency edges and of built outputs
pub trait Resolve {
    type Output: Clone;

    /// Direct dependencies of `name`
    fn dependencies(&mut self, name: &str) -> ResolverResult<IndexSet<String>>;

    /// Build `name`; all of its dependencies are already in `store`
    fn resolve(&mut self, name: &str, store: &mut Store<Self::Output>) -> ResolverResult<Self::Output>;
}

/// Resolve `names` with a fresh store
pub fn resolve<R, S>(resolver: &mut R, names: &[S]) -> ResolverResult<Vec<R::Output>>
where
    R: Resolve,
    S: AsRef<str>,
{
    resolve_into(resolver, names, &mut Store::new())
}

/// Resolve `names`, reusing and extending `store`
///
/// Returns the whole closure of `names`, dependencies first. Names already in
/// the store are returned as stored and never rebuilt.
pub fn resolve_into<R, S>(
    resolver: &mut R,
    names: &[S],
    store: &mut Store<R::Output>,
) -> ResolverResult<Vec<R::Output>>
where
    R: Resolve,
    S: AsRef<str>,
{
    let order = tsort(names, |name: &str| resolver.dependencies(name), lexicographic)?;

    let mut resolved = Vec::with_capacity(order.len());
    for name in order {
        let output = match store.get(&name) {
            Some(output) => output.clone(),
            None => {
                let output = resolver.resolve(&name, store)?;
                store.insert(name, output.clone());
                output
            },
        };
        resolved.push(output);
    }
    Ok(resolved)
}

/// A resolution session over one configuration
///
/// Units built by one call to `resolve` are shared with every later call on
/// the same session.
#[derive(Debug)]
pub struct Resolver {
    units: UnitResolver,
    store: Store<Arc<Unit>>,
}

impl Resolver {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            units: UnitResolver::new(config),
            store: Store::new(),
        }
    }

    /// Resolve `names` and everything they depend on, dependencies first
    ///
    /// # Errors
    ///
    /// `TargetNotFound` for a name that is neither configured nor found under
    /// any root, `CyclicDependency` for a cycle reachable from `names`, and
    /// `NotFound` for a missing `.dep` or `.mem` file.
    pub fn resolve<S: AsRef<str>>(&mut self, names: &[S]) -> ResolverResult<Vec<Arc<Unit>>> {
        let before = self.store.len();
        let units = match resolve_into(&mut self.units, names, &mut self.store) {
            Ok(units) => units,
            Err(err) => {
                // Units built before the failure belong to no result
                self.store.truncate(before);
                return Err(err);
            },
        };
        debug!(
            "Resolved {} units ({} built in session)",
            units.len(),
            self.store.len()
        );
        Ok(units)
    }

    /// Direct dependency names of `name`
    pub fn dependencies(&mut self, name: &str) -> ResolverResult<IndexSet<String>> {
        self.units.dependencies(name)
    }

    /// Kind and directory of `name`
    pub fn identify(&mut self, name: &str) -> ResolverResult<Location> {
        self.units.identify(name)
    }

    /// A unit built earlier in this session
    pub fn get(&self, name: &str) -> Option<&Arc<Unit>> {
        self.store.get(name)
    }

    /// Number of units built so far
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn config(&self) -> &BuildConfig {
        self.units.config()
    }
}
