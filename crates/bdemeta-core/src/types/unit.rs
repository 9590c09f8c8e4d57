//! Build-unit types.
//!
//! A `Unit` is one resolved node of the dependency graph. Dependencies are held
//! as `Arc<Unit>` so every dependent shares the single instance built for a name.

use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Name of the synthetic unit every other unit implicitly depends on
pub const UNIVERSAL: &str = "#universal";

/// Compiler and linker metadata attached to a unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFlags {
    /// Flags used when compiling the unit itself
    pub internal_cflags: Vec<String>,
    /// Flags propagated to everything that depends on the unit
    pub external_cflags: Vec<String>,
    /// Linker arguments
    pub ld_args: Vec<String>,
}

/// Kind of a unit, as decided by the name classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Universal,
    Application,
    Group,
    Package,
    Target,
}

/// A single compilation unit owned by a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub source: Utf8PathBuf,
    /// Test driver, present only when `<name>.t.cpp` exists
    pub driver: Option<Utf8PathBuf>,
}

/// Kind-specific part of a unit
#[derive(Debug)]
pub enum UnitDetail {
    Universal,
    Application,
    Group { packages: Vec<Arc<Unit>> },
    Package { components: Vec<Component> },
    Target,
}

/// A resolved build unit
#[derive(Debug)]
pub struct Unit {
    name: String,
    path: Option<Utf8PathBuf>,
    dependencies: Vec<Arc<Unit>>,
    flags: UnitFlags,
    detail: UnitDetail,
}

impl Component {
    /// Create a component without a test driver
    pub fn new(name: impl Into<String>, source: Utf8PathBuf) -> Self {
        Self {
            name: name.into(),
            source,
            driver: None,
        }
    }

    /// Attach a test driver
    pub fn with_driver(mut self, driver: Utf8PathBuf) -> Self {
        self.driver = Some(driver);
        self
    }
}

impl Unit {
    /// The universal sentinel; it never has dependencies
    pub fn universal(flags: UnitFlags) -> Self {
        Self {
            name: UNIVERSAL.to_string(),
            path: None,
            dependencies: Vec::new(),
            flags,
            detail: UnitDetail::Universal,
        }
    }

    pub fn application(
        name: impl Into<String>,
        path: Utf8PathBuf,
        dependencies: Vec<Arc<Unit>>,
        flags: UnitFlags,
    ) -> Self {
        Self {
            name: name.into(),
            path: Some(path),
            dependencies,
            flags,
            detail: UnitDetail::Application,
        }
    }

    pub fn group(
        name: impl Into<String>,
        path: Utf8PathBuf,
        dependencies: Vec<Arc<Unit>>,
        flags: UnitFlags,
        packages: Vec<Arc<Unit>>,
    ) -> Self {
        Self {
            name: name.into(),
            path: Some(path),
            dependencies,
            flags,
            detail: UnitDetail::Group { packages },
        }
    }

    pub fn package(
        name: impl Into<String>,
        path: Utf8PathBuf,
        dependencies: Vec<Arc<Unit>>,
        flags: UnitFlags,
        components: Vec<Component>,
    ) -> Self {
        Self {
            name: name.into(),
            path: Some(path),
            dependencies,
            flags,
            detail: UnitDetail::Package { components },
        }
    }

    /// A unit known only from configuration
    pub fn target(name: impl Into<String>, dependencies: Vec<Arc<Unit>>, flags: UnitFlags) -> Self {
        Self {
            name: name.into(),
            path: None,
            dependencies,
            flags,
            detail: UnitDetail::Target,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Direct dependencies, already resolved
    pub fn dependencies(&self) -> &[Arc<Unit>] {
        &self.dependencies
    }

    pub fn flags(&self) -> &UnitFlags {
        &self.flags
    }

    pub fn detail(&self) -> &UnitDetail {
        &self.detail
    }

    pub fn kind(&self) -> UnitKind {
        match self.detail {
            UnitDetail::Universal => UnitKind::Universal,
            UnitDetail::Application => UnitKind::Application,
            UnitDetail::Group { .. } => UnitKind::Group,
            UnitDetail::Package { .. } => UnitKind::Package,
            UnitDetail::Target => UnitKind::Target,
        }
    }

    /// Member packages of a group, in membership-file order; empty otherwise
    pub fn packages(&self) -> &[Arc<Unit>] {
        match &self.detail {
            UnitDetail::Group { packages } => packages,
            _ => &[],
        }
    }

    /// Components of a package; empty otherwise
    pub fn components(&self) -> &[Component] {
        match &self.detail {
            UnitDetail::Package { components } => components,
            _ => &[],
        }
    }

    /// Test drivers of a package's components
    pub fn drivers(&self) -> impl Iterator<Item = &Utf8Path> {
        self.components()
            .iter()
            .filter_map(|component| component.driver.as_deref())
    }

    /// Check whether `name` is a direct dependency
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|dep| dep.name == name)
    }

    /// Flat, serializable view of this unit
    pub fn summary(&self) -> UnitSummary {
        UnitSummary {
            name: self.name.clone(),
            kind: self.kind(),
            path: self.path.clone(),
            dependencies: self.dependencies.iter().map(|dep| dep.name.clone()).collect(),
            flags: self.flags.clone(),
            packages: self.packages().iter().map(|pkg| pkg.name.clone()).collect(),
            components: self.components().to_vec(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Serializable summary of a unit with dependencies referenced by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub name: String,
    pub kind: UnitKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Utf8PathBuf>,
    pub dependencies: Vec<String>,
    pub flags: UnitFlags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}
