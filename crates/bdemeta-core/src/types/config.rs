//! Configuration structure consumed by the resolver.
//!
//! Loading it from disk is the job of `bdemeta-config`; this module only
//! defines the shape.

use camino::Utf8PathBuf;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::UnitFlags;

/// Search roots plus per-unit overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directories searched in order; the first match wins
    pub roots: Vec<Utf8PathBuf>,
    /// Per-unit configuration keyed by unit name
    pub units: IndexMap<String, UnitConfig>,
}

/// Overrides for one unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    /// Extra dependencies unioned with the ones found on disk
    pub deps: IndexSet<String>,
    pub internal_cflags: Vec<String>,
    pub external_cflags: Vec<String>,
    pub ld_args: Vec<String>,
}

impl BuildConfig {
    /// Create a configuration with the given search roots and no units
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            units: IndexMap::new(),
        }
    }

    /// Add or replace the configuration of a unit
    pub fn with_unit(mut self, name: impl Into<String>, unit: UnitConfig) -> Self {
        self.units.insert(name.into(), unit);
        self
    }

    pub fn unit(&self, name: &str) -> Option<&UnitConfig> {
        self.units.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }
}

impl UnitConfig {
    /// Unit configuration carrying only dependency overrides
    pub fn with_deps<I, S>(deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            deps: deps.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Compiler and linker metadata for the resolved unit
    pub fn flags(&self) -> UnitFlags {
        UnitFlags {
            internal_cflags: self.internal_cflags.clone(),
            external_cflags: self.external_cflags.clone(),
            ld_args: self.ld_args.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = BuildConfig::new(["r1", "r2"])
            .with_unit("pthread", UnitConfig::default())
            .with_unit("bsl", UnitConfig::with_deps(["pthread"]));

        assert_eq!(config.roots, vec![Utf8PathBuf::from("r1"), Utf8PathBuf::from("r2")]);
        assert!(config.contains("bsl"));
        assert!(!config.contains("bdl"));
        assert!(config.unit("bsl").unwrap().deps.contains("pthread"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "roots": ["/src"],
            "units": {
                "pthread": { "ld_args": ["-lpthread"] }
            }
        }"#;
        let config: BuildConfig = serde_json::from_str(json).unwrap();
        let unit = config.unit("pthread").unwrap();

        assert!(unit.deps.is_empty());
        assert_eq!(unit.flags().ld_args, vec!["-lpthread"]);
    }
}
