//! Name classification and root search
//!
//! A unit's kind follows from the shape of its name, confirmed by finding its
//! directory under one of the search roots:
//!
//! - `#universal` is the synthetic universal unit
//! - `m_<name>` is an application at `<root>/applications/<name>`
//! - a three character name is a group at `<root>/groups/<name>`
//! - a longer name is a package at `<root>/groups/<first three>/<name>`
//! - anything else (or a name whose directory is missing) is a plain target
//!
//! Only directory existence is checked here; item files are read by the
//! resolver.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use bdemeta_core::types::{UnitKind, UNIVERSAL};

/// Prefix reserved for application names
pub const APPLICATION_PREFIX: &str = "m_";

/// Length of a group name, and of the group prefix of a package name
pub const GROUP_NAME_LEN: usize = 3;

/// Marker in a package name that makes it a third-party package
pub const THIRD_PARTY_MARKER: char = '+';

/// Where a unit lives, by kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Universal,
    Application(Utf8PathBuf),
    Group(Utf8PathBuf),
    Package(Utf8PathBuf),
    Target,
}

impl Location {
    pub fn kind(&self) -> UnitKind {
        match self {
            Location::Universal => UnitKind::Universal,
            Location::Application(_) => UnitKind::Application,
            Location::Group(_) => UnitKind::Group,
            Location::Package(_) => UnitKind::Package,
            Location::Target => UnitKind::Target,
        }
    }

    /// Unit directory, if the unit lives on disk
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Location::Application(path) | Location::Group(path) | Location::Package(path) => {
                Some(path.as_path())
            },
            Location::Universal | Location::Target => None,
        }
    }

    /// `<path>/<kind dir>/<name>.dep`
    pub fn dep_file(&self, name: &str) -> Option<Utf8PathBuf> {
        self.item_file(name, "dep")
    }

    /// `<path>/<kind dir>/<name>.mem`
    pub fn mem_file(&self, name: &str) -> Option<Utf8PathBuf> {
        self.item_file(name, "mem")
    }

    fn item_file(&self, name: &str, extension: &str) -> Option<Utf8PathBuf> {
        let subdir = match self {
            Location::Application(_) => "application",
            Location::Group(_) => "group",
            Location::Package(_) => "package",
            Location::Universal | Location::Target => return None,
        };
        self.path()
            .map(|path| path.join(subdir).join(format!("{}.{}", name, extension)))
    }
}

/// Searches an ordered list of roots for unit directories
#[derive(Debug, Clone, Default)]
pub struct Locator {
    roots: Vec<Utf8PathBuf>,
}

impl Locator {
    pub fn new(roots: Vec<Utf8PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Utf8PathBuf] {
        &self.roots
    }

    /// Classify `name` and find its directory
    ///
    /// Rules are tried in priority order and a miss falls through to the next
    /// rule, ending at `Location::Target`; this never fails.
    pub fn locate(&self, name: &str) -> Location {
        let location = self.classify(name);
        debug!("Located {} as {:?}", name, location);
        location
    }

    fn classify(&self, name: &str) -> Location {
        if name == UNIVERSAL {
            return Location::Universal;
        }

        if name.starts_with(APPLICATION_PREFIX) {
            if let Some(path) = self.find(|root| root.join("applications").join(name)) {
                return Location::Application(path);
            }
        }

        let length = name.chars().count();
        if length == GROUP_NAME_LEN {
            if let Some(path) = self.find(|root| root.join("groups").join(name)) {
                return Location::Group(path);
            }
        }

        if let Some(group) = group_of(name) {
            if let Some(path) = self.find(|root| root.join("groups").join(group).join(name)) {
                return Location::Package(path);
            }
        }

        Location::Target
    }

    fn find<F>(&self, candidate: F) -> Option<Utf8PathBuf>
    where
        F: Fn(&Utf8Path) -> Utf8PathBuf,
    {
        self.roots
            .iter()
            .map(|root| candidate(root.as_path()))
            .find(|path| path.is_dir())
    }
}

/// Group prefix of a package name; `None` unless the name is longer than a group name
pub fn group_of(name: &str) -> Option<&str> {
    name.char_indices()
        .nth(GROUP_NAME_LEN)
        .map(|(index, _)| &name[..index])
}

/// Whether a package's components come from a directory scan
pub fn is_third_party(package: &str) -> bool {
    package.contains(THIRD_PARTY_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn roots_with(dirs: &[&str]) -> (TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        for dir in dirs {
            fs::create_dir_all(base.join(dir)).unwrap();
        }
        (temp, base)
    }

    #[test]
    fn test_group_of() {
        assert_eq!(group_of("bslma"), Some("bsl"));
        assert_eq!(group_of("bsl+bslhdrs"), Some("bsl"));
        assert_eq!(group_of("bsl"), None);
        assert_eq!(group_of("ab"), None);
        assert_eq!(group_of("äöüx"), Some("äöü"));
    }

    #[test]
    fn test_third_party() {
        assert!(is_third_party("zlib+"));
        assert!(is_third_party("g1+p4"));
        assert!(!is_third_party("bslma"));
    }

    #[test]
    fn test_universal() {
        let locator = Locator::new(Vec::new());
        assert_eq!(locator.locate(UNIVERSAL), Location::Universal);
        assert_eq!(Location::Universal.dep_file(UNIVERSAL), None);
    }

    #[test]
    fn test_group_and_package() {
        let (_temp, base) = roots_with(&["r/groups/bsl/bslma"]);
        let locator = Locator::new(vec![base.join("r")]);

        let group = locator.locate("bsl");
        assert_eq!(group, Location::Group(base.join("r/groups/bsl")));
        assert_eq!(
            group.dep_file("bsl"),
            Some(base.join("r/groups/bsl/group/bsl.dep"))
        );

        let package = locator.locate("bslma");
        assert_eq!(package.kind(), UnitKind::Package);
        assert_eq!(
            package.mem_file("bslma"),
            Some(base.join("r/groups/bsl/bslma/package/bslma.mem"))
        );
    }

    #[test]
    fn test_application() {
        let (_temp, base) = roots_with(&["r/applications/m_bdemeta"]);
        let locator = Locator::new(vec![base.join("r")]);

        let location = locator.locate("m_bdemeta");
        assert_eq!(location.kind(), UnitKind::Application);
        assert_eq!(
            location.dep_file("m_bdemeta"),
            Some(base.join("r/applications/m_bdemeta/application/m_bdemeta.dep"))
        );
    }

    #[test]
    fn test_first_root_wins() {
        let (_temp, base) = roots_with(&["one/groups/bsl", "two/groups/bsl", "two/groups/bdl"]);
        let locator = Locator::new(vec![base.join("one"), base.join("two")]);

        assert_eq!(locator.locate("bsl").path(), Some(base.join("one/groups/bsl").as_path()));
        assert_eq!(locator.locate("bdl").path(), Some(base.join("two/groups/bdl").as_path()));
    }

    #[test]
    fn test_missing_directories_fall_through_to_target() {
        let (_temp, base) = roots_with(&["r/groups"]);
        let locator = Locator::new(vec![base.join("r")]);

        assert_eq!(locator.locate("m_app"), Location::Target);
        assert_eq!(locator.locate("zzz"), Location::Target);
        assert_eq!(locator.locate("pthread"), Location::Target);
        assert_eq!(locator.locate("x"), Location::Target);
        assert_eq!(Location::Target.path(), None);
    }

    #[test]
    fn test_unmatched_application_falls_through_to_package() {
        // An m_ name with no application directory is still checked as a package
        let (_temp, base) = roots_with(&["r/groups/m_a/m_abc"]);
        let locator = Locator::new(vec![base.join("r")]);

        assert_eq!(
            locator.locate("m_abc"),
            Location::Package(base.join("r/groups/m_a/m_abc"))
        );
    }
}
