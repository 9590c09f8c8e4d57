//! Path utilities shared by the locator and the config loader.

use crate::error::{BdeError, BdeResult};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::path::Path;

/// Normalize a path by resolving . and .. components lexically
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut components: Vec<Utf8Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {},
            Utf8Component::ParentDir => match components.last().copied() {
                Some(Utf8Component::Normal(_)) => {
                    components.pop();
                },
                // Nothing to pop: keep the .. so relative roots stay relative
                Some(Utf8Component::ParentDir) | None => components.push(component),
                Some(_) => {},
            },
            other => components.push(other),
        }
    }

    if components.is_empty() {
        return Utf8PathBuf::from(".");
    }
    components.iter().collect()
}

/// Convert a std path into a UTF-8 path
pub fn utf8_path(path: &Path) -> BdeResult<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(|path| {
        BdeError::io(
            format!("Path is not valid UTF-8: {}", path.display()),
            std::io::Error::new(std::io::ErrorKind::InvalidData, "non UTF-8 path"),
        )
    })
}

/// Check whether a file is a C or C++ translation unit
///
/// Only the lowercase `.c` and `.cpp` extensions count.
pub fn is_c_source(path: &Utf8Path) -> bool {
    matches!(path.extension(), Some("c" | "cpp"))
}
