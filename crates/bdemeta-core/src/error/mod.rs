//! Error types and result aliases for bdemeta operations.
//!
//! Every failure in resolution stems from a static defect in the repository
//! layout or the configuration, so nothing here is retried.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Unified error type for all bdemeta operations
#[derive(Error, Debug)]
pub enum BdeError {
    // Resolution errors
    #[error("Target '{name}' not found in configuration or any root")]
    TargetNotFound { name: String },

    #[error("Cyclic dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("Required file not found: {path}")]
    NotFound { path: Utf8PathBuf },

    // Config errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for bdemeta operations
pub type BdeResult<T> = Result<T, BdeError>;

impl BdeError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Map an IO error on `path`, turning a missing file into `NotFound`
    pub fn from_io(path: &camino::Utf8Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::io(format!("Failed to read {}", path), source)
        }
    }

    /// Names implicated in a cycle, if this is a cycle error
    pub fn cycle(&self) -> Option<&[String]> {
        match self {
            BdeError::CyclicDependency { cycle } => Some(cycle),
            _ => None,
        }
    }

    /// Whether this error points at a broken source tree layout
    pub fn is_layout_error(&self) -> bool {
        matches!(self, BdeError::NotFound { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            BdeError::TargetNotFound { .. } => Some(
                "Add the name to the [units] table of your configuration or check the search roots",
            ),
            BdeError::CyclicDependency { .. } => {
                Some("Remove one of the listed edges from the .dep files or the configured deps")
            },
            BdeError::NotFound { .. } => {
                Some("Every group, package and application needs its .dep and .mem files")
            },
            BdeError::ConfigParse { .. } | BdeError::ConfigValidation { .. } => {
                Some("Check bdemeta.toml (or bdemeta.json) for typos")
            },
            BdeError::Io { .. } => None,
        }
    }
}
