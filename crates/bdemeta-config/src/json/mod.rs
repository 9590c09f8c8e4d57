//! bdemeta.json parsing
//!
//! The JSON form carries the same fields as bdemeta.toml:
//!
//! ```json
//! {
//!   "roots": ["../bde"],
//!   "units": { "pthread": { "ld_args": ["-lpthread"] } }
//! }
//! ```

use bdemeta_core::error::BdeError;
use bdemeta_core::types::BuildConfig;
use camino::Utf8Path;

use crate::toml::{in_file, validate_config};
use crate::ConfigResult;

/// Parse a JSON string to a build configuration
pub fn parse_bdemeta_json(content: &str) -> ConfigResult<BuildConfig> {
    let config: BuildConfig = serde_json::from_str(content).map_err(|e| BdeError::ConfigParse {
        message: format!("JSON parsing error at line {}, column {}: {}", e.line(), e.column(), e),
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Load and parse bdemeta.json from file path
pub fn load_from_file(path: &Utf8Path) -> ConfigResult<BuildConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BdeError::from_io(path, e))?;

    parse_bdemeta_json(&content).map_err(|e| in_file(path, e))
}
