//! bdemeta.toml parsing, serialization and validation
//!
//! ```toml
//! roots = ["../bde", "/opt/thirdparty"]
//!
//! [units."#universal"]
//! external_cflags = ["-DBDE_BUILD_TARGET_MT"]
//!
//! [units.pthread]
//! ld_args = ["-lpthread"]
//! ```

use bdemeta_core::error::BdeError;
use bdemeta_core::types::BuildConfig;
use camino::Utf8Path;

use crate::ConfigResult;

/// Parse TOML string to a build configuration
pub fn parse_bdemeta_toml(content: &str) -> ConfigResult<BuildConfig> {
    // First try with toml_edit for better error reporting
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| BdeError::ConfigParse {
            message: format!("TOML syntax error: {}", e),
        })?;

    // Then parse with serde for type safety
    let config: BuildConfig = toml::from_str(content).map_err(|e| BdeError::ConfigParse {
        message: format!("TOML parsing error: {}", e),
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize a build configuration to a TOML string
pub fn serialize_bdemeta_toml(config: &BuildConfig) -> ConfigResult<String> {
    toml::to_string_pretty(config).map_err(|e| BdeError::ConfigParse {
        message: format!("TOML serialization error: {}", e),
    })
}

/// Load and parse bdemeta.toml from file path
pub fn load_from_file(path: &Utf8Path) -> ConfigResult<BuildConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BdeError::from_io(path, e))?;

    parse_bdemeta_toml(&content).map_err(|e| in_file(path, e))
}

/// Validate unit names and configured dependency names
///
/// Roots are checked after layering, since the environment and the command
/// line may supply all of them.
pub fn validate_config(config: &BuildConfig) -> ConfigResult<()> {
    for (name, unit) in &config.units {
        validate_name("units", name)?;
        for dep in &unit.deps {
            validate_name(&format!("units.{}.deps", name), dep)?;
        }
    }

    Ok(())
}

/// Prefix the message of a parse or validation error with the file it came from
pub(crate) fn in_file(path: &Utf8Path, error: BdeError) -> BdeError {
    match error {
        BdeError::ConfigParse { message } => BdeError::ConfigParse {
            message: format!("In file {}: {}", path, message),
        },
        BdeError::ConfigValidation { field, reason } => BdeError::ConfigValidation {
            field,
            reason: format!("In file {}: {}", path, reason),
        },
        other => other,
    }
}

fn validate_name(field: &str, name: &str) -> ConfigResult<()> {
    if name.is_empty() {
        return Err(BdeError::ConfigValidation {
            field: field.to_string(),
            reason: "Unit names must not be empty".to_string(),
        });
    }

    // Item files split on whitespace, so such a name could never be referenced
    if name.chars().any(char::is_whitespace) {
        return Err(BdeError::ConfigValidation {
            field: field.to_string(),
            reason: format!("Unit name '{}' contains whitespace", name),
        });
    }

    Ok(())
}
