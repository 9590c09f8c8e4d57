//! Configuration discovery, root layering, and environment overrides
//!
//! Roots are layered in increasing priority: the configuration file, then
//! `BDEMETA_ROOTS`, then `--root` flags. Higher layers are searched first.

use std::ffi::OsStr;
use std::fmt;

use bdemeta_core::error::BdeError;
use bdemeta_core::types::BuildConfig;
use bdemeta_core::utils::{normalize_path, utf8_path};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::ConfigResult;

/// Configuration file names, in lookup priority within one directory
pub const CONFIG_FILES: [&str; 2] = ["bdemeta.toml", "bdemeta.json"];

/// Environment variable holding extra search roots in platform path-list syntax
pub const ROOTS_ENV_VAR: &str = "BDEMETA_ROOTS";

/// Main configuration loading interface
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

/// Configuration layering and merging
#[derive(Debug, Default)]
pub struct ConfigLayering {
    /// Configuration file, if one was found
    file_config: Option<(BuildConfig, ConfigSource)>,
    /// Roots from the environment
    env_roots: Vec<Utf8PathBuf>,
    /// Roots from CLI flags
    cli_roots: Vec<Utf8PathBuf>,
}

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Project bdemeta.toml file
    Toml(Utf8PathBuf),
    /// Project bdemeta.json file
    Json(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Toml(path) | ConfigSource::Json(path) => write!(f, "{}", path),
            ConfigSource::Environment(var) => write!(f, "${}", var),
            ConfigSource::CommandLine => write!(f, "command line"),
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Find the nearest configuration file, walking up the directory tree
    pub fn find_config(&self) -> Option<Utf8PathBuf> {
        self.cwd.ancestors().find_map(|dir| {
            CONFIG_FILES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Load the nearest configuration file, if there is one
    pub fn load_project_config(&self) -> ConfigResult<Option<(BuildConfig, ConfigSource)>> {
        match self.find_config() {
            Some(path) => self.load_file(&path).map(Some),
            None => {
                debug!("No configuration file found above {}", self.cwd);
                Ok(None)
            },
        }
    }

    /// Load a configuration file, picking the format from its extension
    ///
    /// Relative roots in the file are taken relative to the file's directory.
    pub fn load_file(&self, path: &Utf8Path) -> ConfigResult<(BuildConfig, ConfigSource)> {
        let path = self.resolve_path(path);
        let (mut config, source) = match path.extension() {
            Some("json") => (
                crate::json::load_from_file(&path)?,
                ConfigSource::Json(path.clone()),
            ),
            _ => (
                crate::toml::load_from_file(&path)?,
                ConfigSource::Toml(path.clone()),
            ),
        };

        let base = path.parent().unwrap_or(self.cwd.as_path());
        config.roots = config.roots.iter().map(|root| anchor(base, root)).collect();

        info!("Loaded configuration from {}", path);
        Ok((config, source))
    }

    /// Make `path` absolute against the working directory, normalized
    pub fn resolve_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        anchor(&self.cwd, path)
    }
}

impl ConfigLayering {
    /// Create a new configuration layering system
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, config: BuildConfig, source: ConfigSource) -> Self {
        self.file_config = Some((config, source));
        self
    }

    pub fn with_env_roots(mut self, roots: Vec<Utf8PathBuf>) -> Self {
        self.env_roots = roots;
        self
    }

    pub fn with_cli_roots(mut self, roots: Vec<Utf8PathBuf>) -> Self {
        self.cli_roots = roots;
        self
    }

    /// Layers that contribute to the merged configuration, lowest priority first
    pub fn sources(&self) -> Vec<ConfigSource> {
        let mut sources = Vec::new();
        if let Some((_, source)) = &self.file_config {
            sources.push(source.clone());
        }
        if !self.env_roots.is_empty() {
            sources.push(ConfigSource::Environment(ROOTS_ENV_VAR.to_string()));
        }
        if !self.cli_roots.is_empty() {
            sources.push(ConfigSource::CommandLine);
        }
        sources
    }

    /// Merge all layers into one configuration
    ///
    /// A root listed by several layers is kept once, at its highest priority.
    pub fn merge(self) -> ConfigResult<BuildConfig> {
        let (mut config, file_roots) = match self.file_config {
            Some((mut config, _)) => {
                let roots = std::mem::take(&mut config.roots);
                (config, roots)
            },
            None => (BuildConfig::default(), Vec::new()),
        };

        let roots: IndexSet<Utf8PathBuf> = self
            .cli_roots
            .into_iter()
            .chain(self.env_roots)
            .chain(file_roots)
            .collect();
        config.roots = roots.into_iter().collect();

        if config.roots.is_empty() {
            return Err(BdeError::ConfigValidation {
                field: "roots".to_string(),
                reason: format!(
                    "No search roots configured; set them in {}, ${} or with --root",
                    CONFIG_FILES[0], ROOTS_ENV_VAR
                ),
            });
        }

        for root in &config.roots {
            if !root.is_dir() {
                warn!("Search root {} does not exist", root);
            }
        }

        debug!("Search roots: {:?}", config.roots);
        Ok(config)
    }

    /// Collect roots from `BDEMETA_ROOTS`
    pub fn collect_env_roots(cwd: &Utf8Path) -> ConfigResult<Vec<Utf8PathBuf>> {
        match std::env::var_os(ROOTS_ENV_VAR) {
            Some(value) => Self::parse_env_roots(&value, cwd),
            None => Ok(Vec::new()),
        }
    }

    /// Split a path list, dropping empty entries
    pub fn parse_env_roots(value: &OsStr, cwd: &Utf8Path) -> ConfigResult<Vec<Utf8PathBuf>> {
        std::env::split_paths(value)
            .filter(|path| !path.as_os_str().is_empty())
            .map(|path| utf8_path(&path).map(|path| anchor(cwd, &path)))
            .collect()
    }
}

fn anchor(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn temp_dir() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
        (temp, path)
    }

    #[test]
    fn test_config_loader_creation() {
        let cwd = Utf8PathBuf::from("/test");
        let loader = ConfigLoader::new(cwd.clone());
        assert_eq!(loader.cwd(), cwd.as_path());
    }

    #[test]
    fn test_find_config_walks_up() {
        let (_temp, base) = temp_dir();
        let nested = base.join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(base.join("a/bdemeta.toml"), "").unwrap();

        let loader = ConfigLoader::new(nested);
        assert_eq!(loader.find_config(), Some(base.join("a/bdemeta.toml")));
    }

    #[test]
    fn test_nearest_config_wins() {
        let (_temp, base) = temp_dir();
        fs::create_dir_all(base.join("a")).unwrap();
        fs::write(base.join("bdemeta.toml"), "").unwrap();
        fs::write(base.join("a/bdemeta.json"), "{}").unwrap();

        let loader = ConfigLoader::new(base.join("a"));
        assert_eq!(loader.find_config(), Some(base.join("a/bdemeta.json")));
    }

    #[test]
    fn test_toml_preferred_over_json() {
        let (_temp, base) = temp_dir();
        fs::write(base.join("bdemeta.toml"), "").unwrap();
        fs::write(base.join("bdemeta.json"), "{}").unwrap();

        let loader = ConfigLoader::new(base.clone());
        assert_eq!(loader.find_config(), Some(base.join("bdemeta.toml")));
    }

    #[test]
    fn test_load_file_anchors_relative_roots() {
        let (_temp, base) = temp_dir();
        fs::create_dir_all(base.join("proj/sub")).unwrap();
        fs::write(
            base.join("proj/bdemeta.toml"),
            "roots = [\"../bde\", \"./local\", \"/abs/root\"]",
        )
        .unwrap();

        let loader = ConfigLoader::new(base.join("proj/sub"));
        let (config, source) = loader.load_project_config().unwrap().unwrap();

        assert_eq!(source, ConfigSource::Toml(base.join("proj/bdemeta.toml")));
        assert_eq!(
            config.roots,
            vec![base.join("bde"), base.join("proj/local"), Utf8PathBuf::from("/abs/root")]
        );
    }

    #[test]
    fn test_load_json_file() {
        let (_temp, base) = temp_dir();
        fs::write(base.join("custom.json"), r#"{ "roots": ["r"] }"#).unwrap();

        let loader = ConfigLoader::new(base.clone());
        let (config, source) = loader.load_file(Utf8Path::new("custom.json")).unwrap();

        assert_eq!(source, ConfigSource::Json(base.join("custom.json")));
        assert_eq!(config.roots, vec![base.join("r")]);
    }

    #[test]
    fn test_merge_priority() {
        let file = BuildConfig::new(["/file/a", "/shared"]);
        let merged = ConfigLayering::new()
            .with_file(file, ConfigSource::Toml("/p/bdemeta.toml".into()))
            .with_env_roots(vec!["/env".into(), "/shared".into()])
            .with_cli_roots(vec!["/cli".into()])
            .merge()
            .unwrap();

        assert_eq!(
            merged.roots,
            vec![
                Utf8PathBuf::from("/cli"),
                Utf8PathBuf::from("/env"),
                Utf8PathBuf::from("/shared"),
                Utf8PathBuf::from("/file/a"),
            ]
        );
    }

    #[test]
    fn test_merge_keeps_units() {
        let file = BuildConfig::new(["/r"]).with_unit("pthread", Default::default());
        let merged = ConfigLayering::new()
            .with_file(file, ConfigSource::Toml("/p/bdemeta.toml".into()))
            .merge()
            .unwrap();

        assert!(merged.contains("pthread"));
    }

    #[test]
    fn test_merge_without_file() {
        let merged = ConfigLayering::new()
            .with_cli_roots(vec!["/cli".into()])
            .merge()
            .unwrap();
        assert_eq!(merged.roots, vec![Utf8PathBuf::from("/cli")]);
        assert!(merged.units.is_empty());
    }

    #[test]
    fn test_merge_requires_roots() {
        let err = ConfigLayering::new().merge().unwrap_err();
        assert!(matches!(err, BdeError::ConfigValidation { ref field, .. } if field == "roots"));
    }

    #[test]
    fn test_sources() {
        let layering = ConfigLayering::new()
            .with_file(BuildConfig::default(), ConfigSource::Json("/p/bdemeta.json".into()))
            .with_cli_roots(vec!["/cli".into()]);

        assert_eq!(
            layering.sources(),
            vec![ConfigSource::Json("/p/bdemeta.json".into()), ConfigSource::CommandLine]
        );
    }

    #[test]
    fn test_parse_env_roots() {
        let value = std::env::join_paths(["/one", "", "two/../three"]).unwrap();
        let roots = ConfigLayering::parse_env_roots(&value, Utf8Path::new("/cwd")).unwrap();

        assert_eq!(roots, vec![Utf8PathBuf::from("/one"), Utf8PathBuf::from("/cwd/three")]);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(
            ConfigSource::Environment(ROOTS_ENV_VAR.to_string()).to_string(),
            "$BDEMETA_ROOTS"
        );
        assert_eq!(ConfigSource::CommandLine.to_string(), "command line");
    }
}
