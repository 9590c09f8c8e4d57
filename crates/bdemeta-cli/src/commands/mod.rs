//! Command implementations and dispatch logic.
//!
//! Each resolving command loads the layered configuration, resolves the
//! requested names with one `Resolver` session, and renders the result to a
//! string that is then written to stdout.

use std::sync::Arc;

use bdemeta_config::{serialize_bdemeta_toml, ConfigLayering, ConfigLoader};
use bdemeta_core::error::{BdeError, BdeResult};
use bdemeta_core::types::{BuildConfig, Unit};
use bdemeta_core::utils::utf8_path;
use bdemeta_resolver::Resolver;
use camino::Utf8PathBuf;
use tracing::debug;

pub mod components;
pub mod dependents;
pub mod dot;
pub mod show;
pub mod walk;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub config_path: Option<Utf8PathBuf>,
    pub roots: Vec<Utf8PathBuf>,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Create a new command context in the current directory
    pub fn new(config_path: Option<Utf8PathBuf>, roots: Vec<Utf8PathBuf>) -> BdeResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| BdeError::io("Failed to get current directory".to_string(), e))?;

        Ok(Self {
            cwd: utf8_path(&cwd)?,
            config_path,
            roots,
            output: OutputHandler::new(),
        })
    }

    /// Load the configuration file and layer environment and CLI roots over it
    pub fn load_config(&self) -> BdeResult<BuildConfig> {
        self.load_config_with(ConfigLayering::collect_env_roots(&self.cwd)?)
    }

    /// Load the configuration with `env_roots` standing in for `$BDEMETA_ROOTS`
    fn load_config_with(&self, env_roots: Vec<Utf8PathBuf>) -> BdeResult<BuildConfig> {
        let loader = ConfigLoader::new(self.cwd.clone());

        let file = match &self.config_path {
            Some(path) => Some(loader.load_file(path)?),
            None => loader.load_project_config()?,
        };

        let mut layering = ConfigLayering::new()
            .with_env_roots(env_roots)
            .with_cli_roots(self.roots.iter().map(|root| loader.resolve_path(root)).collect());
        if let Some((config, source)) = file {
            layering = layering.with_file(config, source);
        }

        for source in layering.sources() {
            debug!("Configuration layer: {}", source);
        }
        layering.merge()
    }

    /// Resolve `names` in a fresh session
    pub fn resolve(&self, names: &[String]) -> BdeResult<Vec<Arc<Unit>>> {
        let mut resolver = Resolver::new(self.load_config()?);
        resolver.resolve(names)
    }
}

/// Dispatch a command to its handler
pub fn dispatch_command(command: Commands, ctx: &CommandContext) -> BdeResult<()> {
    match command {
        Commands::Walk { names } => {
            debug!("Walking {:?}", names);
            walk::execute(&names, ctx)
        },
        Commands::Show { names } => {
            debug!("Showing {:?}", names);
            show::execute(&names, ctx)
        },
        Commands::Dot { names } => {
            debug!("Rendering graph of {:?}", names);
            dot::execute(&names, ctx)
        },
        Commands::Components { names } => {
            debug!("Listing components of {:?}", names);
            components::execute(&names, ctx)
        },
        Commands::Dependents { name, names } => {
            debug!("Listing dependents of {} within {:?}", name, names);
            dependents::execute(&name, &names, ctx)
        },
        Commands::Config => show_config(ctx),
        Commands::Version => show_version(ctx),
    }
}

fn show_config(ctx: &CommandContext) -> BdeResult<()> {
    let config = ctx.load_config()?;
    ctx.output.emit(&serialize_bdemeta_toml(&config)?);
    Ok(())
}

fn show_version(ctx: &CommandContext) -> BdeResult<()> {
    ctx.output.emit(&version_text());
    Ok(())
}

fn version_text() -> String {
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    format!(
        "bdemeta v{}\nBuilt: {}\nTarget: {}\nRust: {}",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_DATE"),
        target,
        env!("RUSTC_VERSION")
    )
}
