//! # bdemeta-cli
//!
//! Resolves BDE-style build units and prints the result.
//!
//! This is the main entry point for the bdemeta CLI tool. It handles command parsing,
//! sets up logging and error handling, and dispatches to the appropriate command handlers.

use std::process::ExitCode;

use bdemeta_core::error::BdeResult;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Resolve BDE-style build units into dependency-ordered build metadata
#[derive(Parser, Debug)]
#[command(name = "bdemeta", version, about = "Resolve BDE-style build units")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: nearest bdemeta.toml or bdemeta.json)
    #[arg(short, long, global = true, value_name = "PATH", env = "BDEMETA_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    /// Search root, searched before configured roots; may be repeated
    #[arg(short, long = "root", global = true, value_name = "DIR")]
    pub roots: Vec<Utf8PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Print the resolved units, dependencies first
    Walk {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
    /// Print the resolved units as JSON
    Show {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
    /// Print the resolved graph in Graphviz DOT format
    Dot {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
    /// Print the component sources and test drivers of the resolved packages
    Components {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
    /// Print the units that directly depend on a unit
    Dependents {
        /// Unit whose dependents are listed
        name: String,
        /// Units whose closure is searched
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
    /// Print the merged configuration as TOML
    Config,
    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting bdemeta v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&err));
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> BdeResult<()> {
    let ctx = CommandContext::new(cli.config, cli.roots)?;
    commands::dispatch_command(cli.command, &ctx)
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bdemeta={level},bdemeta_core={level},bdemeta_config={level},bdemeta_resolver={level}"
        ))
    });

    // stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("bdemeta encountered an unexpected error: {}", panic_info);
        eprintln!("bdemeta crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
