//! Command-line interface for layered-conf
//!
//! Resolves the configuration from flags, environment and file, then logs it.

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::flags::{explicit_flags, schema_args};
use crate::config::{ConfigResolver, ConfigSchema, FileLocation, ENV_PREFIX};

mod output;

/// Log level used until the configuration has been resolved.
const DEFAULT_LOG_LEVEL: Level = Level::INFO;

/// Resolve layered configuration from a YAML file, environment variables and flags
#[derive(Parser, Debug)]
#[command(name = "layered-conf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML config file [default: config/config.yaml]
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the resolved configuration as YAML
    #[arg(long)]
    pub print_config: bool,

    /// Print every setting together with the source it came from
    #[arg(long)]
    pub show_sources: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// The full command: meta flags plus one flag per schema key.
pub fn build_command(schema: &ConfigSchema) -> clap::Command {
    Cli::command().args(schema_args(schema, ENV_PREFIX))
}

pub fn run() -> Result<()> {
    let schema = ConfigSchema::standard()?;
    let mut command = build_command(&schema);
    let matches = command.clone().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut command, "layered-conf", &mut io::stdout());
        return Ok(());
    }

    let location = match cli.config {
        Some(path) => FileLocation::Explicit(path),
        None => FileLocation::Conventional(
            std::env::current_dir().context("Failed resolving working directory")?,
        ),
    };

    let flags = explicit_flags(&schema, &matches);
    let resolver = ConfigResolver::new(schema, location).env_vars(std::env::vars()).flags(flags);

    let resolution = match resolver.resolve() {
        Ok(resolution) => resolution,
        Err(err) => {
            init_tracing(&DEFAULT_LOG_LEVEL.to_string());
            if err.is_decode() {
                tracing::error!(error = %err, "Invalid configuration value");
            } else {
                tracing::error!(error = %err, "Failed to load configuration");
            }
            return Err(err).context("Configuration could not be resolved");
        }
    };

    init_tracing(&resolution.config.loglevel);
    for warning in &resolution.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!(config = ?resolution.config, "Configuration resolved");

    if cli.show_sources {
        output::print_sources(&resolution.settings);
    }
    if cli.print_config {
        output::print_config(&resolution.config)?;
    }

    Ok(())
}

/// Install the stderr subscriber.
///
/// RUST_LOG in the environment always takes precedence; otherwise the
/// resolved `loglevel` is used, falling back to INFO when it is not a level.
fn init_tracing(loglevel: &str) {
    let level = loglevel.trim().parse::<Level>().ok();
    let filter = EnvFilter::builder()
        .with_default_directive(level.unwrap_or(DEFAULT_LOG_LEVEL).into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if level.is_none() {
        tracing::warn!("Unknown log level '{}', using {}", loglevel, DEFAULT_LOG_LEVEL);
    }
}
