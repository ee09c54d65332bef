//! layered-conf: hierarchical application configuration
//!
//! Merges a YAML file, environment variables and command-line flags into one
//! typed [`domain::Config`], with flags taking precedence over the environment,
//! the environment over the file, and the file over schema defaults.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;

pub use config::{ConfigResolver, ConfigSchema, Resolution};
pub use domain::Config;
pub use error::ConfigError;
