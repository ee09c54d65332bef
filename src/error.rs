//! Error types for configuration resolution.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::Source;

/// Result alias for resolver operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Everything that can stop a configuration from resolving.
///
/// A missing file at the conventional location is not an error; it is
/// recorded as a [`crate::config::Warning`] instead.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A config file passed explicitly does not exist.
    #[error("config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The config file exists but could not be read.
    #[error("failed reading config file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML, or its top level is not a mapping.
    #[error("malformed config file {}: {reason}", path.display())]
    FileMalformed { path: PathBuf, reason: String },

    /// A value could not be coerced to the kind its key declares.
    #[error("cannot decode '{key}' from {source_kind}: expected {expected}, got {found}")]
    Decode { key: String, source_kind: Source, expected: String, found: String },

    /// The merged layers did not fit the configuration record.
    #[error("cannot decode configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// The schema itself is inconsistent.
    #[error("invalid schema: {0}")]
    Schema(String),
}

impl ConfigError {
    /// True when the inputs were read but a value had the wrong type.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Extract(_))
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(Box::new(err))
    }
}
