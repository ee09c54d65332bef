//! The resolved configuration record

use serde::{Deserialize, Serialize};

/// Root of the resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub loglevel: String,
    /// Port this program listens on.
    pub port: i16,
    pub top_string: String,
    pub child: ChildConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildConfig {
    pub enabled: bool,
    pub strings: Vec<String>,
    pub grand_child: GrandChildConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrandChildConfig {
    pub string: String,
}
