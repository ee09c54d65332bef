//! Configuration loading and merging
//!
//! Handles loading from the config file, environment variables, and CLI flags
//! with proper precedence (CLI > Env > File > Defaults).

pub mod coerce;
pub mod env;
pub mod flags;
pub mod key;
pub mod layer;
pub mod loader;
pub mod resolve;
pub mod schema;

pub use coerce::{RawValue, Value, ValueKind};
pub use env::ENV_PREFIX;
pub use key::{normalize_key, Key};
pub use layer::Source;
pub use loader::{load_file, FileLocation};
pub use resolve::{ConfigResolver, Resolution, Setting, Warning};
pub use schema::{ConfigSchema, FieldSpec};
