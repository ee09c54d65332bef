//! Resolve defaults, file, environment and flags into one `Config`

use figment::Figment;
use std::fmt;
use std::path::PathBuf;

use super::coerce::{coerce, RawValue, Value};
use super::env::{prefixed_entries, ENV_PREFIX};
use super::key::{normalize_key, Key};
use super::layer::{Layer, Source};
use super::loader::{load_file, FileLocation};
use super::schema::{ConfigSchema, FieldSpec};
use crate::domain::Config;
use crate::error::{ConfigError, Result};

/// The winning value for one schema key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub key: Key,
    pub path: &'static str,
    pub value: Value,
    pub source: Source,
    pub default: Value,
}

/// Non-fatal conditions noticed while resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// No config file at any conventional location.
    FileNotFound { searched: Vec<PathBuf> },
    /// A file key or prefixed environment variable the schema does not know.
    UnknownKey { name: String, source: Source },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { searched } => {
                let paths: Vec<String> = searched.iter().map(|p| p.display().to_string()).collect();
                write!(f, "Cannot find config file ({}), ignoring", paths.join(", "))
            }
            Self::UnknownKey { name, source } => {
                write!(f, "Ignoring unrecognized key '{name}' from {source}")
            }
        }
    }
}

/// Output of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub config: Config,
    /// One entry per schema key, in schema order.
    pub settings: Vec<Setting>,
    pub warnings: Vec<Warning>,
}

/// Merges every configuration source by precedence:
/// explicit flag > environment variable > config file > schema default.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    schema: ConfigSchema,
    file: FileLocation,
    env_prefix: String,
    env: Vec<(String, String)>,
    flags: Vec<(String, RawValue)>,
}

impl ConfigResolver {
    pub fn new(schema: ConfigSchema, file: FileLocation) -> Self {
        Self {
            schema,
            file,
            env_prefix: ENV_PREFIX.to_string(),
            env: Vec::new(),
            flags: Vec::new(),
        }
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Snapshot of the environment, usually `std::env::vars()`.
    pub fn env_vars<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env = vars.into_iter().collect();
        self
    }

    /// Flags the user supplied explicitly, as `(flag name, raw value)`.
    pub fn flags<I>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = (String, RawValue)>,
    {
        self.flags = flags.into_iter().collect();
        self
    }

    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }

    /// Run the full resolution pass.
    ///
    /// Reads the file once; calling it again with the same inputs and an
    /// unchanged file yields an identical [`Resolution`].
    pub fn resolve(&self) -> Result<Resolution> {
        let mut warnings = Vec::new();

        // Ascending precedence: later layers override earlier ones.
        let layers = [
            Layer::defaults(self.schema.fields()),
            self.file_layer(&mut warnings)?,
            self.env_layer(&mut warnings)?,
            self.flag_layer(&mut warnings)?,
        ];

        let figment = layers.iter().fold(Figment::new(), |fig, layer| fig.merge(layer.clone()));
        let config: Config = figment.extract()?;

        let settings = self
            .schema
            .fields()
            .iter()
            .map(|field| winning_setting(field, &layers))
            .collect();

        Ok(Resolution { config, settings, warnings })
    }

    fn file_layer(&self, warnings: &mut Vec<Warning>) -> Result<Layer> {
        let mut layer = Layer::new(Source::File);

        let Some(file) = load_file(&self.file)? else {
            warnings.push(Warning::FileNotFound { searched: self.file.candidates() });
            return Ok(layer);
        };

        for (raw_key, value) in file.entries {
            let key = normalize_key(&raw_key);
            let raw = RawValue::Yaml(value);
            let Some(field) = self.schema.lookup(&key) else {
                if let Some(leaf) = self.schema.leaf_prefix(&raw_key) {
                    return Err(ConfigError::Decode {
                        key: leaf.path.to_string(),
                        source_kind: Source::File,
                        expected: leaf.kind.describe().to_string(),
                        found: "a mapping".to_string(),
                    });
                }
                if self.schema.is_section(&key) {
                    return Err(ConfigError::Decode {
                        key: raw_key,
                        source_kind: Source::File,
                        expected: "a mapping".to_string(),
                        found: raw.describe(),
                    });
                }
                warnings.push(Warning::UnknownKey { name: raw_key, source: Source::File });
                continue;
            };
            let value = coerce(field, &raw, Source::File)?;
            if layer.insert(field, value).is_some() {
                tracing::debug!("{} sets {} more than once; last one wins", file.path.display(), field.path);
            }
        }

        Ok(layer)
    }

    fn env_layer(&self, warnings: &mut Vec<Warning>) -> Result<Layer> {
        let mut layer = Layer::new(Source::Environment);

        for entry in prefixed_entries(&self.env_prefix, self.env.iter().cloned()) {
            let Some(field) = self.schema.lookup_env(&entry.key) else {
                warnings.push(Warning::UnknownKey { name: entry.name, source: Source::Environment });
                continue;
            };
            let value = coerce(field, &RawValue::Text(entry.value), Source::Environment)?;
            if layer.insert(field, value).is_some() {
                tracing::debug!("{} is set by more than one environment variable", field.path);
            }
        }

        Ok(layer)
    }

    fn flag_layer(&self, warnings: &mut Vec<Warning>) -> Result<Layer> {
        let mut layer = Layer::new(Source::Flag);

        for (name, raw) in &self.flags {
            let Some(field) = self.schema.lookup(&normalize_key(name)) else {
                warnings.push(Warning::UnknownKey { name: name.clone(), source: Source::Flag });
                continue;
            };
            let value = coerce(field, raw, Source::Flag)?;
            layer.insert(field, value);
        }

        if !layer.is_empty() {
            tracing::debug!("{} settings supplied on the command line", layer.len());
        }
        Ok(layer)
    }
}

/// Pick the value from the highest-precedence layer that has one.
fn winning_setting(field: &FieldSpec, layers: &[Layer]) -> Setting {
    let (source, value) = layers
        .iter()
        .rev()
        .find_map(|layer| layer.get(field.path).map(|v| (layer.source(), v.clone())))
        .unwrap_or((Source::Default, field.default.clone()));

    Setting { key: field.key(), path: field.path, value, source, default: field.default.clone() }
}
