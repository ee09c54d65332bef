//! One source's typed values, exposed to figment as a provider

use figment::value::{Dict, Map, Tag, Value as FigmentValue};
use figment::{Metadata, Profile, Provider};
use std::collections::BTreeMap;
use std::fmt;

use super::coerce::Value;
use super::schema::FieldSpec;

/// Where a setting came from, in ascending order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    Default,
    File,
    Environment,
    Flag,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::File => "config file",
            Self::Environment => "environment variable",
            Self::Flag => "command-line flag",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coerced values from a single source, keyed by schema path.
#[derive(Debug, Clone)]
pub struct Layer {
    source: Source,
    values: BTreeMap<&'static str, Value>,
}

impl Layer {
    pub fn new(source: Source) -> Self {
        Self { source, values: BTreeMap::new() }
    }

    /// Layer holding every schema default.
    pub fn defaults<'a>(fields: impl IntoIterator<Item = &'a FieldSpec>) -> Self {
        let mut layer = Self::new(Source::Default);
        for field in fields {
            layer.insert(field, field.default.clone());
        }
        layer
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Set `field`, replacing any earlier value from the same source.
    pub fn insert(&mut self, field: &FieldSpec, value: Value) -> Option<Value> {
        self.values.insert(field.path, value)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Provider for Layer {
    fn metadata(&self) -> Metadata {
        Metadata::named(self.source.label())
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut root = Dict::new();
        for (path, value) in &self.values {
            insert_nested(&mut root, path, value.to_figment());
        }
        Ok(Profile::Default.collect(root))
    }
}

/// Place `value` at dotted `path`, creating intermediate dictionaries.
fn insert_nested(dict: &mut Dict, path: &str, value: FigmentValue) {
    match path.split_once('.') {
        None => {
            dict.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = dict
                .entry(head.to_string())
                .or_insert_with(|| FigmentValue::Dict(Tag::Default, Dict::new()));
            if let FigmentValue::Dict(_, child) = entry {
                insert_nested(child, rest, value);
            }
        }
    }
}
