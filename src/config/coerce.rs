//! Type coercion of raw inputs into typed setting values

use figment::value::{Num, Tag, Value as FigmentValue};
use std::fmt;

use super::schema::FieldSpec;
use super::Source;
use crate::error::{ConfigError, Result};

/// Declared type of a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Boolean,
    StringList,
}

impl ValueKind {
    pub fn describe(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
            Self::StringList => "a list of strings",
        }
    }
}

/// A coerced, typed setting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
    List(Vec<String>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::List(_) => ValueKind::StringList,
        }
    }

    /// Render the value the way a flag would accept it, for `--help` defaults.
    pub fn to_flag_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::List(items) => items.join(","),
        }
    }

    pub(crate) fn to_figment(&self) -> FigmentValue {
        match self {
            Self::String(s) => FigmentValue::String(Tag::Default, s.clone()),
            Self::Integer(n) => FigmentValue::Num(Tag::Default, Num::I64(*n)),
            Self::Boolean(b) => FigmentValue::Bool(Tag::Default, *b),
            Self::List(items) => FigmentValue::Array(
                Tag::Default,
                items.iter().map(|s| FigmentValue::String(Tag::Default, s.clone())).collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::List(items) => write!(f, "{items:?}"),
        }
    }
}

/// An uncoerced value as it arrived from its source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Flag argument or environment variable text.
    Text(String),
    /// Repeated or delimited flag values.
    List(Vec<String>),
    /// A scalar or sequence from the YAML file.
    Yaml(serde_yaml::Value),
}

impl RawValue {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Text(s) => format!("{s:?}"),
            Self::List(items) => format!("{items:?}"),
            Self::Yaml(v) => describe_yaml(v),
        }
    }
}

/// Coerce `raw` into the kind `field` declares, enforcing its integer range.
pub fn coerce(field: &FieldSpec, raw: &RawValue, source: Source) -> Result<Value> {
    let decode_error = |expected: String| ConfigError::Decode {
        key: field.path.to_string(),
        source_kind: source,
        expected,
        found: raw.describe(),
    };

    let coerced = match field.kind {
        ValueKind::String => as_string(raw).map(Value::String),
        ValueKind::Integer => as_integer(raw).map(Value::Integer),
        ValueKind::Boolean => as_boolean(raw).map(Value::Boolean),
        ValueKind::StringList => as_list(raw).map(Value::List),
    };
    let value = coerced.ok_or_else(|| decode_error(field.kind.describe().to_string()))?;

    if let (Value::Integer(n), Some(range)) = (&value, &field.range) {
        if !range.contains(n) {
            return Err(decode_error(format!(
                "an integer between {} and {}",
                range.start(),
                range.end()
            )));
        }
    }
    Ok(value)
}

fn as_string(raw: &RawValue) -> Option<String> {
    match raw {
        RawValue::Text(s) => Some(s.clone()),
        RawValue::List(_) => None,
        RawValue::Yaml(v) => yaml_scalar_text(v),
    }
}

fn as_integer(raw: &RawValue) -> Option<i64> {
    match raw {
        RawValue::Text(s) => s.trim().parse().ok(),
        RawValue::List(_) => None,
        RawValue::Yaml(serde_yaml::Value::Number(n)) => n.as_i64(),
        RawValue::Yaml(serde_yaml::Value::String(s)) => s.trim().parse().ok(),
        RawValue::Yaml(_) => None,
    }
}

fn as_boolean(raw: &RawValue) -> Option<bool> {
    match raw {
        RawValue::Text(s) => parse_bool(s),
        RawValue::List(_) => None,
        RawValue::Yaml(serde_yaml::Value::Bool(b)) => Some(*b),
        RawValue::Yaml(serde_yaml::Value::String(s)) => parse_bool(s),
        RawValue::Yaml(serde_yaml::Value::Number(n)) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        RawValue::Yaml(_) => None,
    }
}

fn as_list(raw: &RawValue) -> Option<Vec<String>> {
    match raw {
        RawValue::Text(s) => Some(parse_csv(s)),
        RawValue::List(items) => Some(items.iter().flat_map(|item| parse_csv(item)).collect()),
        RawValue::Yaml(serde_yaml::Value::Sequence(items)) => {
            items.iter().map(yaml_scalar_text).collect()
        }
        RawValue::Yaml(serde_yaml::Value::String(s)) => Some(parse_csv(s)),
        RawValue::Yaml(_) => None,
    }
}

/// Accepts the conventional spellings: `1 t T TRUE true True` and their
/// false counterparts.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated string, trimming whitespace and discarding empty
/// segments.
pub fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

fn yaml_scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn describe_yaml(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => format!("{s:?}"),
        serde_yaml::Value::Sequence(_) => "a sequence".to_string(),
        serde_yaml::Value::Mapping(_) => "a mapping".to_string(),
        serde_yaml::Value::Tagged(tagged) => format!("a value tagged {}", tagged.tag),
    }
}
