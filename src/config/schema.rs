//! The fixed set of recognized configuration keys

use std::collections::HashMap;
use std::ops::RangeInclusive;

use super::coerce::{Value, ValueKind};
use super::key::{normalize_key, Key};
use crate::error::{ConfigError, Result};

/// Declaration of one configuration key.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Dotted path in the shape of the configuration record, e.g.
    /// `child.grand_child.string`.
    pub path: &'static str,
    pub kind: ValueKind,
    pub default: Value,
    pub description: &'static str,
    pub short: Option<char>,
    /// Accepted values for integer keys; `None` means any `i64`.
    pub range: Option<RangeInclusive<i64>>,
}

impl FieldSpec {
    pub fn new(path: &'static str, kind: ValueKind, default: Value, description: &'static str) -> Self {
        Self { path, kind, default, description, short: None, range: None }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn range(mut self, range: RangeInclusive<i64>) -> Self {
        self.range = Some(range);
        self
    }

    pub fn key(&self) -> Key {
        normalize_key(self.path)
    }

    /// Long flag name: the dotted path with word breaks spelled as hyphens.
    pub fn flag_name(&self) -> String {
        self.path.replace('_', "-")
    }
}

/// Every key the resolver recognizes, with its kind and default.
#[derive(Debug, Clone)]
pub struct ConfigSchema {
    fields: Vec<FieldSpec>,
    by_key: HashMap<Key, usize>,
    by_compact: HashMap<String, usize>,
}

impl ConfigSchema {
    /// Build a schema, rejecting duplicate keys and keys whose compact forms
    /// collide (they would be ambiguous as environment variables).
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self> {
        let mut by_key = HashMap::new();
        let mut by_compact = HashMap::new();

        for (idx, field) in fields.iter().enumerate() {
            if field.default.kind() != field.kind {
                return Err(ConfigError::Schema(format!(
                    "default for '{}' is not {}",
                    field.path,
                    field.kind.describe()
                )));
            }

            if let (Value::Integer(n), Some(range)) = (&field.default, &field.range) {
                if !range.contains(n) {
                    return Err(ConfigError::Schema(format!(
                        "default for '{}' is outside {}..={}",
                        field.path,
                        range.start(),
                        range.end()
                    )));
                }
            }

            let key = field.key();
            if key.as_str().is_empty() {
                return Err(ConfigError::Schema(format!("empty key path '{}'", field.path)));
            }
            if let Some(prev) = by_compact.insert(key.compact(), idx) {
                return Err(ConfigError::Schema(format!(
                    "'{}' and '{}' normalize to the same key",
                    fields[prev].path, field.path
                )));
            }
            by_key.insert(key, idx);
        }

        Ok(Self { fields, by_key, by_compact })
    }

    /// The schema this binary exposes.
    pub fn standard() -> Result<Self> {
        Self::new(vec![
            FieldSpec::new("loglevel", ValueKind::String, Value::String("info".into()), "Log level"),
            FieldSpec::new(
                "port",
                ValueKind::Integer,
                Value::Integer(9000),
                "A port number that this program will listen on",
            )
            .short('p')
            .range(i16::MIN.into()..=i16::MAX.into()),
            FieldSpec::new("top_string", ValueKind::String, Value::String(String::new()), "Top-level string"),
            FieldSpec::new("child.enabled", ValueKind::Boolean, Value::Boolean(false), "Enable child"),
            FieldSpec::new("child.strings", ValueKind::StringList, Value::List(Vec::new()), "Child strings"),
            FieldSpec::new(
                "child.grand_child.string",
                ValueKind::String,
                Value::String(String::new()),
                "Grand-child string",
            ),
        ])
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn lookup(&self, key: &Key) -> Option<&FieldSpec> {
        self.by_key.get(key).map(|&idx| &self.fields[idx])
    }

    /// Exact match first, then the separator-free form.
    pub fn lookup_env(&self, key: &Key) -> Option<&FieldSpec> {
        self.lookup(key)
            .or_else(|| self.by_compact.get(&key.compact()).map(|&idx| &self.fields[idx]))
    }

    /// The leaf whose path is a proper prefix of the dotted `raw` path, e.g.
    /// `port` for `port.a`.
    pub fn leaf_prefix(&self, raw: &str) -> Option<&FieldSpec> {
        raw.match_indices('.')
            .map(|(idx, _)| &raw[..idx])
            .find_map(|prefix| self.lookup(&normalize_key(prefix)))
    }

    /// True when `key` names a nested section (e.g. `child`) rather than a leaf.
    pub fn is_section(&self, key: &Key) -> bool {
        let prefix = format!("{}_", key.as_str());
        self.by_key.keys().any(|k| k.as_str().starts_with(&prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schema_is_valid() {
        let schema = ConfigSchema::standard().expect("schema");
        assert_eq!(schema.fields().len(), 6);
        let port = schema.lookup(&normalize_key("port")).expect("port");
        assert_eq!(port.default, Value::Integer(9000));
        assert_eq!(port.short, Some('p'));
    }

    #[test]
    fn test_flag_names_use_hyphens() {
        let schema = ConfigSchema::standard().expect("schema");
        let names: Vec<String> = schema.fields().iter().map(FieldSpec::flag_name).collect();
        assert!(names.contains(&"top-string".to_string()));
        assert!(names.contains(&"child.grand-child.string".to_string()));
        assert!(names.contains(&"child.enabled".to_string()));
    }

    #[test]
    fn test_lookup_env_falls_back_to_compact() {
        let schema = ConfigSchema::standard().expect("schema");
        let field = schema.lookup_env(&normalize_key("CHILD_GRANDCHILD_STRING")).expect("field");
        assert_eq!(field.path, "child.grand_child.string");
        assert!(schema.lookup(&normalize_key("CHILD_GRANDCHILD_STRING")).is_none());
    }

    #[test]
    fn test_sections_are_not_leaves() {
        let schema = ConfigSchema::standard().expect("schema");
        assert!(schema.is_section(&normalize_key("child")));
        assert!(schema.is_section(&normalize_key("child.grand_child")));
        assert!(!schema.is_section(&normalize_key("port")));
    }

    #[test]
    fn test_port_is_a_signed_16_bit_integer() {
        let schema = ConfigSchema::standard().expect("schema");
        let port = schema.lookup(&normalize_key("port")).expect("port");
        assert_eq!(port.range, Some(-32768..=32767));
    }

    #[test]
    fn test_leaf_prefix_finds_enclosing_leaf() {
        let schema = ConfigSchema::standard().expect("schema");
        assert_eq!(schema.leaf_prefix("port.a").map(|f| f.path), Some("port"));
        assert_eq!(
            schema.leaf_prefix("child.grand-child.string.x.y").map(|f| f.path),
            Some("child.grand_child.string")
        );
        assert!(schema.leaf_prefix("child.extra").is_none());
        assert!(schema.leaf_prefix("port").is_none());
    }

    #[test]
    fn test_default_outside_range_is_rejected() {
        let result = ConfigSchema::new(vec![FieldSpec::new(
            "port",
            ValueKind::Integer,
            Value::Integer(40000),
            "",
        )
        .range(i16::MIN.into()..=i16::MAX.into())]);
        assert!(matches!(result, Err(ConfigError::Schema(_))));
    }

    #[test]
    fn test_colliding_keys_are_rejected() {
        let result = ConfigSchema::new(vec![
            FieldSpec::new("a.bc", ValueKind::String, Value::String(String::new()), ""),
            FieldSpec::new("ab.c", ValueKind::String, Value::String(String::new()), ""),
        ]);
        assert!(matches!(result, Err(ConfigError::Schema(_))));
    }

    #[test]
    fn test_mismatched_default_is_rejected() {
        let result = ConfigSchema::new(vec![FieldSpec::new(
            "port",
            ValueKind::Integer,
            Value::String("9000".into()),
            "",
        )]);
        assert!(matches!(result, Err(ConfigError::Schema(_))));
    }
}
