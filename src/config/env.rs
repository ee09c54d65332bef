//! Environment variable source

use super::key::{normalize_key, Key};
use super::schema::FieldSpec;

/// Prefix shared by every environment variable the resolver reads.
pub const ENV_PREFIX: &str = "LAYERED_CONF";

/// A prefixed variable with its key already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub name: String,
    pub key: Key,
    pub value: String,
}

/// Keep the variables that carry `prefix`, sorted by name.
///
/// Empty values count as unset.
pub fn prefixed_entries<I>(prefix: &str, vars: I) -> Vec<EnvEntry>
where
    I: IntoIterator<Item = (String, String)>,
{
    let head = format!("{}_", prefix.to_ascii_uppercase());

    let mut entries: Vec<EnvEntry> = vars
        .into_iter()
        .filter_map(|(name, value)| {
            let rest = name.strip_prefix(&head)?;
            if value.is_empty() {
                tracing::debug!("Ignoring empty environment variable {}", name);
                return None;
            }
            let key = normalize_key(rest);
            Some(EnvEntry { name, key, value })
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// The variable name that sets `field`, e.g. `LAYERED_CONF_CHILD_GRAND_CHILD_STRING`.
pub fn env_var_name(prefix: &str, field: &FieldSpec) -> String {
    format!("{}_{}", prefix.to_ascii_uppercase(), field.key().as_str().to_ascii_uppercase())
}
