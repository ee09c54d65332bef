//! Key-name normalization
//!
//! Flags (`child.grand-child.string`), environment variables
//! (`CHILD_GRAND_CHILD_STRING` after prefix stripping) and flattened file keys
//! (`child.grand_child.string`) all fold into one canonical key.

use std::fmt;

/// Characters treated as path or word separators in any key representation.
const SEPARATORS: [char; 3] = ['.', '-', '_'];

/// A canonical configuration key: lowercase, underscore-joined segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key with every separator removed.
    ///
    /// Environment variables cannot tell a word break from a path break, so
    /// `GRANDCHILD` and `GRAND_CHILD` both have to reach `grand_child`.
    pub fn compact(&self) -> String {
        self.0.chars().filter(|c| *c != '_').collect()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize any raw key representation into its canonical form.
///
/// Lowercases, trims, and collapses every run of `.`, `-` or `_` into a single
/// `_`. Leading and trailing separators are dropped.
pub fn normalize_key(raw: &str) -> Key {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for ch in raw.trim().chars() {
        if SEPARATORS.contains(&ch) {
            pending_sep = !out.is_empty();
            continue;
        }
        if pending_sep {
            out.push('_');
            pending_sep = false;
        }
        out.extend(ch.to_lowercase());
    }

    Key(out)
}

/// Join nested mapping segments into a dotted path before normalization.
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(".")
}
