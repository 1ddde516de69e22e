// src/core/key.rs
//
// Composite key shared by the reference loader and the matcher.
// Both sides must go through `KeyPolicy::key` so the same person always
// lands on the same key.

use std::fmt;

use super::sanitize::digits_only;
use crate::config::consts::KEY_DELIMITER;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPolicy {
    pub delimiter: char,
    pub case_fold: bool,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self { delimiter: KEY_DELIMITER, case_fold: true }
    }
}

impl KeyPolicy {
    /// Name is trimmed, identifier reduced to its digits.
    /// Returns `None` when either part ends up empty.
    pub fn key(&self, name: &str, identifier: &str) -> Option<CompositeKey> {
        let name = name.trim();
        let id = digits_only(identifier);
        if name.is_empty() || id.is_empty() { return None; }

        let name = if self.case_fold { name.to_lowercase() } else { s!(name) };
        let mut k = String::with_capacity(name.len() + id.len() + 1);
        k.push_str(&name);
        k.push(self.delimiter);
        k.push_str(&id);
        Some(CompositeKey(k))
    }
}
