use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::contribution::normalize_name;

/// Names barred from future admission into any month bucket.
///
/// Matching is trimmed and case-insensitive; blacklisting is never applied
/// retroactively to records already in the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BlacklistRegistry {
    // normalized name -> display name as first entered
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl BlacklistRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name; returns false when it was already present.
    pub fn add(&mut self, name: &str) -> bool {
        let display = name.trim().to_string();
        if display.is_empty() {
            return false;
        }
        self.entries
            .insert(normalize_name(name), display)
            .is_none()
    }

    /// Removes a name; returns false when it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(&normalize_name(name)).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_name(name))
    }

    /// Display names in alphabetical order of their normalized form.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
