//! Delete Alias Resolver
//!
//! Deletion targets are looked up by exact name or containment only, never
//! by fuzzy score.

use crate::normalizer::normalize;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Normalized alias -> target path, in configuration order
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteAliasTable {
    entries: IndexMap<String, PathBuf>,
}

impl DeleteAliasTable {
    /// Build from configured `alias -> path` pairs. Later duplicates are ignored.
    pub fn new<'a, I>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut entries = IndexMap::new();
        for (alias, target) in aliases {
            let key = normalize(alias);
            if key.is_empty() {
                log::warn!("Ignoring delete alias with empty normalized name: {:?}", alias);
                continue;
            }
            entries.entry(key).or_insert_with(|| PathBuf::from(target));
        }
        Self { entries }
    }

    /// Resolve a spoken alias to its configured target.
    pub fn resolve(&self, spoken: &str) -> Option<&Path> {
        let key = normalize(spoken);
        if key.is_empty() {
            return None;
        }

        if let Some(target) = self.entries.get(&key) {
            return Some(target.as_path());
        }

        self.entries
            .iter()
            .find(|(name, _)| name.contains(key.as_str()) || key.contains(name.as_str()))
            .map(|(name, target)| {
                log::debug!("Delete alias '{}' matched by containment: '{}'", key, name);
                target.as_path()
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
