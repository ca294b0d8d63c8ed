//! Model registry entries and snapshots.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A model the gateway can route to.
///
/// Entries are immutable once loaded. A registry reload builds a fresh
/// [`ModelSnapshot`] rather than editing entries in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Unique model name, as clients send it in the `model` field.
    pub name: String,
    /// Backend address (`host:port`, optionally with a scheme).
    pub address: String,
    pub owned_by: String,
    pub description: String,
    /// Capabilities the backend advertises (e.g. `chat`, `embeddings`).
    pub tasks: BTreeSet<String>,
    /// Permission labels passed through to the model listing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permission: Vec<String>,
}

/// An immutable name-to-entry mapping.
///
/// Iteration order is by model name so listings are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSnapshot {
    models: BTreeMap<String, ModelEntry>,
}

impl ModelSnapshot {
    /// Build a snapshot from entries. A later entry with the same name
    /// replaces an earlier one.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = ModelEntry>) -> Self {
        let models = entries
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();
        Self { models }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModelEntry> {
        self.models.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelEntry> {
        self.models.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
