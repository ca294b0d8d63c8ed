//! Snapshot-based model registry.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::domain::ModelSnapshot;
use crate::ports::ModelRegistryPort;

/// Model registry backed by an atomically swapped snapshot.
///
/// Readers load the current `Arc<ModelSnapshot>` without locking. The
/// reload path builds a complete new snapshot and publishes it in one
/// store, so no reader can see a half-applied reload.
pub struct SnapshotRegistry {
    current: ArcSwap<ModelSnapshot>,
}

impl SnapshotRegistry {
    #[must_use]
    pub fn new(initial: ModelSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Replace the whole registry.
    pub fn publish(&self, snapshot: ModelSnapshot) {
        let count = snapshot.len();
        self.current.store(Arc::new(snapshot));
        info!(models = count, "Published model registry snapshot");
    }
}

impl Default for SnapshotRegistry {
    fn default() -> Self {
        Self::new(ModelSnapshot::default())
    }
}

impl fmt::Debug for SnapshotRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotRegistry")
            .field("models", &self.current.load().len())
            .finish()
    }
}

impl ModelRegistryPort for SnapshotRegistry {
    fn snapshot(&self) -> Arc<ModelSnapshot> {
        self.current.load_full()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::thread;

    use super::*;
    use crate::GatewayError;
    use crate::domain::ModelEntry;

    fn entry(name: &str, address: &str) -> ModelEntry {
        ModelEntry {
            name: name.to_string(),
            address: address.to_string(),
            owned_by: "test".to_string(),
            description: String::new(),
            tasks: BTreeSet::new(),
            permission: Vec::new(),
        }
    }

    #[test]
    fn test_resolve_unknown_model() {
        let registry = SnapshotRegistry::default();
        assert_eq!(
            registry.resolve("missing"),
            Err(GatewayError::ModelNotFound("missing".into()))
        );
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let registry = SnapshotRegistry::new(ModelSnapshot::from_entries([entry("a", "a:1")]));
        let before = registry.snapshot();

        registry.publish(ModelSnapshot::from_entries([entry("b", "b:1")]));

        // A held snapshot is unaffected by the reload.
        assert!(before.get("a").is_some());
        assert!(registry.resolve("a").is_err());
        assert_eq!(registry.resolve("b").unwrap().address, "b:1");
    }

    #[test]
    fn test_readers_never_see_partial_snapshot() {
        let registry = Arc::new(SnapshotRegistry::new(ModelSnapshot::from_entries([
            entry("x", "v0:1"),
            entry("y", "v0:1"),
        ])));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        let snap = registry.snapshot();
                        let x = &snap.get("x").unwrap().address;
                        let y = &snap.get("y").unwrap().address;
                        assert_eq!(x, y);
                    }
                })
            })
            .collect();

        for version in 1..100 {
            let address = format!("v{version}:1");
            registry.publish(ModelSnapshot::from_entries([
                entry("x", &address),
                entry("y", &address),
            ]));
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
