//! Model registry port.

use std::fmt;
use std::sync::Arc;

use crate::domain::{ModelEntry, ModelSnapshot};
use crate::error::GatewayError;

/// Read access to the current model registry.
///
/// Implementations publish whole snapshots; a caller holding one never
/// observes a partially reloaded registry.
pub trait ModelRegistryPort: Send + Sync + fmt::Debug {
    /// The snapshot current at call time.
    fn snapshot(&self) -> Arc<ModelSnapshot>;

    /// Look up a model by name in the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::ModelNotFound` when the name is unknown.
    fn resolve(&self, name: &str) -> Result<ModelEntry, GatewayError> {
        self.snapshot()
            .get(name)
            .cloned()
            .ok_or_else(|| GatewayError::ModelNotFound(name.to_string()))
    }
}
