//! Shared application state type.

use std::sync::Arc;

use infergate_core::{
    ApiKeyStore, ChatLogPort, DEFAULT_RELAY_QUEUE_CAPACITY, GatewayError, ModelEntry,
    ModelRegistryPort, NoopChatLog, STOP_TOKEN,
};
use infergate_rpc::{BackendConnector, InferenceBackend};
use tracing::debug;

use crate::error::backend_error;

/// Application state shared across all handlers.
pub type AppState = Arc<GatewayContext>;

/// Everything a request needs: where models live, how to reach them,
/// and where finished exchanges are recorded.
#[derive(Debug, Clone)]
pub struct GatewayContext {
    pub registry: Arc<dyn ModelRegistryPort>,
    pub connector: Arc<dyn BackendConnector>,
    pub chat_log: Arc<dyn ChatLogPort>,
    /// `None` disables authentication.
    pub api_keys: Option<Arc<dyn ApiKeyStore>>,
    pub relay_queue_capacity: usize,
    pub stop_token: String,
}

impl GatewayContext {
    pub fn new(registry: Arc<dyn ModelRegistryPort>, connector: Arc<dyn BackendConnector>) -> Self {
        Self {
            registry,
            connector,
            chat_log: Arc::new(NoopChatLog),
            api_keys: None,
            relay_queue_capacity: DEFAULT_RELAY_QUEUE_CAPACITY,
            stop_token: STOP_TOKEN.to_string(),
        }
    }

    #[must_use]
    pub fn with_chat_log(mut self, chat_log: Arc<dyn ChatLogPort>) -> Self {
        self.chat_log = chat_log;
        self
    }

    #[must_use]
    pub fn with_api_keys(mut self, api_keys: Arc<dyn ApiKeyStore>) -> Self {
        self.api_keys = Some(api_keys);
        self
    }

    #[must_use]
    pub const fn with_relay_queue_capacity(mut self, capacity: usize) -> Self {
        self.relay_queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_stop_token(mut self, stop_token: impl Into<String>) -> Self {
        self.stop_token = stop_token.into();
        self
    }

    /// Resolve `model` and dial its backend.
    ///
    /// Resolution happens first, so an unknown model never reaches the
    /// network. The connection is owned by the caller and dropped with
    /// the request.
    pub async fn connect(
        &self,
        model: &str,
    ) -> Result<(ModelEntry, Box<dyn InferenceBackend>), GatewayError> {
        let entry = self.registry.resolve(model)?;
        debug!(model = %entry.name, address = %entry.address, "Connecting to backend");
        let backend = self
            .connector
            .connect(&entry.address)
            .await
            .map_err(|e| backend_error(model, e))?;
        Ok((entry, backend))
    }
}
