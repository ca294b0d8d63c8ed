//! CLI bootstrap - the composition root.
//!
//! The only place concrete adapters are instantiated:
//! - Model registry snapshot (via infergate-registry)
//! - SQLite stores (via infergate-db)
//! - gRPC connector (via infergate-rpc)
//!
//! Handlers receive what they need from here and never open connections
//! themselves.

use std::path::Path;
use std::sync::Arc;

use infergate_core::{GatewaySettings, SnapshotRegistry};
use infergate_db::{Stores, build_stores, setup_database};
use infergate_proxy::GatewayContext;
use infergate_registry::{RegistryWatcher, load_snapshot};
use infergate_rpc::GrpcConnector;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::CliError;

/// Fully composed context for the `serve` command.
pub struct CliContext {
    pub settings: GatewaySettings,
    /// Shared with the reload watcher.
    pub registry: Arc<SnapshotRegistry>,
    /// Created before the initial load so no definition change is missed.
    pub watcher: RegistryWatcher,
    /// Stops the watcher and the server together.
    pub shutdown: CancellationToken,
    pub stores: Stores,
}

impl CliContext {
    /// Build the request-handling context for the HTTP layer.
    pub fn gateway_context(&self) -> GatewayContext {
        let connector = GrpcConnector::new(self.settings.effective_connect_timeout());

        let context = GatewayContext::new(self.registry.clone(), Arc::new(connector))
            .with_chat_log(self.stores.chat_log.clone())
            .with_relay_queue_capacity(self.settings.effective_relay_queue_capacity())
            .with_stop_token(self.settings.effective_stop_token());

        if self.settings.effective_require_auth() {
            context.with_api_keys(self.stores.api_keys.clone())
        } else {
            context
        }
    }
}

/// Load the model definitions named by `settings` into a fresh registry.
pub fn load_registry(settings: &GatewaySettings) -> Result<Arc<SnapshotRegistry>, CliError> {
    let dir = Path::new(settings.effective_config_path());
    let snapshot = load_snapshot(dir)?;
    info!(dir = %dir.display(), models = snapshot.len(), "Loaded model definitions");
    Ok(Arc::new(SnapshotRegistry::new(snapshot)))
}

/// Open the database and build the stores on top of it.
pub async fn open_stores(settings: &GatewaySettings) -> Result<Stores, CliError> {
    let pool = setup_database(settings.effective_database_url())
        .await
        .map_err(|e| CliError::Database(format!("{e:#}")))?;
    Ok(build_stores(pool))
}

/// Compose everything `serve` needs.
pub async fn bootstrap(settings: GatewaySettings) -> Result<CliContext, CliError> {
    let shutdown = CancellationToken::new();
    let registry = Arc::new(SnapshotRegistry::default());
    let watcher = RegistryWatcher::new(
        settings.effective_config_path(),
        Arc::clone(&registry),
        settings.effective_reload_interval(),
        shutdown.child_token(),
    );
    let models = watcher.load_initial()?;
    info!(dir = %settings.effective_config_path(), models, "Loaded model definitions");

    let stores = open_stores(&settings).await?;

    Ok(CliContext {
        settings,
        registry,
        watcher,
        shutdown,
        stores,
    })
}
