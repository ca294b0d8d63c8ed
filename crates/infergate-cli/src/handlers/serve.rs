//! `serve` command handler.

use std::sync::Arc;

use infergate_proxy::{create_router, serve};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Run the gateway until Ctrl-C.
///
/// The registry watcher and the server share one cancellation token, so
/// shutdown stops reloads and drains in-flight requests together.
pub async fn execute(ctx: CliContext) -> Result<(), CliError> {
    let gateway = ctx.gateway_context();
    let CliContext {
        settings,
        watcher,
        shutdown: cancel,
        ..
    } = ctx;

    let watcher = watcher.spawn();

    let listener = TcpListener::bind(settings.effective_listen_addr()).await?;
    let router = create_router(Arc::new(gateway), settings.effective_route_prefix());

    info!(
        prefix = %settings.effective_route_prefix(),
        auth = settings.effective_require_auth(),
        "Starting gateway"
    );

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => {
                error!(error = %e, "Failed to listen for Ctrl-C");
                return;
            }
        }
        shutdown.cancel();
    });

    let result = serve(listener, router, cancel.clone()).await;

    cancel.cancel();
    if let Err(e) = watcher.await {
        warn!(error = %e, "Registry watcher task failed");
    }

    result.map_err(|e| CliError::Server(format!("{e:#}")))
}
