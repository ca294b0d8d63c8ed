//! Router construction and the serve loop.

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::authenticate;
use crate::handlers;
use crate::state::AppState;

/// OpenAI API routes, relative to the route prefix.
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/models", get(handlers::models::list))
        .route("/models/{id}", get(handlers::models::get))
        .route("/chat/completions", post(handlers::chat::create))
        .route("/completions", post(handlers::completions::create))
        .route("/embeddings", post(handlers::embeddings::create))
        .route(
            "/engines/{model_id}/embeddings",
            post(handlers::embeddings::create_for_engine),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
}

/// Build the gateway router.
///
/// API routes live under `prefix` (empty for the root) behind the auth
/// middleware; `/healthz` is always at the root and unauthenticated.
pub fn create_router(state: AppState, prefix: &str) -> Router {
    let api = api_routes(&state);
    let prefix = prefix.trim_end_matches('/');

    let app = Router::new().route("/healthz", get(handlers::health::healthz));
    let app = if prefix.is_empty() {
        app.merge(api)
    } else {
        app.nest(prefix, api)
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Run the gateway on a pre-bound listener until `cancel` fires.
///
/// In-flight streams are allowed to finish during shutdown.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Gateway listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Gateway shut down");
    Ok(())
}
