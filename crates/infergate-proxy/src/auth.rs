//! Bearer API-key authentication.
//!
//! Requires `Authorization: Bearer {key}`. The key is looked up through the
//! [`ApiKeyStore`] port and the owning username is attached to the request
//! as an [`Identity`] extension. Without a store every request runs as
//! [`ANONYMOUS`].

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use infergate_core::GatewayError;
use tracing::debug;

use crate::error::HttpError;
use crate::state::AppState;

/// Username recorded when authentication is disabled.
pub const ANONYMOUS: &str = "anonymous";

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            username: ANONYMOUS.to_string(),
        }
    }
}

/// Auth middleware: validate the bearer key and inject the [`Identity`].
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let identity = match &state.api_keys {
        None => Identity::anonymous(),
        Some(store) => {
            let key = bearer_key(&req)?.to_string();
            let username = store
                .identify(&key)
                .await
                .map_err(|e| GatewayError::Internal(e.to_string()))?
                .ok_or_else(|| GatewayError::Unauthorized("Invalid API key".into()))?;
            debug!(user = %username, path = %req.uri().path(), "Authenticated request");
            Identity { username }
        }
    };

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

fn bearer_key(req: &Request) -> Result<&str, GatewayError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| GatewayError::Unauthorized("Authorization header missing".into()))?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| GatewayError::Unauthorized("Invalid authorization format".into()))
}
