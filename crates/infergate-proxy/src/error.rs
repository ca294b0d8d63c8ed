//! HTTP error mapping for the gateway.
//!
//! Every handler failure is a [`GatewayError`]; [`HttpError`] turns it into
//! a status code plus a `{"error": {"kind", "message"}}` body.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderValue, StatusCode, header};
use axum::Json;
use axum::response::{IntoResponse, Response};
use infergate_core::{ErrorPayload, GatewayError};
use infergate_rpc::RpcError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Axum-facing wrapper around [`GatewayError`].
#[derive(Debug)]
pub struct HttpError(pub GatewayError);

impl From<GatewayError> for HttpError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorPayload,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = self.0.payload();
        let status = StatusCode::from_u16(payload.kind.suggested_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(kind = %payload.kind, message = %payload.message, "Request failed");
        } else {
            warn!(kind = %payload.kind, message = %payload.message, "Request rejected");
        }

        let mut response = (status, Json(ErrorBody { error: payload })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Map a backend failure for `model` onto the gateway taxonomy.
///
/// Dial failures mean no RPC was issued and the backend is unavailable;
/// anything the backend answered with is passed through as an RPC error.
pub fn backend_error(model: &str, err: RpcError) -> GatewayError {
    if err.is_connect_error() {
        GatewayError::BackendUnavailable {
            model: model.to_string(),
            message: err.to_string(),
        }
    } else {
        GatewayError::BackendRpc(err.to_string())
    }
}

/// JSON body extractor whose rejection uses the gateway error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                HttpError(GatewayError::InvalidRequest(rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}
