//! Gateway error taxonomy.
//!
//! Every failure the gateway reports to a client is a [`GatewayError`].
//! Its [`ErrorKind`] decides the HTTP status and is serialized as a stable
//! snake_case tag next to a human-readable message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable classification of gateway failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ModelNotFound,
    BackendUnavailable,
    InvalidRequestShape,
    BackendRpcError,
    TranslationError,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ModelNotFound => "model_not_found",
            Self::BackendUnavailable => "backend_unavailable",
            Self::InvalidRequestShape => "invalid_request_shape",
            Self::BackendRpcError => "backend_rpc_error",
            Self::TranslationError => "translation_error",
            Self::Unauthorized => "unauthorized",
            Self::Internal => "internal",
        }
    }

    /// Suggested HTTP status code for this kind.
    #[must_use]
    pub const fn suggested_status_code(&self) -> u16 {
        match self {
            Self::ModelNotFound => 404,
            Self::InvalidRequestShape | Self::TranslationError => 400,
            Self::Unauthorized => 401,
            Self::BackendRpcError => 502,
            Self::BackendUnavailable => 503,
            Self::Internal => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the gateway core.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The model name is not in the current registry snapshot.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Dialing the backend failed.
    #[error("Backend for model '{model}' is unavailable: {message}")]
    BackendUnavailable { model: String, message: String },

    /// The request body is malformed or has a field of the wrong type.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A chat message carried a role outside the supported set.
    #[error("Invalid chat role: '{0}'")]
    InvalidRole(String),

    /// The backend accepted the call but returned an error.
    #[error("Backend call failed: {0}")]
    BackendRpc(String),

    /// A value could not be represented in the target schema.
    #[error("Translation failed: {0}")]
    Translation(String),

    /// Credential missing or rejected. The message is shown verbatim.
    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ModelNotFound(_) => ErrorKind::ModelNotFound,
            Self::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
            Self::InvalidRequest(_) | Self::InvalidRole(_) => ErrorKind::InvalidRequestShape,
            Self::BackendRpc(_) => ErrorKind::BackendRpcError,
            Self::Translation(_) => ErrorKind::TranslationError,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Build the client-facing payload.
    #[must_use]
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Serialized error body: `{"kind": "...", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
}
