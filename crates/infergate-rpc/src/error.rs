use thiserror::Error;

/// Errors from dialing or calling a backend.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The registry address cannot be turned into a URI.
    #[error("Invalid backend address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    /// The channel could not be established.
    #[error("Failed to connect to {address}: {message}")]
    Connect { address: String, message: String },

    /// The backend answered with a non-OK gRPC status.
    #[error("{code:?}: {message}")]
    Status { code: tonic::Code, message: String },
}

impl RpcError {
    /// Whether this error happened before any RPC was issued.
    #[must_use]
    pub const fn is_connect_error(&self) -> bool {
        matches!(self, Self::InvalidAddress { .. } | Self::Connect { .. })
    }
}

impl From<tonic::Status> for RpcError {
    fn from(status: tonic::Status) -> Self {
        Self::Status {
            code: status.code(),
            message: status.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_keeps_message() {
        let err = RpcError::from(tonic::Status::internal("model crashed"));
        assert!(!err.is_connect_error());
        assert_eq!(err.to_string(), "Internal: model crashed");
    }
}
