//! Backend port and its gRPC adapter.
//!
//! [`BackendConnector`] dials one backend per request; the returned
//! [`InferenceBackend`] owns that connection and is dropped with the
//! request. Nothing is pooled or reused across requests.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use crate::client::RpcClient;
use crate::error::RpcError;
use crate::proto::chat::{ChatCompletionRequest, ChatCompletionResponse};
use crate::proto::completion::{CompletionRequest, CompletionResponse};
use crate::proto::embeddings::{EmbeddingRequest, EmbeddingResponse};

/// Server-streamed backend responses. Dropping the stream cancels the call.
pub type ResponseStream<T> = BoxStream<'static, Result<T, RpcError>>;

/// The backend RPC surface consumed by the gateway.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, RpcError>;

    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> Result<ResponseStream<CompletionResponse>, RpcError>;

    async fn chat_complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, RpcError>;

    async fn chat_complete_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ResponseStream<ChatCompletionResponse>, RpcError>;

    async fn create_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, RpcError>;
}

/// Establishes a fresh backend connection.
#[async_trait]
pub trait BackendConnector: Send + Sync + fmt::Debug {
    /// Dial `address` and wait until the channel is usable.
    ///
    /// # Errors
    ///
    /// Returns `RpcError::InvalidAddress` or `RpcError::Connect`; no RPC
    /// has been issued when either is returned.
    async fn connect(&self, address: &str) -> Result<Box<dyn InferenceBackend>, RpcError>;
}

/// Turn a registry address into a URI tonic can dial.
///
/// Bare `host:port` and `grpc://` addresses are dialed as plaintext HTTP/2.
#[must_use]
pub fn backend_uri(address: &str) -> String {
    if let Some(rest) = address.strip_prefix("grpc://") {
        format!("http://{rest}")
    } else if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}

/// Connector that dials backends over gRPC.
#[derive(Debug, Clone)]
pub struct GrpcConnector {
    connect_timeout: Duration,
}

impl GrpcConnector {
    #[must_use]
    pub const fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    async fn create_channel(&self, address: &str) -> Result<Channel, RpcError> {
        let uri = backend_uri(address);
        let endpoint = Endpoint::from_shared(uri).map_err(|e| RpcError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })?;

        endpoint
            .connect_timeout(self.connect_timeout)
            .tcp_nodelay(true)
            .http2_adaptive_window(true)
            .connect()
            .await
            .map_err(|e| RpcError::Connect {
                address: address.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl BackendConnector for GrpcConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn InferenceBackend>, RpcError> {
        debug!(address = %address, "Dialing backend");
        let channel = self.create_channel(address).await?;
        Ok(Box::new(GrpcBackend {
            client: RpcClient::new(channel),
        }))
    }
}

/// A connected gRPC backend.
#[derive(Debug, Clone)]
pub struct GrpcBackend {
    client: RpcClient,
}

#[async_trait]
impl InferenceBackend for GrpcBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, RpcError> {
        Ok(self.client.clone().complete(request).await?)
    }

    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> Result<ResponseStream<CompletionResponse>, RpcError> {
        let stream = self.client.clone().complete_stream(request).await?;
        Ok(stream.map(|item| item.map_err(RpcError::from)).boxed())
    }

    async fn chat_complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, RpcError> {
        Ok(self.client.clone().chat_complete(request).await?)
    }

    async fn chat_complete_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ResponseStream<ChatCompletionResponse>, RpcError> {
        let stream = self.client.clone().chat_complete_stream(request).await?;
        Ok(stream.map(|item| item.map_err(RpcError::from)).boxed())
    }

    async fn create_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, RpcError> {
        Ok(self.client.clone().create_embedding(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_uri() {
        assert_eq!(backend_uri("localhost:50051"), "http://localhost:50051");
        assert_eq!(backend_uri("grpc://10.0.0.2:50051"), "http://10.0.0.2:50051");
        assert_eq!(backend_uri("http://svc:50051"), "http://svc:50051");
    }

    #[tokio::test]
    async fn test_connect_refused_is_connect_error() {
        // Bind then drop a listener to get a port nothing is serving on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let connector = GrpcConnector::new(Duration::from_secs(2));
        let err = connector.connect(&address).await.err().unwrap();
        assert!(err.is_connect_error(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let connector = GrpcConnector::new(Duration::from_secs(1));
        let err = connector.connect("not a uri").await.err().unwrap();
        assert!(matches!(err, RpcError::InvalidAddress { .. }));
    }
}
