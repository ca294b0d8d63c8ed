//! Thin tonic client over the backend services.
//!
//! Equivalent to what `tonic-build` would generate for the five backend
//! methods, collapsed into one type because every service shares the same
//! channel.

use std::fmt;

use prost::Message;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Request, Status, Streaming};

use crate::proto::chat::{ChatCompletionRequest, ChatCompletionResponse};
use crate::proto::completion::{CompletionRequest, CompletionResponse};
use crate::proto::embeddings::{EmbeddingRequest, EmbeddingResponse};
use crate::proto::paths;

/// gRPC client bound to one backend channel.
#[derive(Clone)]
pub struct RpcClient {
    inner: Grpc<Channel>,
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient").finish_non_exhaustive()
    }
}

impl RpcClient {
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    pub async fn complete(
        &mut self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, Status> {
        self.unary(request, paths::COMPLETE).await
    }

    pub async fn complete_stream(
        &mut self,
        request: CompletionRequest,
    ) -> Result<Streaming<CompletionResponse>, Status> {
        self.server_streaming(request, paths::COMPLETE_STREAM).await
    }

    pub async fn chat_complete(
        &mut self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, Status> {
        self.unary(request, paths::CHAT_COMPLETE).await
    }

    pub async fn chat_complete_stream(
        &mut self,
        request: ChatCompletionRequest,
    ) -> Result<Streaming<ChatCompletionResponse>, Status> {
        self.server_streaming(request, paths::CHAT_COMPLETE_STREAM)
            .await
    }

    pub async fn create_embedding(
        &mut self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, Status> {
        self.unary(request, paths::CREATE_EMBEDDING).await
    }

    async fn ready(&mut self) -> Result<(), Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unknown(format!("Service was not ready: {e}")))
    }

    async fn unary<Req, Resp>(&mut self, request: Req, path: &'static str) -> Result<Resp, Status>
    where
        Req: Message + Send + Sync + 'static,
        Resp: Message + Default + Send + Sync + 'static,
    {
        self.ready().await?;
        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = self
            .inner
            .unary(Request::new(request), PathAndQuery::from_static(path), codec)
            .await?;
        Ok(response.into_inner())
    }

    async fn server_streaming<Req, Resp>(
        &mut self,
        request: Req,
        path: &'static str,
    ) -> Result<Streaming<Resp>, Status>
    where
        Req: Message + Send + Sync + 'static,
        Resp: Message + Default + Send + Sync + 'static,
    {
        self.ready().await?;
        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = self
            .inner
            .server_streaming(Request::new(request), PathAndQuery::from_static(path), codec)
            .await?;
        Ok(response.into_inner())
    }
}
