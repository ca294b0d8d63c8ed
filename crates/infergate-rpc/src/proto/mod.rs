//! Backend RPC message types.
//!
//! These mirror the `completion`, `chat` and `embeddings` protobuf packages
//! spoken by model-serving backends. They are declared with the `prost`
//! derive macros directly so the workspace builds without `protoc`.
//!
//! Optional scalars use proto3 `optional`, so an unset Rust `Option` is
//! absent on the wire and the backend applies its own default.

pub mod chat;
pub mod completion;
pub mod embeddings;

/// Fully qualified gRPC method paths.
pub mod paths {
    pub const COMPLETE: &str = "/completion.CompletionService/Complete";
    pub const COMPLETE_STREAM: &str = "/completion.CompletionStreamService/CompleteStream";
    pub const CHAT_COMPLETE: &str = "/chat.ChatCompletionService/ChatComplete";
    pub const CHAT_COMPLETE_STREAM: &str = "/chat.ChatCompletionStreamService/ChatCompleteStream";
    pub const CREATE_EMBEDDING: &str = "/embeddings.EmbeddingsService/CreateEmbedding";
}
