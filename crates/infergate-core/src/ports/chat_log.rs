//! Chat log port for recording completed chat exchanges.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::domain::ChatMessage;

/// Errors from chat log storage.
#[derive(Debug, Error)]
pub enum ChatLogError {
    #[error("Failed to serialize chat messages: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Sink for completed, non-streaming chat exchanges.
///
/// Callers log failures and carry on; a failed save never fails the
/// client response.
#[async_trait]
pub trait ChatLogPort: Send + Sync + fmt::Debug {
    /// Record one exchange.
    ///
    /// # Arguments
    ///
    /// * `username` - Identity injected by the auth layer
    /// * `model_name` - Model the request was routed to
    /// * `messages` - The request messages, in order
    /// * `response` - Generated text of the first choice
    async fn save(
        &self,
        username: &str,
        model_name: &str,
        messages: &[ChatMessage],
        response: &str,
    ) -> Result<(), ChatLogError>;
}

/// Chat log that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChatLog;

#[async_trait]
impl ChatLogPort for NoopChatLog {
    async fn save(
        &self,
        _username: &str,
        _model_name: &str,
        _messages: &[ChatMessage],
        _response: &str,
    ) -> Result<(), ChatLogError> {
        Ok(())
    }
}
