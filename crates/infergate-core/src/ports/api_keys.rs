//! API key storage port.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiKeyError {
    #[error("API key already registered")]
    Duplicate,

    #[error("Database error: {0}")]
    Database(String),
}

/// Lookup and registration of bearer API keys.
///
/// Keys are only ever stored as hashes; the plaintext is seen once, when
/// it is generated.
#[async_trait]
pub trait ApiKeyStore: Send + Sync + fmt::Debug {
    /// Return the username owning `api_key`, or `None` if unknown.
    async fn identify(&self, api_key: &str) -> Result<Option<String>, ApiKeyError>;

    /// Register a freshly generated key for `username`.
    async fn register(&self, username: &str, api_key: &str) -> Result<(), ApiKeyError>;
}
