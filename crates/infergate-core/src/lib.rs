//! Core domain types and port definitions for infergate.
//!
//! This crate holds everything the gateway needs that does not touch the
//! network, the filesystem, or a database: the model registry snapshot,
//! chat and completion domain types, the stop-token filter used by the
//! streaming relay, the error taxonomy, and the port traits that adapter
//! crates implement.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod ports;
pub mod registry;
pub mod settings;
pub mod stop_token;

pub use domain::{
    ChatMessage, ChatRole, CompletionChoice, EmbeddingInput, FinishReason, ModelEntry,
    ModelSnapshot, RelayState, SamplingParameters, StreamChunk, Usage,
};
pub use error::{ErrorKind, ErrorPayload, GatewayError};
pub use ports::{
    ApiKeyError, ApiKeyStore, ChatLogError, ChatLogPort, ModelRegistryPort, NoopChatLog,
};
pub use registry::SnapshotRegistry;
pub use settings::{
    DEFAULT_LISTEN_ADDR, DEFAULT_RELAY_QUEUE_CAPACITY, GatewaySettings, SettingsError,
    validate_settings,
};
pub use stop_token::{STOP_TOKEN, StopTokenFilter, is_stop_marker, strip_stop_token};
