//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the gateway core expects from
//! infrastructure. They use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx`, `tonic` or filesystem types in any signature
//! - Traits are `Send + Sync + Debug` so they can sit behind `Arc<dyn _>`
//!   in shared router state

mod api_keys;
mod chat_log;
mod model_registry;

pub use api_keys::{ApiKeyError, ApiKeyStore};
pub use chat_log::{ChatLogError, ChatLogPort, NoopChatLog};
pub use model_registry::ModelRegistryPort;
