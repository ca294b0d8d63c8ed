//! Domain types for the gateway.
//!
//! These are pure data types with no infrastructure dependencies. The
//! public REST schema and the backend RPC schema both translate into and
//! out of these shapes.

mod chat;
mod completion;
mod embedding;
mod model;
mod stream;

pub use chat::{ChatMessage, ChatRole};
pub use completion::{CompletionChoice, FinishReason, SamplingParameters, Usage};
pub use embedding::EmbeddingInput;
pub use model::{ModelEntry, ModelSnapshot};
pub use stream::{RelayState, StreamChunk};
