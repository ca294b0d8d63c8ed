//! OpenAI API data models for request/response handling.
//!
//! This module contains types that match the OpenAI API wire format.
//! Domain types live in `infergate-core`; the translator maps between the two.

use infergate_core::{EmbeddingInput, ModelEntry, Usage};
use serde::{Deserialize, Serialize};

// =============================================================================
// Request Types
// =============================================================================

/// A chat message as sent by the client.
///
/// The role is kept as a plain string so an unknown role can be reported
/// as a translation failure rather than a generic body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageBody {
    pub role: String,
    /// Missing and `null` both mean empty; assistant and function turns
    /// often carry `"content": null`.
    #[serde(default)]
    pub content: Option<String>,
}

/// `stop` accepts either one sequence or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopSequences {
    One(String),
    Many(Vec<String>),
}

impl StopSequences {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(stop) => vec![stop],
            Self::Many(stops) => stops,
        }
    }
}

/// Sampling fields shared by chat and text completion requests.
///
/// Numeric fields are wider than the backend's so out-of-range values can
/// be rejected with a clear message instead of being truncated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamplingFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopSequences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_of: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// `POST /chat/completions` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessageBody>,
    #[serde(flatten)]
    pub sampling: SamplingFields,
}

/// `POST /completions` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(flatten)]
    pub sampling: SamplingFields,
}

/// `POST /embeddings` and `POST /engines/{model_id}/embeddings` body.
///
/// `model` is ignored on the engine route, where the path names the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    #[serde(default)]
    pub model: String,
    pub input: EmbeddingInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

// =============================================================================
// Text Completion Response Types
// =============================================================================

/// Unary text completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoiceBody>,
    pub usage: Usage,
}

/// One text candidate. `finish_reason` is serialized as `null` when unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionChoiceBody {
    pub index: u32,
    pub text: String,
    pub finish_reason: Option<String>,
}

/// One streamed text completion event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoiceBody>,
    /// Present only on the terminal event: the whole stop-stripped text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_text: Option<String>,
}

// =============================================================================
// Chat Completion Response Types
// =============================================================================

/// A chat message as returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    pub role: String,
    pub content: String,
}

/// Unary chat completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoiceBody>,
    pub usage: Usage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoiceBody {
    pub index: u32,
    pub message: ChatMessageResponse,
    pub finish_reason: Option<String>,
}

/// One streamed chat completion event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChunkChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChunkChoice {
    pub index: u32,
    pub delta: ChatDelta,
    pub finish_reason: Option<String>,
}

/// Incremental message content. Both fields are omitted when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// =============================================================================
// Embedding Response Types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub object: String,
    pub model: String,
    pub data: Vec<EmbeddingData>,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingData {
    pub object: String,
    pub embedding: Vec<f32>,
    pub index: u32,
}

// =============================================================================
// Model Listing Types
// =============================================================================

/// Response for `GET /models` (OpenAI format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

impl ModelsResponse {
    /// Create a listing from registry entries, keeping their order.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ModelEntry>) -> Self {
        Self {
            object: "list".to_string(),
            data: entries.into_iter().map(ModelInfo::from).collect(),
        }
    }
}

/// Information about a single model (OpenAI format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub owned_by: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub permission: Vec<String>,
}

impl From<&ModelEntry> for ModelInfo {
    fn from(entry: &ModelEntry) -> Self {
        Self {
            id: entry.name.clone(),
            object: "model".to_string(),
            owned_by: entry.owned_by.clone(),
            description: entry.description.clone(),
            tasks: entry.tasks.iter().cloned().collect(),
            permission: entry.permission.clone(),
        }
    }
}
