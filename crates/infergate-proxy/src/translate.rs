//! Translation between the OpenAI wire schema and the backend RPC schema.
//!
//! Encoding validates and narrows client values before any backend call is
//! made. Decoding strips the stop token from generated text once the
//! backend message is fully decoded.

use std::collections::{BTreeMap, HashMap};

use infergate_core::{
    ChatMessage, ChatRole, CompletionChoice, EmbeddingInput, FinishReason, GatewayError,
    SamplingParameters, StreamChunk, Usage, is_stop_marker, strip_stop_token,
};
use infergate_rpc::proto::{chat, completion, embeddings};
use serde_json::Value;

use crate::models::{ChatMessageBody, EmbeddingData, SamplingFields};

/// A decoded chat candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: Option<FinishReason>,
}

// =============================================================================
// Client -> domain
// =============================================================================

/// Parse client messages, rejecting any role outside the closed set.
pub fn parse_messages(messages: Vec<ChatMessageBody>) -> Result<Vec<ChatMessage>, GatewayError> {
    messages
        .into_iter()
        .map(|body| {
            let role =
                ChatRole::parse(&body.role).ok_or_else(|| GatewayError::InvalidRole(body.role))?;
            Ok(ChatMessage::new(role, body.content.unwrap_or_default()))
        })
        .collect()
}

/// Validate client sampling fields and narrow them to backend widths.
pub fn parse_sampling(fields: SamplingFields) -> Result<SamplingParameters, GatewayError> {
    Ok(SamplingParameters {
        max_tokens: fields
            .max_tokens
            .map(|v| narrow_i32("max_tokens", v))
            .transpose()?,
        temperature: fields.temperature,
        top_p: fields.top_p,
        stop: fields.stop.map(|s| s.into_vec()).unwrap_or_default(),
        presence_penalty: fields.presence_penalty,
        frequency_penalty: fields.frequency_penalty,
        best_of: fields
            .best_of
            .map(|v| narrow_i32("best_of", v))
            .transpose()?,
        logit_bias: fields
            .logit_bias
            .map(narrow_logit_bias)
            .transpose()?
            .unwrap_or_default(),
        n: fields.n,
        stream: fields.stream,
        user: fields.user,
    })
}

fn narrow_i32(field: &str, value: i64) -> Result<i32, GatewayError> {
    i32::try_from(value).map_err(|_| {
        GatewayError::Translation(format!("{field} value {value} does not fit in 32 bits"))
    })
}

fn narrow_logit_bias(
    raw: serde_json::Map<String, Value>,
) -> Result<BTreeMap<String, i32>, GatewayError> {
    raw.into_iter()
        .map(|(token, value)| {
            let bias = value.as_i64().ok_or_else(|| {
                GatewayError::Translation(format!(
                    "logit_bias for token '{token}' must be an integer, got {value}"
                ))
            })?;
            let bias = narrow_i32(&format!("logit_bias for token '{token}'"), bias)?;
            Ok((token, bias))
        })
        .collect()
}

// =============================================================================
// Roles
// =============================================================================

pub const fn encode_role(role: ChatRole) -> chat::ChatRole {
    match role {
        ChatRole::System => chat::ChatRole::System,
        ChatRole::User => chat::ChatRole::User,
        ChatRole::Assistant => chat::ChatRole::Assistant,
        ChatRole::Function => chat::ChatRole::Function,
    }
}

/// Decode a backend role value. Unknown enum values are a translation error.
pub fn decode_role(value: i32) -> Result<ChatRole, GatewayError> {
    let role = chat::ChatRole::try_from(value)
        .map_err(|_| GatewayError::Translation(format!("unknown backend chat role {value}")))?;
    Ok(match role {
        chat::ChatRole::System => ChatRole::System,
        chat::ChatRole::User => ChatRole::User,
        chat::ChatRole::Assistant => ChatRole::Assistant,
        chat::ChatRole::Function => ChatRole::Function,
    })
}

// =============================================================================
// Requests
// =============================================================================

fn logit_bias_map(bias: &BTreeMap<String, i32>) -> HashMap<String, i32> {
    bias.iter().map(|(k, v)| (k.clone(), *v)).collect()
}

/// Build a backend chat request.
///
/// `n` is never forwarded: each call produces one candidate and the
/// orchestrator issues one call per requested choice.
pub fn encode_chat(messages: &[ChatMessage], params: &SamplingParameters) -> chat::ChatCompletionRequest {
    chat::ChatCompletionRequest {
        chat_items: messages
            .iter()
            .map(|m| chat::ChatItem {
                role: encode_role(m.role) as i32,
                content: m.content.clone(),
            })
            .collect(),
        max_new_tokens: params.max_tokens,
        temperature: params.temperature,
        top_p: params.top_p,
        stop: params.stop.clone(),
        presence_penalty: params.presence_penalty,
        frequence_penalty: params.frequency_penalty,
        best_of: params.best_of.map(|v| v.to_string()),
        logit_bias: logit_bias_map(&params.logit_bias),
        user: params.user.clone(),
        ..Default::default()
    }
}

/// Build a backend text completion request.
pub fn encode_completion(
    prompt: &str,
    suffix: Option<&str>,
    params: &SamplingParameters,
) -> completion::CompletionRequest {
    completion::CompletionRequest {
        prompt: prompt.to_string(),
        suffix: suffix.map(str::to_string),
        max_new_tokens: params.max_tokens,
        temperature: params.temperature,
        top_p: params.top_p,
        stop: params.stop.clone(),
        presence_penalty: params.presence_penalty,
        frequence_penalty: params.frequency_penalty,
        best_of: params.best_of.map(|v| v.to_string()),
        logit_bias: logit_bias_map(&params.logit_bias),
        user: params.user.clone(),
        ..Default::default()
    }
}

pub fn encode_embedding(input: EmbeddingInput) -> embeddings::EmbeddingRequest {
    embeddings::EmbeddingRequest {
        inputs: input.into_inputs(),
    }
}

// =============================================================================
// Responses
// =============================================================================

pub fn decode_completion_finish_reason(value: i32) -> Option<FinishReason> {
    match completion::CompletionFinishReason::try_from(value).ok()? {
        completion::CompletionFinishReason::None => None,
        completion::CompletionFinishReason::Stop => Some(FinishReason::Stop),
        completion::CompletionFinishReason::Length => Some(FinishReason::Length),
    }
}

pub fn decode_chat_finish_reason(value: i32) -> Option<FinishReason> {
    match chat::ChatCompletionFinishReason::try_from(value).ok()? {
        chat::ChatCompletionFinishReason::None => None,
        chat::ChatCompletionFinishReason::Stop => Some(FinishReason::Stop),
        chat::ChatCompletionFinishReason::Length => Some(FinishReason::Length),
    }
}

fn token_count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

pub fn decode_completion_usage(usage: Option<&completion::CompletionUsage>) -> Usage {
    usage.map_or_else(Usage::default, |u| Usage {
        prompt_tokens: token_count(u.prompt_tokens),
        completion_tokens: token_count(u.completion_tokens),
        total_tokens: token_count(u.total_tokens),
    })
}

pub fn decode_chat_usage(usage: Option<&chat::Usage>) -> Usage {
    usage.map_or_else(Usage::default, |u| Usage {
        prompt_tokens: token_count(u.prompt_tokens),
        completion_tokens: token_count(u.completion_tokens),
        total_tokens: token_count(u.total_tokens),
    })
}

/// Decode a backend text choice into position `index`.
pub fn decode_completion_choice(
    choice: &completion::CompletionChoice,
    index: u32,
    stop_token: &str,
) -> CompletionChoice {
    CompletionChoice {
        index,
        text: strip_stop_token(&choice.text, stop_token),
        finish_reason: decode_completion_finish_reason(choice.finish_reason),
    }
}

/// Decode a backend chat item, stripping the stop token from its content.
pub fn decode_chat_item(item: &chat::ChatItem, stop_token: &str) -> Result<ChatMessage, GatewayError> {
    Ok(ChatMessage::new(
        decode_role(item.role)?,
        strip_stop_token(&item.content, stop_token),
    ))
}

/// Decode a backend chat choice into position `index`.
pub fn decode_chat_choice(
    choice: &chat::ChatCompletionChoice,
    index: u32,
    stop_token: &str,
) -> Result<ChatChoice, GatewayError> {
    let item = choice.chat_item.as_ref().ok_or_else(|| {
        GatewayError::BackendRpc("backend returned a chat choice without a message".into())
    })?;
    Ok(ChatChoice {
        index,
        message: decode_chat_item(item, stop_token)?,
        finish_reason: decode_chat_finish_reason(choice.finish_reason),
    })
}

/// Turn one streamed text response into a relay chunk.
///
/// Returns `None` for a response without choices. Only the first choice is
/// streamed. The delta is left raw; the relay strips the stop token across
/// chunk boundaries.
pub fn completion_stream_chunk(
    response: completion::CompletionResponse,
    stop_token: &str,
) -> Option<StreamChunk> {
    let choice = response.choices.into_iter().next()?;
    Some(stream_chunk(
        choice.text,
        decode_completion_finish_reason(choice.finish_reason),
        stop_token,
    ))
}

/// Chat counterpart of [`completion_stream_chunk`].
pub fn chat_stream_chunk(
    response: chat::ChatCompletionResponse,
    stop_token: &str,
) -> Option<StreamChunk> {
    let choice = response.choices.into_iter().next()?;
    let content = choice.chat_item.map(|item| item.content).unwrap_or_default();
    Some(stream_chunk(
        content,
        decode_chat_finish_reason(choice.finish_reason),
        stop_token,
    ))
}

fn stream_chunk(text: String, finish_reason: Option<FinishReason>, stop_token: &str) -> StreamChunk {
    if is_stop_marker(&text, stop_token) {
        return StreamChunk::finished(finish_reason.unwrap_or(FinishReason::Stop));
    }
    StreamChunk {
        is_final: finish_reason.is_some(),
        text_delta: text,
        finish_reason,
    }
}

/// Decode embeddings in backend order, indexed from zero.
pub fn decode_embeddings(response: embeddings::EmbeddingResponse) -> Vec<EmbeddingData> {
    response
        .embeddings
        .into_iter()
        .zip(0u32..)
        .map(|(e, index)| EmbeddingData {
            object: "embedding".to_string(),
            embedding: e.embedding,
            index,
        })
        .collect()
}
