//! `POST /chat/completions`.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::Identity;
use crate::error::{ApiJson, HttpError, backend_error};
use crate::models::{
    ChatChoiceBody, ChatCompletionRequest, ChatCompletionResponse, ChatMessageResponse,
};
use crate::orchestrator::chat_complete_n;
use crate::relay::{ChatEvents, EventMeta, relay_events, spawn_receiver, sse_response};
use crate::state::AppState;
use crate::translate::{chat_stream_chunk, encode_chat, parse_messages, parse_sampling};

/// Create a chat completion, unary or streamed.
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(req): ApiJson<ChatCompletionRequest>,
) -> Result<Response, HttpError> {
    let messages = parse_messages(req.messages)?;
    let params = parse_sampling(req.sampling)?;
    let candidates = params.candidates();

    info!(
        model = %req.model,
        streaming = %params.stream,
        candidates,
        messages = messages.len(),
        "Processing chat completion request"
    );

    let rpc_request = encode_chat(&messages, &params);
    let (entry, backend) = state.connect(&req.model).await?;
    let meta = EventMeta::new(&entry.name);

    if params.stream {
        if candidates > 1 {
            debug!(candidates, "Streaming only the first candidate");
        }
        let stream = backend
            .chat_complete_stream(rpc_request)
            .await
            .map_err(|e| backend_error(&entry.name, e))?;

        let cancel = CancellationToken::new();
        let stop_token = state.stop_token.clone();
        let rx = spawn_receiver(
            stream,
            move |response| chat_stream_chunk(response, &stop_token),
            state.relay_queue_capacity,
            cancel.clone(),
        );
        let events = relay_events(rx, ChatEvents(meta), &state.stop_token, cancel);
        return Ok(sse_response(events));
    }

    let result = chat_complete_n(
        backend.as_ref(),
        &rpc_request,
        candidates,
        &entry.name,
        &state.stop_token,
    )
    .await?;

    if let Some(first) = result.choices.first() {
        if let Err(e) = state
            .chat_log
            .save(&identity.username, &entry.name, &messages, &first.message.content)
            .await
        {
            warn!(
                model = %entry.name,
                user = %identity.username,
                error = %e,
                "Failed to record chat completion"
            );
        }
    }

    let response = ChatCompletionResponse {
        id: meta.id,
        object: "chat.completion".to_string(),
        created: meta.created,
        model: meta.model,
        choices: result
            .choices
            .into_iter()
            .map(|choice| ChatChoiceBody {
                index: choice.index,
                message: ChatMessageResponse {
                    role: choice.message.role.as_str().to_string(),
                    content: choice.message.content,
                },
                finish_reason: choice.finish_reason.map(|r| r.as_str().to_string()),
            })
            .collect(),
        usage: result.usage,
    };
    Ok(Json(response).into_response())
}
