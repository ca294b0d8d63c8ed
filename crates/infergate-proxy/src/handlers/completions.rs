//! `POST /completions`.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{ApiJson, HttpError, backend_error};
use crate::models::{CompletionChoiceBody, CompletionRequest, CompletionResponse};
use crate::orchestrator::complete_n;
use crate::relay::{CompletionEvents, EventMeta, relay_events, spawn_receiver, sse_response};
use crate::state::AppState;
use crate::translate::{completion_stream_chunk, encode_completion, parse_sampling};

/// Create a text completion, unary or streamed.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CompletionRequest>,
) -> Result<Response, HttpError> {
    let params = parse_sampling(req.sampling)?;
    let candidates = params.candidates();

    info!(
        model = %req.model,
        streaming = %params.stream,
        candidates,
        "Processing completion request"
    );

    let rpc_request = encode_completion(&req.prompt, req.suffix.as_deref(), &params);
    let (entry, backend) = state.connect(&req.model).await?;
    let meta = EventMeta::new(&entry.name);

    if params.stream {
        if candidates > 1 {
            debug!(candidates, "Streaming only the first candidate");
        }
        let stream = backend
            .complete_stream(rpc_request)
            .await
            .map_err(|e| backend_error(&entry.name, e))?;

        let cancel = CancellationToken::new();
        let stop_token = state.stop_token.clone();
        let rx = spawn_receiver(
            stream,
            move |response| completion_stream_chunk(response, &stop_token),
            state.relay_queue_capacity,
            cancel.clone(),
        );
        let events = relay_events(rx, CompletionEvents(meta), &state.stop_token, cancel);
        return Ok(sse_response(events));
    }

    let result = complete_n(
        backend.as_ref(),
        &rpc_request,
        candidates,
        &entry.name,
        &state.stop_token,
    )
    .await?;

    let response = CompletionResponse {
        id: meta.id,
        object: "text_completion".to_string(),
        created: meta.created,
        model: meta.model,
        choices: result
            .choices
            .into_iter()
            .map(|choice| CompletionChoiceBody {
                index: choice.index,
                text: choice.text,
                finish_reason: choice.finish_reason.map(|r| r.as_str().to_string()),
            })
            .collect(),
        usage: result.usage,
    };
    Ok(Json(response).into_response())
}
