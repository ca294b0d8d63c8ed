//! `POST /embeddings` and `POST /engines/{model_id}/embeddings`.

use axum::Json;
use axum::extract::{Path, State};
use infergate_core::{EmbeddingInput, Usage};
use tracing::info;

use crate::error::{ApiJson, HttpError, backend_error};
use crate::models::{EmbeddingRequest, EmbeddingResponse};
use crate::state::AppState;
use crate::translate::{decode_embeddings, encode_embedding};

/// Embed with the model named in the body.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmbeddingRequest>,
) -> Result<Json<EmbeddingResponse>, HttpError> {
    embed(&state, &req.model, req.input).await
}

/// Embed with the model named in the path; the body's `model` is ignored.
pub async fn create_for_engine(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
    ApiJson(req): ApiJson<EmbeddingRequest>,
) -> Result<Json<EmbeddingResponse>, HttpError> {
    embed(&state, &model_id, req.input).await
}

async fn embed(
    state: &AppState,
    model: &str,
    input: EmbeddingInput,
) -> Result<Json<EmbeddingResponse>, HttpError> {
    info!(model = %model, inputs = input.len(), "Processing embedding request");

    let (entry, backend) = state.connect(model).await?;
    let response = backend
        .create_embedding(encode_embedding(input))
        .await
        .map_err(|e| backend_error(&entry.name, e))?;

    Ok(Json(EmbeddingResponse {
        object: "list".to_string(),
        model: entry.name,
        data: decode_embeddings(response),
        usage: Usage::default(),
    }))
}
