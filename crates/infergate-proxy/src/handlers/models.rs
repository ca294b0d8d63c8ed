//! Model listing and lookup, answered from the registry snapshot.

use axum::Json;
use axum::extract::{Path, State};

use crate::error::HttpError;
use crate::models::{ModelInfo, ModelsResponse};
use crate::state::AppState;

/// List all registered models, sorted by name.
pub async fn list(State(state): State<AppState>) -> Json<ModelsResponse> {
    let snapshot = state.registry.snapshot();
    Json(ModelsResponse::from_entries(snapshot.iter()))
}

/// Get a single model by name.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ModelInfo>, HttpError> {
    let entry = state.registry.resolve(&id)?;
    Ok(Json(ModelInfo::from(&entry)))
}
