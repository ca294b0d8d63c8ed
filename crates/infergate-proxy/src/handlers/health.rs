//! Liveness probe.

use axum::Json;
use serde_json::{Value, json};

/// Health check endpoint. Served outside the route prefix and without auth.
pub async fn healthz() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
