use axum::response::Json;
use serde_json::{json, Value};

use crate::error::ApiError;

/// GET /health - liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
