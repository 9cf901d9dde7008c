//! API route handlers
//!
//! - `health`: liveness and readiness probes
//! - `users`: CRUD over the `users` collection

pub mod health;
pub mod users;

use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde_json::json;
use std::sync::Arc;

/// API info (GET /)
///
/// ```json
/// { "message": "PadelUG API is running!", "version": "1.0.0", "status": "healthy" }
/// ```
pub async fn api_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "message": format!("{} is running!", state.config.app_name),
        "description": state.config.app_description,
        "version": state.config.app_version,
        "status": "healthy",
    }))
}

/// 404 Not Found handler
pub async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}
