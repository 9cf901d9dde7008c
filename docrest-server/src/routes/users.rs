//! CRUD endpoints under `/api/users`.

use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use docrest::entity::Record;
use docrest::page::ListParams;
use serde_json::Value;
use std::sync::Arc;

const NOT_FOUND: &str = "User not found";

/// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Envelope<Record<User>>> {
    let Json(data) = payload?;
    let user = state.users.create(data).await?;

    Ok(Envelope::ok("User created successfully", user))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<Record<User>>> {
    let user = state
        .users
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(Envelope::ok("User retrieved successfully", user))
}

/// GET /api/users?skip=&limit=&search=
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Envelope<Vec<Record<User>>>> {
    let Query(params) = params?;
    let page = state.users.page(&params).await?;

    Ok(Envelope::paginated("Users retrieved successfully", page))
}

/// PUT /api/users/{id}
///
/// Merges the supplied fields; identifier and timestamp keys are ignored.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Envelope<Record<User>>> {
    let Json(data) = payload?;
    let user = state
        .users
        .update(&id, data)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(Envelope::ok("User updated successfully", user))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<()>> {
    if !state.users.delete(&id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    Ok(Envelope::message("User deleted successfully"))
}
