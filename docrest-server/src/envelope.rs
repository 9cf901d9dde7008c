//! The uniform success envelope: `{success, message, data?, pagination?}`.
//!
//! Failures are rendered by [`ApiError`](crate::error::ApiError) with the same
//! `success`/`message` keys plus a machine-readable `code`.

use axum::Json;
use axum::response::{IntoResponse, Response};
use docrest::page::{Page, Pagination};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            pagination: None,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn paginated(message: impl Into<String>, page: Page<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(page.items),
            pagination: Some(page.pagination),
        }
    }
}

impl Envelope<()> {
    /// An envelope carrying no data.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            pagination: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
