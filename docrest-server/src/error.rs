use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docrest::error::{DocumentStoreError, ValidationError};
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(DocumentStoreError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(DocumentStoreError::Backend(_))
            | ApiError::Store(DocumentStoreError::Initialization(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Store(_) => "STORE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DocumentStoreError> for ApiError {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::Validation(err) => ApiError::Validation(err),
            other => ApiError::Store(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::warn!(status = %status, error = %self, "Request failed");
        }

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
            "code": self.error_code(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrest::error::Constraint;

    #[test]
    fn test_status_mapping() {
        let validation: ApiError =
            DocumentStoreError::from(ValidationError::new("rank", Constraint::Minimum(0))).into();
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.error_code(), "VALIDATION_ERROR");

        let backend: ApiError = DocumentStoreError::Backend("connection refused".into()).into();
        assert_eq!(backend.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(backend.error_code(), "STORE_ERROR");

        let corrupt: ApiError = DocumentStoreError::InvalidDocument("missing _id".into()).into();
        assert_eq!(corrupt.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let query: ApiError = DocumentStoreError::InvalidQuery("bad operand".into()).into();
        assert_eq!(query.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(ApiError::not_found("User not found").status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_message_is_verbatim() {
        assert_eq!(ApiError::not_found("User not found").to_string(), "User not found");
    }
}
