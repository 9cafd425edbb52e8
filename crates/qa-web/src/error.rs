//! HTTP error responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use qa_core::QaError;
use serde_json::json;
use tracing::error;

/// Error returned by route handlers, rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<QaError> for ApiError {
    fn from(err: QaError) -> Self {
        let status = match &err {
            QaError::ValidationError(_) | QaError::UsernameTaken | QaError::EmailTaken => {
                StatusCode::BAD_REQUEST
            }
            QaError::InvalidCredentials | QaError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            QaError::QuestionNotFound(_) | QaError::UserNotFound(_) => StatusCode::NOT_FOUND,
            QaError::Database(_) | QaError::Json(_) | QaError::Auth(_) | QaError::Config(_) => {
                error!(error = %err, "Request failed");
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(json!({ "detail": self.detail }))).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
