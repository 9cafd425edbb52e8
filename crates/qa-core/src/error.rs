//! Centralized error types for the Q&A dashboard.

use thiserror::Error;

/// Main error type for dashboard operations.
#[derive(Error, Debug)]
pub enum QaError {
    #[error("Question not found")]
    QuestionNotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Username already registered")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] qa_db::DbError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication backend error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for dashboard operations.
pub type QaResult<T> = Result<T, QaError>;

impl QaError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an authentication failure.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
}
