//! Response domain models.

use chrono::{DateTime, Utc};
use qa_db::queries::responses::ResponseRow;
use serde::{Deserialize, Serialize};

/// A response posted to a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub response_id: i64,
    pub question_id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub guest_name: Option<String>,
    pub username: Option<String>,
}

impl Response {
    /// Create from database row.
    pub fn from_row(row: ResponseRow) -> Self {
        Self {
            response_id: row.response_id,
            question_id: row.question_id,
            message: row.message,
            created_at: crate::parse_timestamp(&row.created_at),
            guest_name: row.guest_name,
            username: row.username,
        }
    }

    pub fn author(&self) -> &str {
        self.username
            .as_deref()
            .or(self.guest_name.as_deref())
            .unwrap_or("Anonymous")
    }
}
