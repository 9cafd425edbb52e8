//! Question domain models.

use chrono::{DateTime, Utc};
use qa_db::queries::questions::QuestionRow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QaError;

/// A question as shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question_id: i64,
    pub message: String,
    pub status: QuestionStatus,
    pub created_at: DateTime<Utc>,
    pub guest_name: Option<String>,
    pub username: Option<String>,
    pub response_count: i64,
}

impl Question {
    /// Create from database row.
    pub fn from_row(row: QuestionRow) -> Self {
        Self {
            question_id: row.question_id,
            message: row.message,
            status: row.status.parse().unwrap_or_default(),
            created_at: crate::parse_timestamp(&row.created_at),
            guest_name: row.guest_name,
            username: row.username,
            response_count: row.response_count,
        }
    }

    /// Display name of whoever asked.
    pub fn author(&self) -> &str {
        self.username
            .as_deref()
            .or(self.guest_name.as_deref())
            .unwrap_or("Anonymous")
    }
}

/// Question status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuestionStatus {
    #[default]
    Pending,
    Escalated,
    Answered,
}

impl QuestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Escalated => "Escalated",
            Self::Answered => "Answered",
        }
    }
}

impl FromStr for QuestionStatus {
    type Err = QaError;

    /// Exact, case-sensitive match on `Pending`, `Escalated` or `Answered`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Escalated" => Ok(Self::Escalated),
            "Answered" => Ok(Self::Answered),
            _ => Err(QaError::validation("Invalid status value")),
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
