//! User domain models.

use chrono::{DateTime, Utc};
use qa_db::queries::users::UserRow;
use serde::{Deserialize, Serialize};

/// A registered user. The password hash stays in the database layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create from database row.
    pub fn from_row(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            username: row.username,
            email: row.email,
            is_admin: row.is_admin,
            created_at: crate::parse_timestamp(&row.created_at),
        }
    }
}
