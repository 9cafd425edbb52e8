//! Credential hashing and bearer tokens.

pub mod password;
pub mod token;

pub use token::{Claims, TokenService};

use serde::{Deserialize, Serialize};

/// Body returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub username: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String, username: impl Into<String>) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            username: username.into(),
        }
    }
}

/// Resolve a bearer token to the user it was issued for.
pub fn resolve_user(
    pool: &qa_db::DbPool,
    tokens: &TokenService,
    token: &str,
) -> crate::QaResult<crate::user::model::User> {
    let claims = tokens.verify(token)?;
    crate::user::get_by_username(pool, &claims.sub)?
        .ok_or_else(|| crate::QaError::unauthorized("Could not validate credentials"))
}
