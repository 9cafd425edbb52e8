//! QA Dashboard Core Library
//!
//! Domain models and business logic for the real-time Q&A dashboard.

pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod question;
pub mod response;
pub mod user;
pub mod validation;

pub use error::{QaError, QaResult};
pub use event::{Envelope, EventKind};

/// Who wrote a question or response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    /// A registered, authenticated user.
    User { user_id: i64, username: String },
    /// An unauthenticated guest identified only by a self-supplied name.
    Guest { name: String },
}

impl Author {
    /// Resolve the author of a write: the authenticated user if any, otherwise
    /// the guest name, which is then mandatory.
    pub fn resolve(user: Option<&user::model::User>, guest_name: Option<&str>) -> QaResult<Self> {
        if let Some(user) = user {
            return Ok(Self::User {
                user_id: user.user_id,
                username: user.username.clone(),
            });
        }

        match guest_name.map(str::trim) {
            Some(name) if !name.is_empty() => {
                validation::guest_name(name)?;
                Ok(Self::Guest {
                    name: name.to_string(),
                })
            }
            _ => Err(QaError::validation(
                "Guest name is required for non-logged-in users",
            )),
        }
    }

    pub(crate) fn user_id(&self) -> Option<i64> {
        match self {
            Self::User { user_id, .. } => Some(*user_id),
            Self::Guest { .. } => None,
        }
    }

    pub(crate) fn guest_name(&self) -> Option<&str> {
        match self {
            Self::User { .. } => None,
            Self::Guest { name } => Some(name),
        }
    }

    /// Display name of the author.
    pub fn display_name(&self) -> &str {
        match self {
            Self::User { username, .. } => username,
            Self::Guest { name } => name,
        }
    }
}

/// Parse a stored RFC 3339 timestamp, falling back to the epoch for corrupt values.
pub(crate) fn parse_timestamp(value: &str) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_default()
}
