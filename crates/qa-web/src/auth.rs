//! Bearer-token extractors.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use qa_core::auth;
use qa_core::user::model::User;
use qa_core::QaError;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller. Rejects the request with 401 when absent or invalid.
pub struct CurrentUser(pub User);

/// The caller if a valid bearer token was sent, otherwise a guest.
pub struct MaybeUser(pub Option<User>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts).ok_or_else(|| QaError::unauthorized("Not authenticated"))?;
        let user = auth::resolve_user(&state.db, &state.tokens, token)?;
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self(None));
        };

        match auth::resolve_user(&state.db, &state.tokens, token) {
            Ok(user) => Ok(Self(Some(user))),
            Err(QaError::Unauthorized(reason)) => {
                debug!(%reason, "Ignoring invalid bearer token, treating caller as guest");
                Ok(Self(None))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("bearer  abc "))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }
}
