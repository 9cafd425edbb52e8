//! Account route handlers.

use axum::{extract::State, Json};
use qa_core::auth::TokenResponse;
use qa_core::user::{self, model::User};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = user::register(&state.db, &req.username, &req.email, &req.password).await?;
    let token = state.tokens.issue(&user.username)?;
    Ok(Json(TokenResponse::bearer(token, user.username)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = user::authenticate(&state.db, &req.username, &req.password).await?;
    let token = state.tokens.issue(&user.username)?;
    Ok(Json(TokenResponse::bearer(token, user.username)))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
