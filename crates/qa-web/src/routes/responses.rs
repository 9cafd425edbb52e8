//! Response route handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use qa_core::response::{self, model::Response};
use qa_core::{Author, Envelope};
use serde::Deserialize;

use crate::auth::MaybeUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateResponseRequest {
    pub message: String,
    pub guest_name: Option<String>,
}

pub async fn create_response(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    MaybeUser(user): MaybeUser,
    Json(req): Json<CreateResponseRequest>,
) -> Result<Json<Response>, ApiError> {
    // 404 for a missing question takes precedence over a missing guest name.
    qa_core::question::get_question(&state.db, question_id)?;

    let author = Author::resolve(user.as_ref(), req.guest_name.as_deref())?;
    let response = response::create_response(&state.db, question_id, &req.message, &author)?;

    state.broadcast(Envelope::new_response(&response)).await;

    Ok(Json(response))
}

pub async fn list_responses(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
) -> Result<Json<Vec<Response>>, ApiError> {
    Ok(Json(response::list_responses(&state.db, question_id)?))
}
