//! Question route handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use qa_core::question::{self, model::Question, model::QuestionStatus};
use qa_core::{Author, Envelope};
use serde::Deserialize;

use crate::auth::{CurrentUser, MaybeUser};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateQuestionRequest {
    pub message: String,
    pub guest_name: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateQuestionRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct ListQuestionsQuery {
    pub status: Option<String>,
}

pub async fn create_question(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<Json<Question>, ApiError> {
    let author = Author::resolve(user.as_ref(), req.guest_name.as_deref())?;
    let question = question::create_question(&state.db, &req.message, &author)?;

    state.broadcast(Envelope::new_question(&question)).await;

    Ok(Json(question))
}

pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<ListQuestionsQuery>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = question::list_questions(&state.db, query.status.as_deref())?;
    Ok(Json(questions))
}

pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Question>, ApiError> {
    Ok(Json(question::get_question(&state.db, id)?))
}

pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateQuestionRequest>,
) -> Result<Json<Question>, ApiError> {
    let status: QuestionStatus = req.status.parse()?;
    let question = question::update_status(&state.db, id, status, &user)?;

    state.broadcast(Envelope::question_updated(&question)).await;

    Ok(Json(question))
}
