//! Responses to questions.

pub mod model;

use qa_db::queries::{questions, responses as queries};
use qa_db::DbPool;
use tracing::info;

use crate::error::{QaError, QaResult};
use crate::{validation, Author};
use model::Response;

/// Post a response to an existing question.
pub fn create_response(
    pool: &DbPool,
    question_id: i64,
    message: &str,
    author: &Author,
) -> QaResult<Response> {
    ensure_question(pool, question_id)?;
    validation::message(message)?;

    let id = queries::create_response(
        pool,
        question_id,
        message,
        author.user_id(),
        author.guest_name(),
    )?;
    info!(question_id, response_id = id, "New response created");

    Ok(Response::from_row(queries::get_response(pool, id)?))
}

/// List the responses to a question, oldest first.
pub fn list_responses(pool: &DbPool, question_id: i64) -> QaResult<Vec<Response>> {
    ensure_question(pool, question_id)?;
    let rows = queries::list_responses(pool, question_id)?;
    Ok(rows.into_iter().map(Response::from_row).collect())
}

/// Every response in the database, oldest first.
pub fn list_all_responses(pool: &DbPool) -> QaResult<Vec<Response>> {
    let rows = queries::list_all_responses(pool)?;
    Ok(rows.into_iter().map(Response::from_row).collect())
}

fn ensure_question(pool: &DbPool, question_id: i64) -> QaResult<()> {
    if questions::question_exists(pool, question_id)? {
        Ok(())
    } else {
        Err(QaError::QuestionNotFound(question_id))
    }
}
