//! Questions: creation, listing and status changes.

pub mod model;

use qa_db::queries::questions as queries;
use qa_db::{DbError, DbPool};
use tracing::info;

use crate::error::{QaError, QaResult};
use crate::user::model::User;
use crate::{validation, Author};
use model::{Question, QuestionStatus};

/// Create a new question in `Pending` status.
pub fn create_question(pool: &DbPool, message: &str, author: &Author) -> QaResult<Question> {
    validation::message(message)?;

    let id = queries::create_question(pool, message, author.user_id(), author.guest_name())?;
    info!(question_id = id, author = author.display_name(), "New question created");

    get_question(pool, id)
}

/// Get a question by id.
pub fn get_question(pool: &DbPool, id: i64) -> QaResult<Question> {
    match queries::get_question(pool, id) {
        Ok(row) => Ok(Question::from_row(row)),
        Err(DbError::NotFound(_)) => Err(QaError::QuestionNotFound(id)),
        Err(e) => Err(e.into()),
    }
}

/// List questions, escalated first, then pending, then answered; newest first within each.
///
/// `status` must be one of the exact status names when given.
pub fn list_questions(pool: &DbPool, status: Option<&str>) -> QaResult<Vec<Question>> {
    let filter = status.map(str::parse::<QuestionStatus>).transpose()?;
    let rows = queries::list_questions(pool, filter.as_ref().map(QuestionStatus::as_str))?;
    Ok(rows.into_iter().map(Question::from_row).collect())
}

/// Change a question's status on behalf of an authenticated user.
///
/// Marking a question `Answered` records when and by whom.
pub fn update_status(
    pool: &DbPool,
    id: i64,
    status: QuestionStatus,
    actor: &User,
) -> QaResult<Question> {
    let answered_by = (status == QuestionStatus::Answered).then_some(actor.user_id);

    match queries::update_question_status(pool, id, status.as_str(), answered_by) {
        Ok(()) => {}
        Err(DbError::NotFound(_)) => return Err(QaError::QuestionNotFound(id)),
        Err(e) => return Err(e.into()),
    }

    info!(question_id = id, %status, by = %actor.username, "Question status updated");
    get_question(pool, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qa_db::init_in_memory;

    fn guest() -> Author {
        Author::Guest {
            name: "Sam".to_string(),
        }
    }

    fn register(pool: &DbPool, name: &str) -> User {
        let id = qa_db::queries::users::create_user(pool, name, &format!("{name}@example.com"), "x")
            .unwrap();
        crate::user::get_user(pool, id).unwrap()
    }

    #[test]
    fn test_create_question_as_guest() {
        let pool = init_in_memory().unwrap();
        let q = create_question(&pool, "How do I join?", &guest()).unwrap();
        assert_eq!(q.status, QuestionStatus::Pending);
        assert_eq!(q.guest_name.as_deref(), Some("Sam"));
        assert_eq!(q.username, None);
        assert_eq!(q.response_count, 0);
    }

    #[test]
    fn test_create_question_as_user_drops_guest_name() {
        let pool = init_in_memory().unwrap();
        let alice = register(&pool, "alice");
        let author = Author::resolve(Some(&alice), Some("ignored")).unwrap();
        let q = create_question(&pool, "Hi", &author).unwrap();
        assert_eq!(q.username.as_deref(), Some("alice"));
        assert_eq!(q.guest_name, None);
    }

    #[test]
    fn test_create_question_rejects_empty_message() {
        let pool = init_in_memory().unwrap();
        assert!(matches!(
            create_question(&pool, "", &guest()),
            Err(QaError::ValidationError(_))
        ));
    }

    #[test]
    fn test_update_status_to_answered() {
        let pool = init_in_memory().unwrap();
        let alice = register(&pool, "alice");
        let q = create_question(&pool, "Q", &guest()).unwrap();

        let updated =
            update_status(&pool, q.question_id, QuestionStatus::Answered, &alice).unwrap();
        assert_eq!(updated.status, QuestionStatus::Answered);

        let row = qa_db::queries::questions::get_question(&pool, q.question_id).unwrap();
        assert_eq!(row.answered_by, Some(alice.user_id));
    }

    #[test]
    fn test_update_missing_question() {
        let pool = init_in_memory().unwrap();
        let alice = register(&pool, "alice");
        assert!(matches!(
            update_status(&pool, 404, QuestionStatus::Escalated, &alice),
            Err(QaError::QuestionNotFound(404))
        ));
    }

    #[test]
    fn test_list_with_filter() {
        let pool = init_in_memory().unwrap();
        let alice = register(&pool, "alice");
        let a = create_question(&pool, "a", &guest()).unwrap();
        create_question(&pool, "b", &guest()).unwrap();
        update_status(&pool, a.question_id, QuestionStatus::Escalated, &alice).unwrap();

        let escalated = list_questions(&pool, Some("Escalated")).unwrap();
        assert_eq!(escalated.len(), 1);
        assert_eq!(escalated[0].question_id, a.question_id);

        assert_eq!(list_questions(&pool, None).unwrap()[0].question_id, a.question_id);
        assert!(matches!(
            list_questions(&pool, Some("Closed")),
            Err(QaError::ValidationError(_))
        ));
    }
}
