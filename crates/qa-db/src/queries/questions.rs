//! Question queries.

use crate::pool::{now_timestamp, DbError, DbPool, DbResult};
use rusqlite::{params, Row};

/// Question row joined with its author's username and response count.
#[derive(Debug, Clone)]
pub struct QuestionRow {
    pub question_id: i64,
    pub user_id: Option<i64>,
    pub guest_name: Option<String>,
    pub message: String,
    pub status: String,
    pub created_at: String,
    pub answered_at: Option<String>,
    pub answered_by: Option<i64>,
    pub username: Option<String>,
    pub response_count: i64,
}

const QUESTION_SELECT: &str = "
    SELECT q.question_id, q.user_id, q.guest_name, q.message, q.status,
           q.created_at, q.answered_at, q.answered_by, u.username,
           (SELECT COUNT(*) FROM responses r WHERE r.question_id = q.question_id)
    FROM questions q
    LEFT JOIN users u ON u.user_id = q.user_id";

fn map_question(row: &Row<'_>) -> rusqlite::Result<QuestionRow> {
    Ok(QuestionRow {
        question_id: row.get(0)?,
        user_id: row.get(1)?,
        guest_name: row.get(2)?,
        message: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
        answered_at: row.get(6)?,
        answered_by: row.get(7)?,
        username: row.get(8)?,
        response_count: row.get(9)?,
    })
}

/// Insert a new question in `Pending` status and return its id.
pub fn create_question(
    pool: &DbPool,
    message: &str,
    user_id: Option<i64>,
    guest_name: Option<&str>,
) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO questions (user_id, guest_name, message, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, guest_name, message, now_timestamp()],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get a question by id.
pub fn get_question(pool: &DbPool, question_id: i64) -> DbResult<QuestionRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("{QUESTION_SELECT} WHERE q.question_id = ?1"),
            params![question_id],
            map_question,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Question: {}", question_id))
            }
            e => DbError::Connection(e),
        })
    })
}

/// Whether a question with this id exists.
pub fn question_exists(pool: &DbPool, question_id: i64) -> DbResult<bool> {
    pool.with_conn(|conn| {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM questions WHERE question_id = ?1",
            params![question_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    })
}

/// List questions: escalated first, then pending, then answered; newest first within a group.
pub fn list_questions(pool: &DbPool, status: Option<&str>) -> DbResult<Vec<QuestionRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "{QUESTION_SELECT}
             WHERE (?1 IS NULL OR q.status = ?1)
             ORDER BY CASE q.status
                          WHEN 'Escalated' THEN 0
                          WHEN 'Pending' THEN 1
                          ELSE 2
                      END,
                      q.created_at DESC,
                      q.question_id DESC"
        ))?;

        let rows = stmt.query_map(params![status], map_question)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Update a question's status.
///
/// When `answered_by` is given the answer timestamp and answering user are recorded too.
pub fn update_question_status(
    pool: &DbPool,
    question_id: i64,
    status: &str,
    answered_by: Option<i64>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = match answered_by {
            Some(user_id) => conn.execute(
                "UPDATE questions SET status = ?1, answered_at = ?2, answered_by = ?3
                 WHERE question_id = ?4",
                params![status, now_timestamp(), user_id, question_id],
            )?,
            None => conn.execute(
                "UPDATE questions SET status = ?1 WHERE question_id = ?2",
                params![status, question_id],
            )?,
        };

        if changed == 0 {
            return Err(DbError::NotFound(format!("Question: {}", question_id)));
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_in_memory;
    use crate::queries::{responses, users};

    #[test]
    fn test_create_and_get_question() {
        let pool = init_in_memory().unwrap();
        let uid = users::create_user(&pool, "alice", "alice@example.com", "hash").unwrap();

        let guest_q = create_question(&pool, "Where is the venue?", None, Some("Guest")).unwrap();
        let user_q = create_question(&pool, "What time?", Some(uid), None).unwrap();

        let guest = get_question(&pool, guest_q).unwrap();
        assert_eq!(guest.status, "Pending");
        assert_eq!(guest.guest_name.as_deref(), Some("Guest"));
        assert!(guest.username.is_none());
        assert_eq!(guest.response_count, 0);

        let user = get_question(&pool, user_q).unwrap();
        assert_eq!(user.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_get_missing_question() {
        let pool = init_in_memory().unwrap();
        assert!(matches!(get_question(&pool, 42), Err(DbError::NotFound(_))));
        assert!(!question_exists(&pool, 42).unwrap());
    }

    #[test]
    fn test_list_orders_escalated_first() {
        let pool = init_in_memory().unwrap();
        let first = create_question(&pool, "first", None, Some("g")).unwrap();
        let second = create_question(&pool, "second", None, Some("g")).unwrap();
        let third = create_question(&pool, "third", None, Some("g")).unwrap();

        update_question_status(&pool, first, "Escalated", None).unwrap();
        update_question_status(&pool, third, "Answered", None).unwrap();

        let ids: Vec<i64> = list_questions(&pool, None)
            .unwrap()
            .into_iter()
            .map(|q| q.question_id)
            .collect();
        assert_eq!(ids, vec![first, second, third]);

        let pending = list_questions(&pool, Some("Pending")).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].question_id, second);
    }

    #[test]
    fn test_answered_records_answerer() {
        let pool = init_in_memory().unwrap();
        let uid = users::create_user(&pool, "alice", "alice@example.com", "hash").unwrap();
        let qid = create_question(&pool, "q", None, Some("g")).unwrap();

        update_question_status(&pool, qid, "Answered", Some(uid)).unwrap();
        let q = get_question(&pool, qid).unwrap();
        assert_eq!(q.status, "Answered");
        assert_eq!(q.answered_by, Some(uid));
        assert!(q.answered_at.is_some());

        assert!(matches!(
            update_question_status(&pool, 999, "Pending", None),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn test_response_count() {
        let pool = init_in_memory().unwrap();
        let qid = create_question(&pool, "q", None, Some("g")).unwrap();
        responses::create_response(&pool, qid, "a1", None, Some("g")).unwrap();
        responses::create_response(&pool, qid, "a2", None, Some("g")).unwrap();
        assert_eq!(get_question(&pool, qid).unwrap().response_count, 2);
    }
}
