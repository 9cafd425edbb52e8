//! Response queries.

use crate::pool::{now_timestamp, DbError, DbPool, DbResult};
use rusqlite::{params, Row};

/// Response row joined with its author's username.
#[derive(Debug, Clone)]
pub struct ResponseRow {
    pub response_id: i64,
    pub question_id: i64,
    pub user_id: Option<i64>,
    pub guest_name: Option<String>,
    pub message: String,
    pub created_at: String,
    pub username: Option<String>,
}

const RESPONSE_SELECT: &str = "
    SELECT r.response_id, r.question_id, r.user_id, r.guest_name, r.message,
           r.created_at, u.username
    FROM responses r
    LEFT JOIN users u ON u.user_id = r.user_id";

fn map_response(row: &Row<'_>) -> rusqlite::Result<ResponseRow> {
    Ok(ResponseRow {
        response_id: row.get(0)?,
        question_id: row.get(1)?,
        user_id: row.get(2)?,
        guest_name: row.get(3)?,
        message: row.get(4)?,
        created_at: row.get(5)?,
        username: row.get(6)?,
    })
}

/// Insert a response to a question and return its id.
pub fn create_response(
    pool: &DbPool,
    question_id: i64,
    message: &str,
    user_id: Option<i64>,
    guest_name: Option<&str>,
) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO responses (question_id, user_id, guest_name, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![question_id, user_id, guest_name, message, now_timestamp()],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get a response by id.
pub fn get_response(pool: &DbPool, response_id: i64) -> DbResult<ResponseRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("{RESPONSE_SELECT} WHERE r.response_id = ?1"),
            params![response_id],
            map_response,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Response: {}", response_id))
            }
            e => DbError::Connection(e),
        })
    })
}

/// List the responses to a question, oldest first.
pub fn list_responses(pool: &DbPool, question_id: i64) -> DbResult<Vec<ResponseRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "{RESPONSE_SELECT} WHERE r.question_id = ?1
             ORDER BY r.created_at, r.response_id"
        ))?;
        let rows = stmt.query_map(params![question_id], map_response)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// List every response in the database, oldest first.
pub fn list_all_responses(pool: &DbPool) -> DbResult<Vec<ResponseRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "{RESPONSE_SELECT} ORDER BY r.created_at, r.response_id"
        ))?;
        let rows = stmt.query_map([], map_response)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
