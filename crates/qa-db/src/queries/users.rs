//! User queries.

use crate::pool::{now_timestamp, DbError, DbPool, DbResult};
use rusqlite::{params, OptionalExtension, Row};

/// User row from database.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: String,
}

const USER_COLUMNS: &str = "user_id, username, email, password_hash, is_admin, created_at";

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        user_id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        is_admin: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Insert a new user and return its id.
pub fn create_user(
    pool: &DbPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO users (username, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![username, email, password_hash, now_timestamp()],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get a user by id.
pub fn get_user(pool: &DbPool, user_id: i64) -> DbResult<UserRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            params![user_id],
            map_user,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("User: {}", user_id)),
            e => DbError::Connection(e),
        })
    })
}

/// Look up a user by username.
pub fn find_user_by_username(pool: &DbPool, username: &str) -> DbResult<Option<UserRow>> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            map_user,
        )
        .optional()
        .map_err(DbError::from)
    })
}

/// Look up a user by email.
pub fn find_user_by_email(pool: &DbPool, email: &str) -> DbResult<Option<UserRow>> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            map_user,
        )
        .optional()
        .map_err(DbError::from)
    })
}

/// List all users, oldest first.
pub fn list_users(pool: &DbPool) -> DbResult<Vec<UserRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY user_id"
        ))?;
        let rows = stmt.query_map([], map_user)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Set or clear the admin flag.
pub fn set_admin(pool: &DbPool, user_id: i64, is_admin: bool) -> DbResult<()> {
    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE users SET is_admin = ?1 WHERE user_id = ?2",
            params![is_admin, user_id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("User: {}", user_id)));
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_in_memory;

    #[test]
    fn test_create_and_find_user() {
        let pool = init_in_memory().unwrap();
        let id = create_user(&pool, "alice", "alice@example.com", "hash").unwrap();

        let by_name = find_user_by_username(&pool, "alice").unwrap().unwrap();
        assert_eq!(by_name.user_id, id);
        assert!(!by_name.is_admin);

        let by_email = find_user_by_email(&pool, "alice@example.com").unwrap().unwrap();
        assert_eq!(by_email.username, "alice");

        assert!(find_user_by_username(&pool, "bob").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let pool = init_in_memory().unwrap();
        create_user(&pool, "alice", "a@example.com", "hash").unwrap();
        let err = create_user(&pool, "alice", "b@example.com", "hash").unwrap_err();
        assert!(matches!(err, DbError::Connection(_)));
    }

    #[test]
    fn test_set_admin() {
        let pool = init_in_memory().unwrap();
        let id = create_user(&pool, "alice", "alice@example.com", "hash").unwrap();
        set_admin(&pool, id, true).unwrap();
        assert!(get_user(&pool, id).unwrap().is_admin);

        assert!(matches!(set_admin(&pool, 999, true), Err(DbError::NotFound(_))));
    }
}
