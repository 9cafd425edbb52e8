//! User accounts: registration, login and admin flag.

pub mod model;

use qa_db::queries::users as queries;
use qa_db::{DbError, DbPool};
use tracing::info;

use crate::auth::password;
use crate::error::{QaError, QaResult};
use crate::validation;
use model::User;

/// Register a new account.
pub async fn register(
    pool: &DbPool,
    username: &str,
    email: &str,
    password: &str,
) -> QaResult<User> {
    validation::username(username)?;
    validation::email(email)?;
    validation::password(password)?;

    if queries::find_user_by_username(pool, username)?.is_some() {
        return Err(QaError::UsernameTaken);
    }
    if queries::find_user_by_email(pool, email)?.is_some() {
        return Err(QaError::EmailTaken);
    }

    let hash = password::hash_password(password).await?;
    let id = queries::create_user(pool, username, email, &hash)?;
    info!(user_id = id, username, "New user registered");

    get_user(pool, id)
}

/// Check a username/password pair.
pub async fn authenticate(pool: &DbPool, username: &str, password: &str) -> QaResult<User> {
    let row = queries::find_user_by_username(pool, username)?.ok_or(QaError::InvalidCredentials)?;

    if !password::verify_password(password, &row.password_hash).await? {
        return Err(QaError::InvalidCredentials);
    }

    info!(username, "User logged in");
    Ok(User::from_row(row))
}

/// Get a user by id.
pub fn get_user(pool: &DbPool, user_id: i64) -> QaResult<User> {
    match queries::get_user(pool, user_id) {
        Ok(row) => Ok(User::from_row(row)),
        Err(DbError::NotFound(_)) => Err(QaError::UserNotFound(user_id.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Look up a user by username.
pub fn get_by_username(pool: &DbPool, username: &str) -> QaResult<Option<User>> {
    Ok(queries::find_user_by_username(pool, username)?.map(User::from_row))
}

/// All registered users, oldest first.
pub fn list_users(pool: &DbPool) -> QaResult<Vec<User>> {
    Ok(queries::list_users(pool)?
        .into_iter()
        .map(User::from_row)
        .collect())
}

/// Grant the admin flag. Returns `false` if the user already had it.
pub fn make_admin(pool: &DbPool, username: &str) -> QaResult<bool> {
    let user = get_by_username(pool, username)?
        .ok_or_else(|| QaError::UserNotFound(username.to_string()))?;

    if user.is_admin {
        return Ok(false);
    }

    queries::set_admin(pool, user.user_id, true)?;
    info!(username, "User promoted to admin");
    Ok(true)
}
