//! QA Dashboard Database Layer
//!
//! SQLite persistence for users, questions and responses.

pub mod migrations;
pub mod pool;
pub mod queries;

use std::path::Path;

pub use pool::{DbError, DbPool, DbResult};

/// Open (or create) the database at `path` and bring the schema up to date.
pub fn init_pool(path: &Path) -> DbResult<DbPool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::Migration(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
    }

    let pool = DbPool::open(path)?;
    migrations::run_migrations(&pool)?;
    Ok(pool)
}

/// In-memory database with the schema applied. Used by tests across the workspace.
pub fn init_in_memory() -> DbResult<DbPool> {
    let pool = DbPool::in_memory()?;
    migrations::run_migrations(&pool)?;
    Ok(pool)
}
