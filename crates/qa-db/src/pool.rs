//! SQLite connection handle.

use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Connection(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// A single serialized SQLite connection.
///
/// Every query runs under the lock, so callers on different tasks never
/// observe a half-applied write.
pub struct DbPool {
    conn: Mutex<Connection>,
}

impl DbPool {
    /// Open or create the database file at `path`.
    pub fn open(path: &Path) -> DbResult<Self> {
        tracing::info!(path = %path.display(), "Opening database");

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with shared access to the connection.
    pub fn with_conn<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Run `f` with exclusive access to the connection (transactions, migrations).
    pub fn with_conn_mut<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        let mut conn = self.conn.lock();
        f(&mut conn)
    }
}

/// Current UTC time in the fixed-width format stored in every timestamp column.
///
/// Fixed width keeps lexicographic `ORDER BY` equal to chronological order.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
