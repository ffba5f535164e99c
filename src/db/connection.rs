use rusqlite::Connection;
use tracing::info;

use crate::db::listings::count_listings;
use crate::errors::ServerError;

pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Handle to the SQLite store. Holds only the path: every use opens its
/// own connection, and the connection closes when the scope that opened it
/// ends (on success and on error alike).
#[derive(Debug, Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn open(&self) -> Result<Connection, rusqlite::Error> {
        Connection::open(&self.path)
    }

    /// Provides a mutable connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServerError>,
    {
        let mut conn = self
            .open()
            .map_err(|e| ServerError::DbError(format!("Open DB failed: {e}")))?;
        f(&mut conn)
    }
}

/// Create the `annonces` table if it doesn't exist yet.
pub fn ensure_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}

pub fn init_db(db: &Database) -> Result<(), ServerError> {
    let existing = db.with_conn(|conn| {
        ensure_schema(conn)
            .map_err(|e| ServerError::DbError(format!("Failed to apply schema: {e}")))?;
        count_listings(conn).map_err(|e| ServerError::DbError(e.to_string()))
    })?;

    info!(path = db.path(), listings = existing, "Database initialized");
    Ok(())
}
