//! Store connection wrapper.
//!
//! [`Store`] owns the DuckDB [`Connection`] that an invocation runs against
//! and provides the transaction scope a whole `up` or `down` executes in.

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use std::path::Path;

/// Wrapper around the DuckDB connection migrations run against.
///
/// Single-threaded: one runner execution per process, so no `Mutex`.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) a DuckDB database file.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        log::debug!("Opened store at {}", path.display());
        Ok(Self { conn })
    }

    /// Create an in-memory store.
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open from a path string, treating `:memory:` as an in-memory store.
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::open_memory()
        } else {
            Self::open(Path::new(path))
        }
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    ///
    /// DuckDB DDL is transactional, so schema changes made by `body` are
    /// undone together with data changes.
    pub fn transaction<F, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    ))
                    .into());
                }
            }
            Err(_) => {
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK") {
                    log::error!("ROLLBACK failed: {rollback_err}");
                }
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
