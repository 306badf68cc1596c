//! Error types for tm-db

use thiserror::Error;

/// Store operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table not found: {0}")]
    TableNotFound(String),

    /// Transaction management error (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),

    /// Helper input rejected before touching the store (D005)
    #[error("[D005] Validation failed: {0}")]
    ValidationError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        classify_message(err.to_string())
    }
}

/// duckdb::Error does not expose structured catalog variants, so the
/// message is the only thing to classify on. Only the missing-table forms
/// map to `TableNotFound`; "already exists" stays an execution error.
fn classify_message(msg: String) -> DbError {
    let missing = msg.contains("does not exist") || msg.contains("not found");
    if missing && msg.contains("Catalog Error") && msg.contains("Table") {
        DbError::TableNotFound(msg)
    } else {
        DbError::ExecutionError(msg)
    }
}

/// Attach the failing statement to a DuckDB error.
pub(crate) trait DbResultExt<T> {
    fn with_sql(self, sql: &str) -> DbResult<T>;
}

impl<T> DbResultExt<T> for Result<T, duckdb::Error> {
    fn with_sql(self, sql: &str) -> DbResult<T> {
        self.map_err(|e| match DbError::from(e) {
            DbError::ExecutionError(msg) => DbError::ExecutionError(format!("{msg}: {sql}")),
            other => other,
        })
    }
}
