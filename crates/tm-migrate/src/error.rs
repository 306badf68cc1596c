//! Error types for tm-migrate

use thiserror::Error;
use tm_db::DbError;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// M001: Unrecognized or missing action
    #[error("[M001] {0}")]
    UsageError(String),

    /// M002: Registry or ledger names a migration that cannot be resolved
    #[error("[M002] Migration discovery failed: {0}")]
    DiscoveryError(String),

    /// M003: Ledger write or delete did not find the expected state
    #[error("[M003] Ledger persistence failed: {0}")]
    PersistenceError(String),

    /// M004: Input rejected before anything ran
    #[error("[M004] Validation failed: {0}")]
    ValidationError(String),

    /// M005: Migration directory or project setup is unusable
    #[error("[M005] Configuration error: {0}")]
    ConfigurationError(String),

    /// M006: Scaffold target already taken
    #[error("[M006] Name collision: {0}")]
    NameCollisionError(String),

    /// M007: A migration body failed; the batch was rolled back
    #[error("[M007] Migration '{base_name}' failed")]
    MigrationFault {
        base_name: String,
        #[source]
        source: Box<MigrateError>,
    },

    /// M008: Store error with preserved source chain
    #[error("[M008] Store error")]
    Store(#[from] DbError),

    /// M009: IO error with file path context
    #[error("[M009] IO error on '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;

impl From<duckdb::Error> for MigrateError {
    fn from(err: duckdb::Error) -> Self {
        MigrateError::Store(DbError::from(err))
    }
}

impl MigrateError {
    /// Wrap an error raised inside a migration body.
    pub fn fault(base_name: impl Into<String>, source: MigrateError) -> Self {
        MigrateError::MigrationFault {
            base_name: base_name.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error can only come from inside a batch transaction,
    /// which the store has rolled back.
    pub fn is_batch_failure(&self) -> bool {
        matches!(
            self,
            MigrateError::MigrationFault { .. }
                | MigrateError::PersistenceError(_)
                | MigrateError::Store(_)
        )
    }
}
