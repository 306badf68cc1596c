//! Persisted run history.
//!
//! One row per applied migration, appended during `up` and deleted during
//! `down` of the same batch. Rows are never updated in place.

use crate::error::{MigrateError, MigrateResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use duckdb::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use tm_core::sql_utils::{quote_ident, quote_qualified};
use tm_core::MigrationName;

/// Default ledger table name.
pub const DEFAULT_LEDGER_TABLE: &str = "tidemark_migrations";

// DuckDB timestamps hold microseconds; reads may omit a zero fraction.
const STAMP_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const STAMP_READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A ledger row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationRecord {
    pub base_name: MigrationName,
    pub migration_class: String,
    pub batch: i64,
    pub stamp: DateTime<Utc>,
}

/// Ledger table accessor on the running connection.
pub struct BatchLedger<'c> {
    conn: &'c Connection,
    table: String,
    quoted: String,
}

impl<'c> BatchLedger<'c> {
    pub fn new(conn: &'c Connection, table: impl Into<String>) -> Self {
        let table = table.into();
        let quoted = quote_qualified(&table);
        Self {
            conn,
            table,
            quoted,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the ledger table (and its schema, when qualified) if missing.
    pub fn ensure_table(&self) -> MigrateResult<()> {
        let mut ddl = String::new();
        if let Some((schema, _)) = self.table.rsplit_once('.') {
            ddl.push_str(&format!("CREATE SCHEMA IF NOT EXISTS {};\n", quote_ident(schema)));
        }
        ddl.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                base_name       VARCHAR PRIMARY KEY,
                migration_class VARCHAR NOT NULL,
                batch           INTEGER NOT NULL,
                stamp           TIMESTAMP NOT NULL
            );",
            self.quoted
        ));
        self.conn.execute_batch(&ddl).map_err(|e| {
            MigrateError::PersistenceError(format!(
                "failed to create ledger table {}: {e}",
                self.table
            ))
        })?;
        Ok(())
    }

    /// Recorded migrations, base name to type identifier.
    ///
    /// With `latest_only`, just the records of the highest batch.
    pub fn run_migrations(&self, latest_only: bool) -> MigrateResult<BTreeMap<MigrationName, String>> {
        let mut sql = format!("SELECT base_name, migration_class FROM {}", self.quoted);
        if latest_only {
            sql.push_str(&format!(
                " WHERE batch = (SELECT MAX(batch) FROM {})",
                self.quoted
            ));
        }
        let mut stmt = self.conn.prepare(&sql)?;
        let runs = stmt
            .query_map([], |row| {
                Ok((
                    MigrationName::new(row.get::<_, String>(0)?),
                    row.get::<_, String>(1)?,
                ))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(runs)
    }

    /// Highest recorded batch, 0 for an empty ledger.
    pub fn latest_batch(&self) -> MigrateResult<i64> {
        let sql = format!("SELECT COALESCE(MAX(batch), 0) FROM {}", self.quoted);
        let batch: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(batch)
    }

    /// Append a record. A base name may be recorded only once.
    pub fn record(
        &self,
        base_name: &str,
        migration_class: &str,
        batch: i64,
        stamp: DateTime<Utc>,
    ) -> MigrateResult<()> {
        if self.contains(base_name)? {
            return Err(MigrateError::PersistenceError(format!(
                "migration '{base_name}' is already recorded"
            )));
        }
        let sql = format!(
            "INSERT INTO {} (base_name, migration_class, batch, stamp) \
             VALUES (?, ?, ?, CAST(? AS TIMESTAMP))",
            self.quoted
        );
        let stamp = stamp.naive_utc().format(STAMP_WRITE_FORMAT).to_string();
        self.conn.execute(
            &sql,
            duckdb::params![base_name, migration_class, batch, stamp],
        )?;
        log::debug!("Recorded {base_name} in batch {batch}");
        Ok(())
    }

    /// Delete the record for `base_name`, which must exist.
    pub fn remove(&self, base_name: &str) -> MigrateResult<()> {
        let sql = format!("DELETE FROM {} WHERE base_name = ?", self.quoted);
        let deleted = self.conn.execute(&sql, duckdb::params![base_name])?;
        if deleted == 0 {
            return Err(MigrateError::PersistenceError(format!(
                "migration '{base_name}' is not recorded"
            )));
        }
        log::debug!("Removed {base_name} from ledger");
        Ok(())
    }

    /// Every record, ascending by base name.
    pub fn records(&self) -> MigrateResult<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT base_name, migration_class, batch, CAST(stamp AS VARCHAR) \
             FROM {} ORDER BY base_name",
            self.quoted
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(base_name, migration_class, batch, stamp)| {
                let stamp = NaiveDateTime::parse_from_str(&stamp, STAMP_READ_FORMAT)
                    .map_err(|e| {
                        MigrateError::PersistenceError(format!(
                            "unreadable stamp '{stamp}' for {base_name}: {e}"
                        ))
                    })?
                    .and_utc();
                Ok(MigrationRecord {
                    base_name: MigrationName::new(base_name),
                    migration_class,
                    batch,
                    stamp,
                })
            })
            .collect()
    }

    fn contains(&self, base_name: &str) -> MigrateResult<bool> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE base_name = ?", self.quoted);
        let count: i64 = self
            .conn
            .query_row(&sql, duckdb::params![base_name], |row| row.get(0))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
