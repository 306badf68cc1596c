//! Handle passed to migration bodies.
//!
//! Everything a unit does goes through the connection of the enclosing
//! transaction, so a failure anywhere in the batch undoes all of it.

use crate::error::MigrateResult;
use duckdb::Connection;
use std::collections::{BTreeMap, BTreeSet};
use tm_db::copy::DEFAULT_STAGE_SUFFIXES;
use tm_db::{CopyOptions, RowAccessor, RowValue, SchemaIntrospector, TableCopier};

/// Schema and row helpers bound to the running transaction.
pub struct MigrationContext<'c> {
    conn: &'c Connection,
    id_column: String,
    stage_suffixes: Vec<String>,
}

impl<'c> MigrationContext<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            id_column: "ID".to_string(),
            stage_suffixes: DEFAULT_STAGE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self
    }

    pub fn with_stage_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.stage_suffixes = suffixes;
        self
    }

    /// The raw connection, for statements the helpers do not cover.
    pub fn conn(&self) -> &'c Connection {
        self.conn
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn schema(&self) -> SchemaIntrospector<'c> {
        SchemaIntrospector::new(self.conn)
    }

    pub fn rows(&self) -> RowAccessor<'c> {
        RowAccessor::new(self.conn, self.id_column.as_str())
    }

    pub fn copier(&self) -> TableCopier<'c> {
        TableCopier::new(self.conn, self.id_column.as_str())
            .with_suffixes(self.stage_suffixes.clone())
    }

    // ── Raw statements ─────────────────────────────────────────────────

    /// Execute one statement, returning the affected row count.
    pub fn execute(&self, sql: &str) -> MigrateResult<usize> {
        log::debug!("{sql}");
        Ok(self.conn.execute(sql, [])?)
    }

    /// Execute a `;`-separated batch of statements.
    pub fn execute_batch(&self, sql: &str) -> MigrateResult<()> {
        log::debug!("{sql}");
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    // ── Schema ─────────────────────────────────────────────────────────

    pub fn table_exists(&self, table: &str) -> MigrateResult<bool> {
        Ok(self.schema().table_exists(table)?)
    }

    pub fn column_exists(&self, table: &str, column: &str) -> MigrateResult<bool> {
        Ok(self.schema().column_exists(table, column)?)
    }

    pub fn columns_exist(&self, table: &str, columns: &[&str]) -> MigrateResult<bool> {
        Ok(self.schema().columns_exist(table, columns)?)
    }

    pub fn table_columns(&self, table: &str) -> MigrateResult<BTreeMap<String, String>> {
        Ok(self.schema().table_columns(table)?)
    }

    /// Add the columns `table` does not have yet, given as column to type
    /// definition. Returns those added.
    pub fn add_columns<I, K, V>(&self, table: &str, columns: I) -> MigrateResult<BTreeSet<String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let columns: BTreeMap<String, String> = columns
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Ok(self.schema().add_columns(table, &columns)?)
    }

    /// Drop the listed columns that exist. Returns those dropped.
    pub fn drop_columns(&self, table: &str, columns: &[&str]) -> MigrateResult<BTreeSet<String>> {
        Ok(self.schema().drop_columns(table, columns)?)
    }

    // ── Rows ───────────────────────────────────────────────────────────

    pub fn get_row_value(
        &self,
        table: &str,
        column: &str,
        id: impl Into<RowValue>,
    ) -> MigrateResult<Option<RowValue>> {
        Ok(self.rows().get_row_value(table, column, id)?)
    }

    pub fn get_row_values(
        &self,
        table: &str,
        columns: &[&str],
        id: impl Into<RowValue>,
    ) -> MigrateResult<BTreeMap<String, RowValue>> {
        Ok(self.rows().get_row_values(table, columns, id)?)
    }

    pub fn set_row_values(
        &self,
        table: &str,
        values: &BTreeMap<String, RowValue>,
        id: impl Into<RowValue>,
        allow_insert: bool,
    ) -> MigrateResult<bool> {
        Ok(self.rows().set_row_values(table, values, id, allow_insert)?)
    }

    // ── Copies ─────────────────────────────────────────────────────────

    pub fn copy_table(&self, from: &str, to: &str, options: &CopyOptions) -> MigrateResult<usize> {
        Ok(self.copier().copy_table(from, to, options)?)
    }

    pub fn copy_versioned_table(
        &self,
        from_entity: &str,
        to_entity: &str,
        options: &CopyOptions,
    ) -> MigrateResult<usize> {
        Ok(self.copier().copy_versioned_table(from_entity, to_entity, options)?)
    }
}
