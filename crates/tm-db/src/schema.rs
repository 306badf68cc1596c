//! Catalog introspection and column DDL.
//!
//! Table and column names are matched case-insensitively, the way DuckDB
//! resolves identifiers. Lookups return the catalog spelling so generated
//! statements address the real object.

use crate::error::{DbError, DbResult, DbResultExt};
use crate::sql;
use duckdb::Connection;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tm_core::sql_utils::{check_type_definition, quote_ident, split_qualified_name};

/// A table resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl TableRef {
    /// Fully quoted `"schema"."name"` form for statement building.
    pub fn quoted(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.name))
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.schema == "main" {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.schema, self.name)
        }
    }
}

/// Read-only view of the store catalog plus idempotent column DDL.
pub struct SchemaIntrospector<'c> {
    conn: &'c Connection,
}

impl<'c> SchemaIntrospector<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Resolve `table` (optionally `schema.table`) to its catalog entry.
    pub fn resolve_table(&self, table: &str) -> DbResult<Option<TableRef>> {
        let (schema, name) = split_qualified_name(table);
        let sql = "SELECT table_schema, table_name FROM information_schema.tables \
                   WHERE lower(table_schema) = lower(?) AND lower(table_name) = lower(?) \
                   ORDER BY table_name LIMIT 1";
        let mut stmt = self.conn.prepare(sql).with_sql(sql)?;
        let mut rows = stmt.query(duckdb::params![schema, name]).with_sql(sql)?;
        let resolved = match rows.next()? {
            Some(row) => Some(TableRef {
                schema: row.get(0)?,
                name: row.get(1)?,
            }),
            None => None,
        };
        Ok(resolved)
    }

    /// Resolve `table`, failing with [`DbError::TableNotFound`] when absent.
    pub fn require_table(&self, table: &str) -> DbResult<TableRef> {
        self.resolve_table(table)?
            .ok_or_else(|| DbError::TableNotFound(table.to_string()))
    }

    pub fn table_exists(&self, table: &str) -> DbResult<bool> {
        Ok(self.resolve_table(table)?.is_some())
    }

    /// Columns of `table` mapped to their catalog data type.
    ///
    /// Empty when the table does not exist.
    pub fn table_columns(&self, table: &str) -> DbResult<BTreeMap<String, String>> {
        match self.resolve_table(table)? {
            Some(table_ref) => self.columns_of(&table_ref),
            None => Ok(BTreeMap::new()),
        }
    }

    pub(crate) fn columns_of(&self, table: &TableRef) -> DbResult<BTreeMap<String, String>> {
        let sql = "SELECT column_name, data_type FROM information_schema.columns \
                   WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position";
        let mut stmt = self.conn.prepare(sql).with_sql(sql)?;
        let columns = stmt
            .query_map(duckdb::params![table.schema, table.name], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .with_sql(sql)?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(columns)
    }

    pub fn column_exists(&self, table: &str, column: &str) -> DbResult<bool> {
        let columns = self.table_columns(table)?;
        Ok(find_column(&columns, column).is_some())
    }

    /// True when the table exists and carries every listed column.
    pub fn columns_exist(&self, table: &str, columns: &[&str]) -> DbResult<bool> {
        if !self.table_exists(table)? {
            return Ok(false);
        }
        let existing = self.table_columns(table)?;
        Ok(columns.iter().all(|c| find_column(&existing, c).is_some()))
    }

    /// Add each column that is not already present.
    ///
    /// Returns the columns actually added, so a repeated call returns an
    /// empty set. The table must exist.
    pub fn add_columns(
        &self,
        table: &str,
        columns: &BTreeMap<String, String>,
    ) -> DbResult<BTreeSet<String>> {
        let table_ref = self.require_table(table)?;

        for (column, definition) in columns {
            check_type_definition(definition).map_err(|fragment| {
                DbError::ValidationError(format!(
                    "type definition for {table_ref}.{column} contains forbidden '{fragment}'"
                ))
            })?;
        }

        let existing = self.columns_of(&table_ref)?;
        let mut added = BTreeSet::new();
        for (column, definition) in columns {
            if find_column(&existing, column).is_some() {
                continue;
            }
            let stmt = sql::add_column(&table_ref.quoted(), column, definition);
            log::debug!("{stmt}");
            self.conn.execute(&stmt, []).with_sql(&stmt)?;
            added.insert(column.clone());
        }
        Ok(added)
    }

    /// Drop each listed column that exists.
    ///
    /// Returns the columns actually dropped. A missing table drops nothing.
    pub fn drop_columns(&self, table: &str, columns: &[&str]) -> DbResult<BTreeSet<String>> {
        let Some(table_ref) = self.resolve_table(table)? else {
            return Ok(BTreeSet::new());
        };

        let existing = self.columns_of(&table_ref)?;
        let mut dropped = BTreeSet::new();
        for column in columns {
            let Some(actual) = find_column(&existing, column) else {
                continue;
            };
            if dropped.contains(actual) {
                continue;
            }
            let stmt = sql::drop_column(&table_ref.quoted(), actual);
            log::debug!("{stmt}");
            self.conn.execute(&stmt, []).with_sql(&stmt)?;
            dropped.insert(actual.to_string());
        }
        Ok(dropped)
    }
}

/// Case-insensitive column lookup returning the catalog spelling.
pub(crate) fn find_column<'a>(columns: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    columns
        .keys()
        .find(|c| c.eq_ignore_ascii_case(name))
        .map(String::as_str)
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
