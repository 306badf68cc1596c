//! Raw row reads and writes keyed by the identifier column.
//!
//! For the times a migration cannot rely on any model definition, e.g. the
//! field it needs to read has already been removed from the application.

use crate::error::{DbResult, DbResultExt};
use crate::schema::{find_column, SchemaIntrospector, TableRef};
use crate::sql::{self, Projection};
use crate::value::RowValue;
use duckdb::types::Value;
use duckdb::Connection;
use std::collections::BTreeMap;

/// Get/set field values by row identifier.
pub struct RowAccessor<'c> {
    conn: &'c Connection,
    id_column: String,
}

impl<'c> RowAccessor<'c> {
    pub fn new(conn: &'c Connection, id_column: impl Into<String>) -> Self {
        Self {
            conn,
            id_column: id_column.into(),
        }
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    fn schema(&self) -> SchemaIntrospector<'c> {
        SchemaIntrospector::new(self.conn)
    }

    /// Read a single field. `None` when the table, column, or row is absent;
    /// a present NULL reads as `Some(RowValue::Null)`.
    pub fn get_row_value(
        &self,
        table: &str,
        column: &str,
        id: impl Into<RowValue>,
    ) -> DbResult<Option<RowValue>> {
        let mut values = self.get_row_values(table, &[column], id)?;
        Ok(values.pop_first().map(|(_, v)| v))
    }

    /// Read several fields of one row.
    ///
    /// Empty unless the table carries every requested column and the row
    /// exists. Keys use the spelling the caller asked for.
    pub fn get_row_values(
        &self,
        table: &str,
        columns: &[&str],
        id: impl Into<RowValue>,
    ) -> DbResult<BTreeMap<String, RowValue>> {
        let schema = self.schema();
        let Some(table_ref) = schema.resolve_table(table)? else {
            return Ok(BTreeMap::new());
        };
        let existing = schema.columns_of(&table_ref)?;

        let mut projections = Vec::with_capacity(columns.len());
        for column in columns {
            let Some(actual) = find_column(&existing, column) else {
                return Ok(BTreeMap::new());
            };
            projections.push(Projection {
                name: actual,
                data_type: &existing[actual],
            });
        }
        if projections.is_empty() {
            return Ok(BTreeMap::new());
        }

        let stmt_sql = sql::select_by_id(&table_ref.quoted(), &projections, &self.id_column);
        log::debug!("{stmt_sql}");
        let mut stmt = self.conn.prepare(&stmt_sql).with_sql(&stmt_sql)?;
        let id = id.into();
        let mut rows = stmt.query(duckdb::params![id]).with_sql(&stmt_sql)?;

        let mut values = BTreeMap::new();
        if let Some(row) = rows.next()? {
            for (i, column) in columns.iter().enumerate() {
                let value: Value = row.get(i)?;
                values.insert(column.to_string(), RowValue::from(value));
            }
        }
        Ok(values)
    }

    /// Whether a row with identifier `id` exists. False for a missing table.
    pub fn row_exists(&self, table: &str, id: impl Into<RowValue>) -> DbResult<bool> {
        match self.schema().resolve_table(table)? {
            Some(table_ref) => self.row_exists_in(&table_ref, &id.into()),
            None => Ok(false),
        }
    }

    fn row_exists_in(&self, table: &TableRef, id: &RowValue) -> DbResult<bool> {
        let stmt_sql = sql::count_by_id(&table.quoted(), &self.id_column);
        let count: i64 = self
            .conn
            .query_row(&stmt_sql, duckdb::params![id], |row| row.get(0))
            .with_sql(&stmt_sql)?;
        Ok(count > 0)
    }

    /// Write field values on the row identified by `id`.
    ///
    /// Returns `false` without writing when any column is missing. With
    /// `allow_insert`, a missing row is inserted; otherwise the row is
    /// updated in place. Returns `true` iff a row was written.
    pub fn set_row_values(
        &self,
        table: &str,
        values: &BTreeMap<String, RowValue>,
        id: impl Into<RowValue>,
        allow_insert: bool,
    ) -> DbResult<bool> {
        if values.is_empty() {
            return Ok(false);
        }
        let schema = self.schema();
        let Some(table_ref) = schema.resolve_table(table)? else {
            return Ok(false);
        };
        let existing = schema.columns_of(&table_ref)?;
        if find_column(&existing, &self.id_column).is_none() {
            return Ok(false);
        }

        let mut assignments: Vec<(&str, &RowValue)> = Vec::with_capacity(values.len());
        for (column, value) in values {
            let Some(actual) = find_column(&existing, column) else {
                log::debug!("set_row_values: {table_ref} has no column {column}");
                return Ok(false);
            };
            assignments.push((actual, value));
        }

        self.write_row(&table_ref, &assignments, &id.into(), allow_insert)
    }

    /// Insert-or-update on a resolved table with already-validated columns.
    pub(crate) fn write_row(
        &self,
        table: &TableRef,
        assignments: &[(&str, &RowValue)],
        id: &RowValue,
        allow_insert: bool,
    ) -> DbResult<bool> {
        if allow_insert && !self.row_exists_in(table, id)? {
            let mut columns: Vec<&str> = Vec::with_capacity(assignments.len() + 1);
            let mut params: Vec<&RowValue> = Vec::with_capacity(assignments.len() + 1);
            if !assignments
                .iter()
                .any(|(c, _)| c.eq_ignore_ascii_case(&self.id_column))
            {
                columns.push(&self.id_column);
                params.push(id);
            }
            for (column, value) in assignments {
                columns.push(column);
                params.push(value);
            }
            let stmt_sql = sql::insert(&table.quoted(), &columns);
            log::debug!("{stmt_sql}");
            let inserted = self
                .conn
                .execute(&stmt_sql, duckdb::params_from_iter(params))
                .with_sql(&stmt_sql)?;
            return Ok(inserted > 0);
        }

        let columns: Vec<&str> = assignments.iter().map(|(c, _)| *c).collect();
        let mut params: Vec<&RowValue> = assignments.iter().map(|(_, v)| *v).collect();
        params.push(id);
        let stmt_sql = sql::update_by_id(&table.quoted(), &columns, &self.id_column);
        log::debug!("{stmt_sql}");
        let updated = self
            .conn
            .execute(&stmt_sql, duckdb::params_from_iter(params))
            .with_sql(&stmt_sql)?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
#[path = "rows_test.rs"]
mod tests;
