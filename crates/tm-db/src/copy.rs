//! Table-to-table row copies for data-moving migrations.

use crate::error::{DbError, DbResult, DbResultExt};
use crate::rows::RowAccessor;
use crate::schema::{find_column, SchemaIntrospector, TableRef};
use crate::sql::{self, Projection};
use crate::value::RowValue;
use duckdb::types::Value;
use duckdb::Connection;
use std::collections::BTreeMap;

/// Stage suffixes of a versioned entity: draft, live, history.
pub const DEFAULT_STAGE_SUFFIXES: [&str; 3] = ["", "_Live", "_Versions"];

/// What [`TableCopier::copy_table`] moves and how.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Destination fields copied from the same-named source field. `None`
    /// copies every destination column the source also has.
    pub fields: Option<Vec<String>>,
    /// Destination field to source field, for columns that were renamed.
    pub renames: BTreeMap<String, String>,
    /// Carry the identifier column across and upsert by it.
    pub include_id: bool,
    /// Delete every destination row before copying.
    pub purge_destination: bool,
    /// Equality predicates on the source. A `Null` value matches `IS NULL`.
    pub filter: Vec<(String, RowValue)>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            fields: None,
            renames: BTreeMap::new(),
            include_id: true,
            purge_destination: false,
            filter: Vec::new(),
        }
    }
}

impl CopyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn rename(mut self, destination: impl Into<String>, source: impl Into<String>) -> Self {
        self.renames.insert(destination.into(), source.into());
        self
    }

    pub fn include_id(mut self, include: bool) -> Self {
        self.include_id = include;
        self
    }

    pub fn purge_destination(mut self, purge: bool) -> Self {
        self.purge_destination = purge;
        self
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<RowValue>) -> Self {
        self.filter.push((column.into(), value.into()));
        self
    }
}

/// Copies rows between tables on one connection.
pub struct TableCopier<'c> {
    conn: &'c Connection,
    id_column: String,
    suffixes: Vec<String>,
}

/// Resolved destination-to-source column pairs, catalog spelling.
struct ColumnPlan<'a> {
    pairs: Vec<(&'a str, &'a str)>,
    source_types: &'a BTreeMap<String, String>,
}

impl<'c> TableCopier<'c> {
    pub fn new(conn: &'c Connection, id_column: impl Into<String>) -> Self {
        Self {
            conn,
            id_column: id_column.into(),
            suffixes: DEFAULT_STAGE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the stage suffixes used by [`copy_versioned_table`](Self::copy_versioned_table).
    pub fn with_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.suffixes = suffixes;
        self
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Copy rows of `from` into `to`. Returns the number of rows written.
    ///
    /// Both tables must exist. Every mapped field is checked against both
    /// tables before anything is purged or written.
    pub fn copy_table(&self, from: &str, to: &str, options: &CopyOptions) -> DbResult<usize> {
        let schema = SchemaIntrospector::new(self.conn);
        let source = schema.require_table(from)?;
        let destination = schema.require_table(to)?;
        let source_columns = schema.columns_of(&source)?;
        let destination_columns = schema.columns_of(&destination)?;

        let plan = self.plan_columns(
            &source,
            &source_columns,
            &destination,
            &destination_columns,
            options,
        )?;
        let filters = resolve_filters(&source, &source_columns, &options.filter)?;

        if options.purge_destination {
            let purge = sql::delete_all(&destination.quoted());
            log::debug!("{purge}");
            self.conn.execute(&purge, []).with_sql(&purge)?;
        }

        let rows = self.read_source(&source, &plan, &filters)?;
        let accessor = RowAccessor::new(self.conn, self.id_column.as_str());
        let id_position = options
            .include_id
            .then(|| {
                plan.pairs
                    .iter()
                    .position(|(dest, _)| dest.eq_ignore_ascii_case(&self.id_column))
            })
            .flatten();
        let destination_names: Vec<&str> = plan.pairs.iter().map(|(dest, _)| *dest).collect();

        let mut copied = 0;
        for row in &rows {
            let written = match id_position {
                Some(pos) => {
                    let assignments: Vec<(&str, &RowValue)> = destination_names
                        .iter()
                        .copied()
                        .zip(row.iter())
                        .collect();
                    accessor.write_row(&destination, &assignments, &row[pos], true)?
                }
                None => {
                    let stmt_sql = sql::insert(&destination.quoted(), &destination_names);
                    log::debug!("{stmt_sql}");
                    self.conn
                        .execute(&stmt_sql, duckdb::params_from_iter(row.iter()))
                        .with_sql(&stmt_sql)?
                        > 0
                }
            };
            if written {
                copied += 1;
            }
        }

        log::debug!("Copied {copied} row(s) from {source} to {destination}");
        Ok(copied)
    }

    /// Copy every stage of a versioned entity, e.g. `Page`, `Page_Live`,
    /// `Page_Versions`. Stages whose source table is missing are skipped.
    pub fn copy_versioned_table(
        &self,
        from_entity: &str,
        to_entity: &str,
        options: &CopyOptions,
    ) -> DbResult<usize> {
        let schema = SchemaIntrospector::new(self.conn);
        let mut total = 0;
        for suffix in &self.suffixes {
            let from = format!("{from_entity}{suffix}");
            let to = format!("{to_entity}{suffix}");
            if !schema.table_exists(&from)? {
                log::warn!("Skipping stage {from}: table does not exist");
                continue;
            }
            total += self.copy_table(&from, &to, options)?;
        }
        Ok(total)
    }

    fn plan_columns<'a>(
        &self,
        source: &TableRef,
        source_columns: &'a BTreeMap<String, String>,
        destination: &TableRef,
        destination_columns: &'a BTreeMap<String, String>,
        options: &CopyOptions,
    ) -> DbResult<ColumnPlan<'a>> {
        let mut wanted: Vec<(String, String)> = match &options.fields {
            Some(fields) => fields.iter().map(|f| (f.clone(), f.clone())).collect(),
            None => destination_columns
                .keys()
                .filter(|c| find_column(source_columns, c).is_some())
                .map(|c| (c.clone(), c.clone()))
                .collect(),
        };
        for (dest, src) in &options.renames {
            wanted.retain(|(d, _)| !d.eq_ignore_ascii_case(dest));
            wanted.push((dest.clone(), src.clone()));
        }
        let is_id = |name: &str| name.eq_ignore_ascii_case(&self.id_column);
        if options.include_id {
            if !wanted.iter().any(|(d, _)| is_id(d.as_str())) {
                wanted.insert(0, (self.id_column.clone(), self.id_column.clone()));
            }
        } else {
            wanted.retain(|(d, _)| !is_id(d.as_str()));
        }

        let mut missing = Vec::new();
        let mut pairs = Vec::with_capacity(wanted.len());
        for (dest, src) in &wanted {
            let dest_actual = find_column(destination_columns, dest);
            let src_actual = find_column(source_columns, src);
            if dest_actual.is_none() {
                missing.push(format!("{destination}.{dest}"));
            }
            if src_actual.is_none() {
                missing.push(format!("{source}.{src}"));
            }
            if let (Some(d), Some(s)) = (dest_actual, src_actual) {
                pairs.push((d, s));
            }
        }
        if !missing.is_empty() {
            return Err(DbError::ValidationError(format!(
                "cannot copy {source} to {destination}: missing field(s) {}",
                missing.join(", ")
            )));
        }
        if pairs.is_empty() {
            return Err(DbError::ValidationError(format!(
                "cannot copy {source} to {destination}: no fields in common"
            )));
        }
        Ok(ColumnPlan {
            pairs,
            source_types: source_columns,
        })
    }

    fn read_source(
        &self,
        source: &TableRef,
        plan: &ColumnPlan<'_>,
        filters: &[(&str, &RowValue)],
    ) -> DbResult<Vec<Vec<RowValue>>> {
        let projections: Vec<Projection<'_>> = plan
            .pairs
            .iter()
            .map(|(_, src)| Projection {
                name: *src,
                data_type: &plan.source_types[*src],
            })
            .collect();
        let predicates: Vec<(&str, bool)> = filters
            .iter()
            .map(|(column, value)| (*column, value.is_null()))
            .collect();
        let order_by = find_column(plan.source_types, &self.id_column);
        let stmt_sql = sql::select_rows(&source.quoted(), &projections, &predicates, order_by);
        log::debug!("{stmt_sql}");

        let params = filters
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(_, value)| *value);
        let mut stmt = self.conn.prepare(&stmt_sql).with_sql(&stmt_sql)?;
        let mut rows = stmt
            .query(duckdb::params_from_iter(params))
            .with_sql(&stmt_sql)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(projections.len());
            for i in 0..projections.len() {
                let value: Value = row.get(i)?;
                values.push(RowValue::from(value));
            }
            out.push(values);
        }
        Ok(out)
    }
}

fn resolve_filters<'a>(
    source: &TableRef,
    source_columns: &'a BTreeMap<String, String>,
    filter: &'a [(String, RowValue)],
) -> DbResult<Vec<(&'a str, &'a RowValue)>> {
    filter
        .iter()
        .map(|(column, value)| {
            find_column(source_columns, column)
                .map(|actual| (actual, value))
                .ok_or_else(|| {
                    DbError::ValidationError(format!(
                        "cannot filter {source}: missing field {column}"
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
#[path = "copy_test.rs"]
mod tests;
