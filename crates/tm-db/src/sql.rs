//! Statement builders for the helper layer.
//!
//! The only place dynamic SQL text is assembled. Identifiers are quoted via
//! [`tm_core::sql_utils`]; values are left as `?` placeholders for binding.

use crate::value::is_native_type;
use tm_core::sql_utils::quote_ident;

/// A column projected by a SELECT, with its catalog type.
pub(crate) struct Projection<'a> {
    pub name: &'a str,
    pub data_type: &'a str,
}

fn select_expr(p: &Projection<'_>) -> String {
    let ident = quote_ident(p.name);
    if is_native_type(p.data_type) {
        ident
    } else {
        format!("CAST({ident} AS VARCHAR)")
    }
}

pub(crate) fn add_column(table: &str, column: &str, definition: &str) -> String {
    format!(
        "ALTER TABLE {table} ADD COLUMN {} {}",
        quote_ident(column),
        definition.trim()
    )
}

pub(crate) fn drop_column(table: &str, column: &str) -> String {
    format!("ALTER TABLE {table} DROP COLUMN {}", quote_ident(column))
}

/// `SELECT <cols> FROM <table> WHERE <id> = ? LIMIT 1`
pub(crate) fn select_by_id(table: &str, columns: &[Projection<'_>], id_column: &str) -> String {
    let cols: Vec<String> = columns.iter().map(select_expr).collect();
    format!(
        "SELECT {} FROM {table} WHERE {} = ? LIMIT 1",
        cols.join(", "),
        quote_ident(id_column)
    )
}

/// `SELECT COUNT(*) FROM <table> WHERE <id> = ?`
pub(crate) fn count_by_id(table: &str, id_column: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM {table} WHERE {} = ?",
        quote_ident(id_column)
    )
}

/// `SELECT <cols> FROM <table> [WHERE a = ? AND b IS NULL ...] [ORDER BY <order>]`
///
/// `filters` pairs a column with whether the compared value is NULL; NULL
/// comparisons are emitted as `IS NULL` and take no placeholder.
pub(crate) fn select_rows(
    table: &str,
    columns: &[Projection<'_>],
    filters: &[(&str, bool)],
    order_by: Option<&str>,
) -> String {
    let cols: Vec<String> = columns.iter().map(select_expr).collect();
    let mut sql = format!("SELECT {} FROM {table}", cols.join(", "));
    if !filters.is_empty() {
        let preds: Vec<String> = filters
            .iter()
            .map(|(col, is_null)| {
                if *is_null {
                    format!("{} IS NULL", quote_ident(col))
                } else {
                    format!("{} = ?", quote_ident(col))
                }
            })
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&preds.join(" AND "));
    }
    if let Some(order) = order_by {
        sql.push_str(" ORDER BY ");
        sql.push_str(&quote_ident(order));
    }
    sql
}

/// `UPDATE <table> SET a = ?, b = ? WHERE <id> = ?`
pub(crate) fn update_by_id(table: &str, columns: &[&str], id_column: &str) -> String {
    let sets: Vec<String> = columns
        .iter()
        .map(|c| format!("{} = ?", quote_ident(c)))
        .collect();
    format!(
        "UPDATE {table} SET {} WHERE {} = ?",
        sets.join(", "),
        quote_ident(id_column)
    )
}

/// `INSERT INTO <table> (a, b) VALUES (?, ?)`
pub(crate) fn insert(table: &str, columns: &[&str]) -> String {
    let cols: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    let placeholders = vec!["?"; columns.len()];
    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        cols.join(", "),
        placeholders.join(", ")
    )
}

pub(crate) fn delete_all(table: &str) -> String {
    format!("DELETE FROM {table}")
}
