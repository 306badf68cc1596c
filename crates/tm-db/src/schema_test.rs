//! Tests for catalog lookups and idempotent column DDL.

use super::*;

fn conn_with_member() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE Member (ID INTEGER, Email VARCHAR, Created TIMESTAMP);
         CREATE SCHEMA archive;
         CREATE TABLE archive.Member (ID INTEGER);",
    )
    .unwrap();
    conn
}

fn cols(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ── Lookups ────────────────────────────────────────────────────────────

#[test]
fn table_exists_is_case_insensitive() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    assert!(schema.table_exists("Member").unwrap());
    assert!(schema.table_exists("member").unwrap());
    assert!(schema.table_exists("MEMBER").unwrap());
    assert!(!schema.table_exists("Members").unwrap());
}

#[test]
fn resolve_returns_catalog_spelling() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    let table = schema.resolve_table("member").unwrap().unwrap();
    assert_eq!(table.schema, "main");
    assert_eq!(table.name, "Member");
    assert_eq!(table.quoted(), r#""main"."Member""#);
    assert_eq!(table.to_string(), "Member");
}

#[test]
fn resolve_schema_qualified() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    let table = schema.resolve_table("ARCHIVE.member").unwrap().unwrap();
    assert_eq!(table.schema, "archive");
    assert_eq!(table.to_string(), "archive.Member");
    assert_eq!(schema.table_columns("archive.Member").unwrap().len(), 1);
}

#[test]
fn require_table_reports_missing() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    let err = schema.require_table("Nope").unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(name) if name == "Nope"));
}

#[test]
fn table_columns_lists_types() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    let columns = schema.table_columns("Member").unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns["ID"], "INTEGER");
    assert_eq!(columns["Email"], "VARCHAR");
    assert_eq!(columns["Created"], "TIMESTAMP");
}

#[test]
fn table_columns_empty_for_missing_table() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    assert!(schema.table_columns("Ghost").unwrap().is_empty());
}

#[test]
fn column_exists_checks() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    assert!(schema.column_exists("member", "Email").unwrap());
    assert!(schema.column_exists("Member", "email").unwrap());
    assert!(!schema.column_exists("Member", "Phone").unwrap());
    assert!(!schema.column_exists("Ghost", "Email").unwrap());
}

#[test]
fn columns_exist_requires_all() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    assert!(schema.columns_exist("Member", &["ID", "Email"]).unwrap());
    assert!(!schema.columns_exist("Member", &["ID", "Phone"]).unwrap());
    assert!(schema.columns_exist("Member", &[]).unwrap());
    assert!(!schema.columns_exist("Ghost", &[]).unwrap());
}

// ── DDL ────────────────────────────────────────────────────────────────

#[test]
fn add_columns_is_idempotent() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    let wanted = cols(&[
        ("Nickname", "VARCHAR"),
        ("Score", "INTEGER DEFAULT 0"),
        ("Email", "VARCHAR"),
    ]);

    let first = schema.add_columns("member", &wanted).unwrap();
    assert_eq!(
        first.into_iter().collect::<Vec<_>>(),
        vec!["Nickname".to_string(), "Score".to_string()]
    );
    assert!(schema.column_exists("Member", "Score").unwrap());

    let second = schema.add_columns("member", &wanted).unwrap();
    assert!(second.is_empty());
}

#[test]
fn add_columns_requires_table() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    let err = schema
        .add_columns("Ghost", &cols(&[("X", "INTEGER")]))
        .unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)));
}

#[test]
fn add_columns_rejects_injected_definition() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    let err = schema
        .add_columns("Member", &cols(&[("X", "INTEGER; DROP TABLE Member")]))
        .unwrap_err();
    assert!(matches!(err, DbError::ValidationError(_)));
    assert!(schema.table_exists("Member").unwrap());
    assert!(!schema.column_exists("Member", "X").unwrap());
}

#[test]
fn drop_columns_is_idempotent() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);

    let first = schema.drop_columns("Member", &["email", "Phone"]).unwrap();
    assert_eq!(first.into_iter().collect::<Vec<_>>(), vec!["Email".to_string()]);
    assert!(!schema.column_exists("Member", "Email").unwrap());

    let second = schema.drop_columns("Member", &["email", "Phone"]).unwrap();
    assert!(second.is_empty());
}

#[test]
fn drop_columns_on_missing_table_is_noop() {
    let conn = conn_with_member();
    let schema = SchemaIntrospector::new(&conn);
    assert!(schema.drop_columns("Ghost", &["ID"]).unwrap().is_empty());
}
