use super::*;

fn count(store: &Store, sql: &str) -> i64 {
    store
        .conn()
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .unwrap()
}

#[test]
fn open_memory_succeeds() {
    let store = Store::new(":memory:").unwrap();
    assert_eq!(count(&store, "SELECT 1"), 1);
}

#[test]
fn open_file_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    assert!(!path.exists());
    let _store = Store::new(path.to_str().unwrap()).unwrap();
    assert!(path.exists());
}

#[test]
fn transaction_commits_on_ok() {
    let store = Store::open_memory().unwrap();
    store
        .transaction(|conn| -> DbResult<()> {
            conn.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1);")?;
            Ok(())
        })
        .unwrap();
    assert_eq!(count(&store, "SELECT COUNT(*) FROM t"), 1);
}

#[test]
fn transaction_rolls_back_data_and_ddl_on_err() {
    let store = Store::open_memory().unwrap();
    store
        .conn()
        .execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1);")
        .unwrap();

    let result = store.transaction(|conn| -> DbResult<()> {
        conn.execute_batch(
            "INSERT INTO t VALUES (2); ALTER TABLE t ADD COLUMN extra VARCHAR; CREATE TABLE u (x INTEGER);",
        )?;
        Err(DbError::ExecutionError("boom".to_string()))
    });
    assert!(result.is_err());

    assert_eq!(count(&store, "SELECT COUNT(*) FROM t"), 1);
    assert_eq!(
        count(
            &store,
            "SELECT COUNT(*) FROM information_schema.columns WHERE table_name = 't'"
        ),
        1
    );
    assert_eq!(
        count(
            &store,
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'u'"
        ),
        0
    );
}

#[test]
fn transaction_is_reusable_after_rollback() {
    let store = Store::open_memory().unwrap();
    let _ = store.transaction(|_| -> DbResult<()> {
        Err(DbError::ExecutionError("first".to_string()))
    });
    let value = store
        .transaction(|conn| -> DbResult<i64> {
            Ok(conn.query_row("SELECT 42", [], |row| row.get(0))?)
        })
        .unwrap();
    assert_eq!(value, 42);
}
