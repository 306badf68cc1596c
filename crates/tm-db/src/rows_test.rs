use super::*;

fn conn_with_members() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE Member (ID INTEGER, Email VARCHAR, Score INTEGER, Joined TIMESTAMP);
         INSERT INTO Member VALUES (1, 'a@example.com', 10, TIMESTAMP '2020-01-02 03:04:05');
         INSERT INTO Member VALUES (2, NULL, NULL, NULL);",
    )
    .unwrap();
    conn
}

fn values(pairs: &[(&str, RowValue)]) -> BTreeMap<String, RowValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn get_row_value_reads_field() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    assert_eq!(
        rows.get_row_value("Member", "Email", 1).unwrap(),
        Some(RowValue::from("a@example.com"))
    );
    assert_eq!(
        rows.get_row_value("member", "score", 1).unwrap(),
        Some(RowValue::Integer(10))
    );
}

#[test]
fn get_row_value_distinguishes_null_from_absent() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    assert_eq!(
        rows.get_row_value("Member", "Email", 2).unwrap(),
        Some(RowValue::Null)
    );
    assert_eq!(rows.get_row_value("Member", "Email", 99).unwrap(), None);
    assert_eq!(rows.get_row_value("Member", "Phone", 1).unwrap(), None);
    assert_eq!(rows.get_row_value("Ghost", "Email", 1).unwrap(), None);
}

#[test]
fn get_row_value_renders_timestamp_as_text() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    let joined = rows.get_row_value("Member", "Joined", 1).unwrap().unwrap();
    assert_eq!(joined.as_str(), Some("2020-01-02 03:04:05"));
}

#[test]
fn get_row_values_requires_every_column() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");

    let got = rows.get_row_values("Member", &["Email", "Score"], 1).unwrap();
    assert_eq!(got.len(), 2);
    assert_eq!(got["Email"], RowValue::from("a@example.com"));
    assert_eq!(got["Score"], RowValue::Integer(10));

    assert!(rows
        .get_row_values("Member", &["Email", "Phone"], 1)
        .unwrap()
        .is_empty());
}

#[test]
fn row_exists_checks() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    assert!(rows.row_exists("Member", 1).unwrap());
    assert!(!rows.row_exists("Member", 3).unwrap());
    assert!(!rows.row_exists("Ghost", 1).unwrap());
}

#[test]
fn set_row_values_updates_existing_row() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    let written = rows
        .set_row_values(
            "Member",
            &values(&[("Email", RowValue::from("new@example.com")), ("Score", 5.into())]),
            2,
            false,
        )
        .unwrap();
    assert!(written);
    assert_eq!(
        rows.get_row_value("Member", "Email", 2).unwrap(),
        Some(RowValue::from("new@example.com"))
    );
    assert_eq!(
        rows.get_row_value("Member", "Score", 2).unwrap(),
        Some(RowValue::Integer(5))
    );
}

#[test]
fn set_row_values_without_insert_misses_absent_row() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    let written = rows
        .set_row_values("Member", &values(&[("Score", 1.into())]), 7, false)
        .unwrap();
    assert!(!written);
    assert!(!rows.row_exists("Member", 7).unwrap());
}

#[test]
fn set_row_values_inserts_when_allowed() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    let written = rows
        .set_row_values(
            "Member",
            &values(&[("Email", RowValue::from("c@example.com"))]),
            3,
            true,
        )
        .unwrap();
    assert!(written);
    assert_eq!(
        rows.get_row_value("Member", "Email", 3).unwrap(),
        Some(RowValue::from("c@example.com"))
    );
    assert_eq!(
        rows.get_row_value("Member", "Score", 3).unwrap(),
        Some(RowValue::Null)
    );
}

#[test]
fn set_row_values_insert_does_not_duplicate_id_column() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    let written = rows
        .set_row_values(
            "Member",
            &values(&[("id", 4.into()), ("Score", 40.into())]),
            4,
            true,
        )
        .unwrap();
    assert!(written);
    assert_eq!(
        rows.get_row_value("Member", "Score", 4).unwrap(),
        Some(RowValue::Integer(40))
    );
}

#[test]
fn set_row_values_refuses_unknown_column() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    let written = rows
        .set_row_values(
            "Member",
            &values(&[("Email", RowValue::from("x")), ("Phone", RowValue::from("y"))]),
            1,
            true,
        )
        .unwrap();
    assert!(!written);
    assert_eq!(
        rows.get_row_value("Member", "Email", 1).unwrap(),
        Some(RowValue::from("a@example.com"))
    );
}

#[test]
fn set_row_values_binds_hostile_text_literally() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    let hostile = "x'); DROP TABLE Member; --";
    rows.set_row_values("Member", &values(&[("Email", hostile.into())]), 1, false)
        .unwrap();
    assert_eq!(
        rows.get_row_value("Member", "Email", 1).unwrap(),
        Some(RowValue::from(hostile))
    );
}

#[test]
fn set_row_values_writes_timestamp_from_text() {
    let conn = conn_with_members();
    let rows = RowAccessor::new(&conn, "ID");
    rows.set_row_values(
        "Member",
        &values(&[("Joined", RowValue::from("2021-06-07 08:09:10"))]),
        2,
        false,
    )
    .unwrap();
    let joined = rows.get_row_value("Member", "Joined", 2).unwrap().unwrap();
    assert_eq!(joined.as_str(), Some("2021-06-07 08:09:10"));
}
