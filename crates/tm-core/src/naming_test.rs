use super::*;

#[test]
fn normalize_spaces_and_case() {
    assert_eq!(
        normalize_migration_name("Add Column To Table").as_deref(),
        Some("add_column_to_table")
    );
}

#[test]
fn normalize_collapses_symbol_runs() {
    assert_eq!(
        normalize_migration_name("add -- status!! column").as_deref(),
        Some("add_status_column")
    );
}

#[test]
fn normalize_trims_edges() {
    assert_eq!(
        normalize_migration_name("__Create Members__").as_deref(),
        Some("create_members")
    );
    assert_eq!(
        normalize_migration_name("  drop legacy  ").as_deref(),
        Some("drop_legacy")
    );
}

#[test]
fn normalize_keeps_existing_underscores_once() {
    assert_eq!(
        normalize_migration_name("adding_column__to_table").as_deref(),
        Some("adding_column_to_table")
    );
}

#[test]
fn normalize_drops_non_ascii() {
    assert_eq!(
        normalize_migration_name("créer table").as_deref(),
        Some("cr_er_table")
    );
}

#[test]
fn normalize_rejects_empty_result() {
    assert_eq!(normalize_migration_name(""), None);
    assert_eq!(normalize_migration_name("___"), None);
    assert_eq!(normalize_migration_name("!@# $%"), None);
}

#[test]
fn normalized_output_charset() {
    for raw in ["Add Column To Table", "x-Y.z", "42 answers", "a__b"] {
        let n = normalize_migration_name(raw).unwrap();
        assert!(n
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        assert!(!n.starts_with('_') && !n.ends_with('_'));
    }
}

#[test]
fn pascal_case_conversion() {
    assert_eq!(to_pascal_case("add_column_to_table"), "AddColumnToTable");
    assert_eq!(to_pascal_case("v2_rollout"), "V2Rollout");
    assert_eq!(to_pascal_case("single"), "Single");
}

#[test]
fn type_identifier_is_prefixed() {
    assert_eq!(
        type_identifier("add_column_to_table"),
        "MigrationAddColumnToTable"
    );
    assert_eq!(type_identifier("42_answers"), "Migration42Answers");
}
