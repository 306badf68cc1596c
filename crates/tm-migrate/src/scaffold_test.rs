use super::*;
use crate::migration::Registration;
use chrono::TimeZone;

fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
}

fn later() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 10).unwrap()
}

fn noop() -> Box<dyn crate::Migration> {
    unreachable!("scaffold never instantiates")
}

#[test]
fn make_writes_timestamped_file() {
    let dir = tempfile::tempdir().unwrap();
    let registry = MigrationRegistry::default();
    let generator = ScaffoldGenerator::new(dir.path(), &registry);

    let path = generator.make_at("Add Column To Table", stamp()).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "2024_05_06_070809_add_column_to_table.rs"
    );

    let source = std::fs::read_to_string(&path).unwrap();
    assert!(source.contains("pub struct MigrationAddColumnToTable;"));
    assert!(source.contains("register_migration!(MigrationAddColumnToTable)"));
    assert!(!source.contains(TEMPLATE_CLASS_NAME));
}

#[test]
fn make_twice_collides() {
    let dir = tempfile::tempdir().unwrap();
    let registry = MigrationRegistry::default();
    let generator = ScaffoldGenerator::new(dir.path(), &registry);

    generator.make_at("Add Column To Table", stamp()).unwrap();
    let err = generator
        .make_at("add column to table", later())
        .unwrap_err();
    assert!(matches!(err, MigrateError::NameCollisionError(ref msg)
        if msg.contains("MigrationAddColumnToTable")));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn make_collides_with_registered_type() {
    let dir = tempfile::tempdir().unwrap();
    let registry = MigrationRegistry::new(vec![Registration::new(
        "elsewhere/2020_01_01_000000_seed_pages.rs",
        "MigrationSeedPages",
        noop,
    )]);
    let generator = ScaffoldGenerator::new(dir.path(), &registry);
    let err = generator.make_at("seed-pages", stamp()).unwrap_err();
    assert!(matches!(err, MigrateError::NameCollisionError(ref msg) if msg.contains("registered")));
}

#[test]
fn make_collides_with_declared_type() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("mod.rs"),
        "pub struct MigrationSeedPagesV2;\npub enum MigrationSeedPages { A }\n",
    )
    .unwrap();
    let registry = MigrationRegistry::default();
    let generator = ScaffoldGenerator::new(dir.path(), &registry);

    let err = generator.make_at("Seed Pages", stamp()).unwrap_err();
    assert!(matches!(err, MigrateError::NameCollisionError(ref msg) if msg.contains("mod.rs")));
}

#[test]
fn make_collides_with_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("2024_05_06_070809_seed_pages.rs"), "// empty\n").unwrap();
    let registry = MigrationRegistry::default();
    let generator = ScaffoldGenerator::new(dir.path(), &registry);

    let err = generator.make_at("seed pages", stamp()).unwrap_err();
    assert!(matches!(err, MigrateError::NameCollisionError(ref msg) if msg.contains("file")));
}

#[test]
fn make_rejects_empty_name() {
    let dir = tempfile::tempdir().unwrap();
    let registry = MigrationRegistry::default();
    let generator = ScaffoldGenerator::new(dir.path(), &registry);
    let err = generator.make_at(" -- ", stamp()).unwrap_err();
    assert!(matches!(err, MigrateError::ValidationError(_)));
}

#[test]
fn make_requires_directory() {
    let dir = tempfile::tempdir().unwrap();
    let registry = MigrationRegistry::default();
    let generator = ScaffoldGenerator::new(dir.path().join("missing"), &registry);
    let err = generator.make_at("seed pages", stamp()).unwrap_err();
    assert!(matches!(err, MigrateError::ConfigurationError(_)));
}

#[test]
fn permission_denied_on_create_is_configuration_error() {
    let path = Path::new("/srv/app/migrations/2024_05_06_070809_seed_pages.rs");
    let err = create_error(
        path,
        "MigrationSeedPages",
        "seed_pages",
        std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    );
    assert!(
        matches!(err, MigrateError::ConfigurationError(ref msg) if msg.contains("/srv/app/migrations")),
        "{err}"
    );
}

#[test]
fn existing_file_on_create_is_collision() {
    let path = Path::new("/srv/app/migrations/2024_05_06_070809_seed_pages.rs");
    let err = create_error(
        path,
        "MigrationSeedPages",
        "seed_pages",
        std::io::Error::from(std::io::ErrorKind::AlreadyExists),
    );
    assert!(matches!(err, MigrateError::NameCollisionError(_)));

    let err = create_error(
        path,
        "MigrationSeedPages",
        "seed_pages",
        std::io::Error::other("disk full"),
    );
    assert!(matches!(err, MigrateError::Io { .. }));
}

#[test]
fn declares_type_matches_whole_identifiers() {
    let source = "pub struct MigrationFooBar;\ntype MigrationAlias = u8;\nlet MigrationFoo = 1;";
    assert!(declares_type(source, "MigrationFooBar"));
    assert!(declares_type(source, "MigrationAlias"));
    assert!(!declares_type(source, "MigrationFoo"));
}

#[test]
fn registration_snippet_uses_name_suffix() {
    let snippet =
        registration_snippet(Path::new("src/migrations/2024_05_06_070809_seed_pages.rs")).unwrap();
    assert_eq!(
        snippet,
        "#[path = \"2024_05_06_070809_seed_pages.rs\"]\nmod seed_pages;\n\nseed_pages::registration(),"
    );

    let digit_led =
        registration_snippet(Path::new("2024_05_06_070809_2fa_rollout.rs")).unwrap();
    assert!(digit_led.contains("mod m_2fa_rollout;"));
}
