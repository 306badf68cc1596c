//! Registered migrations for this project.
//!
//! Each file registers itself with `register_migration!`, which records the
//! file name as the migration's base name. `tm make:<name>` prints the lines
//! to add here for a new file.

use tm_migrate::MigrationRegistry;

#[path = "2024_01_15_093000_create_member_table.rs"]
mod create_member_table;

#[path = "2024_02_03_141500_add_display_name_to_member.rs"]
mod add_display_name_to_member;

#[path = "2024_03_10_080000_archive_legacy_pages.rs"]
mod archive_legacy_pages;

/// Every migration the `tm` binary knows about.
pub(crate) fn registry() -> MigrationRegistry {
    MigrationRegistry::new(vec![
        create_member_table::registration(),
        add_display_name_to_member::registration(),
        archive_legacy_pages::registration(),
    ])
}
