use tm_migrate::{
    register_migration, CopyOptions, MigrateResult, Migration, MigrationContext, Registration,
};

/// Moved legacy pages into the archive tables. The legacy tables were
/// dropped long ago, so the body is kept for history only.
#[derive(Default)]
pub struct MigrationArchiveLegacyPages;

impl Migration for MigrationArchiveLegacyPages {
    fn up(&self, ctx: &MigrationContext<'_>) -> MigrateResult<()> {
        let options = CopyOptions::new()
            .rename("Heading", "Title")
            .purge_destination(true);
        ctx.copy_versioned_table("LegacyPage", "ArchivedPage", &options)?;
        Ok(())
    }

    fn down(&self, ctx: &MigrationContext<'_>) -> MigrateResult<()> {
        ctx.copy_versioned_table("ArchivedPage", "LegacyPage", &CopyOptions::new())?;
        Ok(())
    }

    fn is_obsolete(&self) -> bool {
        true
    }
}

pub fn registration() -> Registration {
    register_migration!(MigrationArchiveLegacyPages)
}
