use tm_migrate::{register_migration, MigrateResult, Migration, MigrationContext, Registration};

#[derive(Default)]
pub struct MigrationTemplate;

impl Migration for MigrationTemplate {
    fn up(&self, ctx: &MigrationContext<'_>) -> MigrateResult<()> {
        // ctx.add_columns("Table", [("Column", "VARCHAR")])?;
        let _ = ctx;
        Ok(())
    }

    fn down(&self, ctx: &MigrationContext<'_>) -> MigrateResult<()> {
        // ctx.drop_columns("Table", &["Column"])?;
        let _ = ctx;
        Ok(())
    }
}

pub fn registration() -> Registration {
    register_migration!(MigrationTemplate)
}
