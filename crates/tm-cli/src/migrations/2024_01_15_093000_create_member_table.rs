use tm_migrate::{register_migration, MigrateResult, Migration, MigrationContext, Registration};

#[derive(Default)]
pub struct MigrationCreateMemberTable;

impl Migration for MigrationCreateMemberTable {
    fn up(&self, ctx: &MigrationContext<'_>) -> MigrateResult<()> {
        ctx.execute_batch(
            "CREATE TABLE Member (
                ID        INTEGER NOT NULL,
                FirstName VARCHAR,
                Surname   VARCHAR,
                Email     VARCHAR,
                Created   TIMESTAMP DEFAULT current_timestamp
            )",
        )
    }

    fn down(&self, ctx: &MigrationContext<'_>) -> MigrateResult<()> {
        ctx.execute_batch("DROP TABLE IF EXISTS Member")
    }
}

pub fn registration() -> Registration {
    register_migration!(MigrationCreateMemberTable)
}
