use std::collections::BTreeMap;
use tm_migrate::{
    register_migration, MigrateResult, Migration, MigrationContext, Registration, RowValue,
};

const TABLE: &str = "Member";

#[derive(Default)]
pub struct MigrationAddDisplayNameToMember;

impl MigrationAddDisplayNameToMember {
    fn member_ids(ctx: &MigrationContext<'_>) -> MigrateResult<Vec<i64>> {
        let mut stmt = ctx.conn().prepare("SELECT ID FROM Member ORDER BY ID")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

impl Migration for MigrationAddDisplayNameToMember {
    fn up(&self, ctx: &MigrationContext<'_>) -> MigrateResult<()> {
        ctx.add_columns(TABLE, [("DisplayName", "VARCHAR")])?;

        for id in Self::member_ids(ctx)? {
            let names = ctx.get_row_values(TABLE, &["FirstName", "Surname"], id)?;
            let display = names
                .values()
                .filter_map(RowValue::as_str)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if display.is_empty() {
                continue;
            }
            let mut values = BTreeMap::new();
            values.insert("DisplayName".to_string(), RowValue::from(display));
            ctx.set_row_values(TABLE, &values, id, false)?;
        }
        Ok(())
    }

    fn down(&self, ctx: &MigrationContext<'_>) -> MigrateResult<()> {
        ctx.drop_columns(TABLE, &["DisplayName"])?;
        Ok(())
    }
}

pub fn registration() -> Registration {
    register_migration!(MigrationAddDisplayNameToMember)
}
