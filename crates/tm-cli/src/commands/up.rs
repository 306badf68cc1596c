//! Up command implementation

use anyhow::Result;
use tm_migrate::{MigrationRegistry, MigrationRunner};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_project, open_store};

/// Apply every outstanding migration as one batch.
pub(crate) fn execute(global: &GlobalArgs, registry: &MigrationRegistry) -> Result<()> {
    let project = load_project(global)?;
    let store = open_store(&project)?;

    let runner = MigrationRunner::new(&store, registry).with_config(&project.config);
    let report = runner.up()?;

    for event in &report.events {
        println!("{event}");
    }
    if let Some(batch) = report.batch {
        log::debug!("Batch {batch} {}", runner.state());
    }
    Ok(())
}
