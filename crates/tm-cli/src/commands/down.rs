//! Down command implementation

use anyhow::Result;
use tm_migrate::{MigrationRegistry, MigrationRunner};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_project, open_store};

/// Reverse the most recent batch.
pub(crate) fn execute(global: &GlobalArgs, registry: &MigrationRegistry) -> Result<()> {
    let project = load_project(global)?;
    let store = open_store(&project)?;

    let runner = MigrationRunner::new(&store, registry).with_config(&project.config);
    let report = runner.down()?;

    for event in &report.events {
        println!("{event}");
    }
    if let Some(batch) = report.batch {
        log::debug!("Reversed batch {batch}, {} migration(s)", report.processed());
    }
    Ok(())
}
