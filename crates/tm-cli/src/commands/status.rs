//! Status command implementation

use anyhow::{Context, Result};
use tm_migrate::{MigrationRegistry, MigrationRunner, MigrationStatus};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_project, open_store, print_table};

/// Show every registered or recorded migration with its ledger state.
pub(crate) fn execute(global: &GlobalArgs, registry: &MigrationRegistry, json: bool) -> Result<()> {
    let project = load_project(global)?;
    let store = open_store(&project)?;

    let statuses = MigrationRunner::new(&store, registry)
        .with_config(&project.config)
        .status()?;

    if json {
        let out = serde_json::to_string_pretty(&statuses)
            .context("Failed to serialize migration status")?;
        println!("{out}");
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No migrations registered.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = statuses.iter().map(status_row).collect();
    print_table(&["MIGRATION", "STATE", "BATCH", "APPLIED AT"], &rows);

    let pending = statuses.iter().filter(|s| !s.applied).count();
    println!();
    println!(
        "{} applied, {pending} pending",
        statuses.len() - pending
    );
    Ok(())
}

fn status_row(status: &MigrationStatus) -> Vec<String> {
    let state = match (status.applied, status.registered) {
        (true, true) => "applied",
        (true, false) => "applied (unregistered)",
        (false, _) => "pending",
    };
    vec![
        status.base_name.to_string(),
        state.to_string(),
        status.batch.map(|b| b.to_string()).unwrap_or_default(),
        status
            .stamp
            .map(|s| s.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
    ]
}
