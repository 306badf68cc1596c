//! Make command implementation

use anyhow::Result;
use tm_migrate::scaffold::registration_snippet;
use tm_migrate::{MigrationRegistry, ScaffoldGenerator};

use crate::cli::GlobalArgs;
use crate::commands::common::load_project;

/// Generate a new timestamped migration file from the template.
pub(crate) fn execute(global: &GlobalArgs, registry: &MigrationRegistry, name: &str) -> Result<()> {
    let project = load_project(global)?;
    let generator = ScaffoldGenerator::new(&project.migration_dir, registry);
    let path = generator.make(name)?;

    let shown = path.strip_prefix(&project.root).unwrap_or(&path);
    println!("Created new migration: {}", shown.display());
    if let Some(snippet) = registration_snippet(&path) {
        println!();
        println!("Register it in the migrations module:");
        println!();
        for line in snippet.lines() {
            println!("    {line}");
        }
    }
    Ok(())
}
