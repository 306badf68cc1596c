//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tm_core::Config;
use tm_db::Store;

use crate::cli::GlobalArgs;

/// Project settings resolved from config, environment, and flags.
#[derive(Debug, Clone)]
pub(crate) struct ProjectContext {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
    pub(crate) migration_dir: PathBuf,
    pub(crate) database: String,
}

/// Load the project configuration and resolve paths against the project dir.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<ProjectContext> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => Config::load_or_default(&root).context("Failed to load project config")?,
    };
    let migration_dir = config.resolve_migration_path(global.migration_path.as_deref(), &root);
    let database = config.resolve_database_path(global.database.as_deref(), &root);
    log::debug!(
        "Project '{}': database {database}, migrations in {}",
        config.name,
        migration_dir.display()
    );
    Ok(ProjectContext {
        root,
        config,
        migration_dir,
        database,
    })
}

/// Open the configured store.
pub(crate) fn open_store(project: &ProjectContext) -> Result<Store> {
    Store::new(&project.database)
        .with_context(|| format!("Failed to open database {}", project.database))
}

/// Calculate the display width for each column based on headers and row data.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Print a left-aligned table with a dashed separator under the header.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  ").trim_end());

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  ").trim_end());
    }
}
