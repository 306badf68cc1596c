//! CLI argument definitions using clap derive API

use clap::{Args, Parser};

/// Tidemark - ordered, batched, transactional database migrations
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Actions:\n  up              Apply all outstanding migrations as one batch\n  down            Reverse the most recent batch\n  status          Show applied and pending migrations\n  make:<name>     Generate a new migration file\n\nTrailing key:value arguments are passed to the action, e.g. `tm make name:add_summary`.")]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Action to run: up, down, status, or make:<name>
    pub action: Option<String>,

    /// Action arguments as key:value pairs (a bare key means true)
    pub args: Vec<String>,
}

/// Global arguments available to all actions
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the DuckDB database path (`:memory:` for a scratch store)
    #[arg(short, long, global = true, env = "TIDEMARK_DATABASE")]
    pub database: Option<String>,

    /// Override the migration directory
    #[arg(short, long, global = true, env = "TIDEMARK_MIGRATION_PATH")]
    pub migration_path: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
