//! Tidemark CLI - ordered, batched, transactional database migrations

use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tm_migrate::MigrateError;

mod action;
mod cli;
mod commands;
mod migrations;

use action::{parse_action, parse_args, Action};
use cli::Cli;
use commands::{down, make, status, up};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let args = parse_args(&cli.args);
    let action = match parse_action(cli.action.as_deref(), &args) {
        Ok(action) => action,
        Err(err) => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("{}", Cli::command().render_usage());
            eprintln!("Run `tm --help` for the list of actions.");
            return ExitCode::from(2);
        }
    };

    match run(&cli, &action) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&action, &err),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(cli: &Cli, action: &Action) -> anyhow::Result<()> {
    let registry = migrations::registry();
    log::debug!("{} registered migration(s)", registry.len());

    match action {
        Action::Up => up::execute(&cli.global, &registry),
        Action::Down => down::execute(&cli.global, &registry),
        Action::Status { json } => status::execute(&cli.global, &registry, *json),
        Action::Make { name } => make::execute(&cli.global, &registry, name),
    }
}

fn report_error(action: &Action, err: &anyhow::Error) -> ExitCode {
    if let Some(MigrateError::UsageError(message)) = err.downcast_ref::<MigrateError>() {
        eprintln!("[M001] {message}");
        return ExitCode::from(2);
    }

    eprintln!("ERROR: {err}");
    if action.is_batch() && batch_rolled_back(err) {
        eprintln!();
        eprintln!("Note: Any database changes have been rolled back.");
    }
    let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
    if !causes.is_empty() {
        eprintln!();
        eprintln!("Caused by:");
        for cause in causes {
            eprintln!("    {cause}");
        }
    }
    ExitCode::FAILURE
}

/// Failures before BEGIN (config, store open, discovery) leave nothing to
/// roll back.
fn batch_rolled_back(err: &anyhow::Error) -> bool {
    err.downcast_ref::<MigrateError>()
        .is_some_and(MigrateError::is_batch_failure)
}
