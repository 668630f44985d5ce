//! Command-line transport for the todo core.
//!
//! # Responsibility
//! - Resolve configuration, start logging (files or stderr), open the
//!   SQLite store.
//! - Turn every unexpected error into an opaque failure with a trace id.

mod args;
mod config;
mod dispatch;
mod error;
mod outcome;

use args::{Cli, Command};
use clap::Parser;
use config::AppConfig;
use error::CliError;
use log::error;
use outcome::Outcome;
use std::process::ExitCode;
use todo_core::db::open_db;
use todo_core::{init_logging, init_stderr_logging, SqliteTodoRepository, TodoService};
use uuid::Uuid;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);

    let logging = match config.log_dir.as_deref() {
        Some(log_dir) => init_logging(&config.log_level, log_dir),
        None => init_stderr_logging(&config.log_level),
    };
    if let Err(err) = logging {
        eprintln!("warning: logging disabled: {err}");
    }

    let outcome = run(&config, &cli.command).unwrap_or_else(|err| failure(&err));
    outcome.emit();
    ExitCode::from(outcome.exit_code())
}

fn run(config: &AppConfig, command: &Command) -> Result<Outcome, CliError> {
    let conn = open_db(&config.db_path)?;
    let repo = SqliteTodoRepository::try_new(&conn)?;
    let service = TodoService::new(repo);
    dispatch::dispatch(&service, command)
}

fn failure(err: &CliError) -> Outcome {
    let trace_id = Uuid::new_v4();
    error!("event=request_failed module=cli status=error trace_id={trace_id} error={err}");
    Outcome::Failure { trace_id }
}
