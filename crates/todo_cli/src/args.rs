//! Command-line surface.
//!
//! Each subcommand maps to one core operation; the doc comment names the
//! HTTP route it stands in for.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "todos.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(about = "Manage todo items stored in a local SQLite database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// SQLite database file
    #[arg(long, global = true, env = "TODO_DB", default_value = DEFAULT_DB_FILE_NAME)]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults to warn on stderr
    #[arg(long, global = true, env = "TODO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when unset
    #[arg(long, global = true, env = "TODO_LOG_DIR")]
    pub log_dir: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List todos, newest first (GET /todos)
    #[command(alias = "ls")]
    List {
        /// Only todos with this completion state
        #[arg(long = "completed", value_name = "BOOL", action = clap::ArgAction::Set)]
        is_completed: Option<bool>,

        /// Case-insensitive title search
        #[arg(short, long)]
        search: Option<String>,

        /// 1-based page number
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        /// Items per page (1-100)
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        page_size: i64,
    },

    /// Show one todo (GET /todos/{id})
    Get { id: i64 },

    /// Create a todo (POST /todos)
    #[command(alias = "n")]
    Create(TodoFields),

    /// Replace every field of a todo (PUT /todos/{id})
    Update {
        id: i64,

        #[command(flatten)]
        fields: TodoFields,

        /// Mark as completed; omitting it stores the todo as open
        #[arg(long)]
        completed: bool,
    },

    /// Delete a todo permanently (DELETE /todos/{id})
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// Mark a todo completed (PATCH /todos/{id}/complete)
    Complete { id: i64 },

    /// Insert demo todos when the database is empty
    Seed,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct TodoFields {
    /// Title (3-100 characters)
    #[arg(short, long)]
    pub title: String,

    /// Description (up to 500 characters)
    #[arg(short, long)]
    pub description: Option<String>,

    /// Due date as RFC 3339 (2026-01-31T09:00:00Z) or epoch milliseconds
    #[arg(long, value_parser = parse_due_date)]
    pub due: Option<i64>,

    /// Priority: 1 (high), 2 (medium) or 3 (low)
    #[arg(short, long, default_value_t = 2, allow_negative_numbers = true)]
    pub priority: i64,
}

/// Parses an RFC 3339 timestamp or raw epoch milliseconds.
pub fn parse_due_date(value: &str) -> Result<i64, String> {
    let trimmed = value.trim();
    if let Ok(epoch_ms) = trimmed.parse::<i64>() {
        return Ok(epoch_ms);
    }

    chrono::DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.timestamp_millis())
        .map_err(|err| format!("expected RFC 3339 timestamp or epoch milliseconds: {err}"))
}
