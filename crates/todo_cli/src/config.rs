//! Runtime configuration resolved from flags and `TODO_*` environment
//! variables.

use crate::args::Cli;
use std::path::PathBuf;
use todo_core::default_log_level;

/// Level used for the stderr logger when no level is configured.
pub const STDERR_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logs go to stderr when `None`.
    pub log_dir: Option<String>,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let log_dir = cli
            .log_dir
            .as_deref()
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(str::to_string);
        let fallback_level = if log_dir.is_some() {
            default_log_level()
        } else {
            STDERR_LOG_LEVEL
        };

        Self {
            db_path: cli.db.clone(),
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| fallback_level.to_string()),
            log_dir,
        }
    }
}
