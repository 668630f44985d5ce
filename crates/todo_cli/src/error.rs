//! Unexpected failures surfaced by the CLI.
//!
//! Expected outcomes (not found, bad input) are `Outcome`s, not errors.

use std::error::Error;
use std::fmt::{Display, Formatter};
use todo_core::db::DbError;
use todo_core::{RepoError, TodoServiceError};

#[derive(Debug)]
pub enum CliError {
    Db(DbError),
    Repo(RepoError),
    Service(TodoServiceError),
    Render(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database error: {err}"),
            Self::Repo(err) => write!(f, "storage error: {err}"),
            Self::Service(err) => write!(f, "service error: {err}"),
            Self::Render(err) => write!(f, "failed to render response: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<TodoServiceError> for CliError {
    fn from(value: TodoServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}
