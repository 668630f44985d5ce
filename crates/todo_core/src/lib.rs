//! Core domain logic for the todo record service.
//! This crate is the single source of truth for todo business invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogLevel, LogTarget,
    LoggingError,
};
pub use model::todo::{NewTodo, Priority, TodoId, TodoItem, TodoValidationError};
pub use repo::memory_repo::InMemoryTodoRepository;
pub use repo::seed::seed_if_empty;
pub use repo::todo_repo::{RepoError, RepoResult, SqliteTodoRepository, TodoRepository};
pub use service::query::{PageWindow, TodoFilter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use service::todo_service::{
    CreateTodoInput, TodoService, TodoServiceError, TodoServiceResult, UpdateTodoInput,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
