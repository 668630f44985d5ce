//! Storage abstraction and its implementations.
//!
//! # Responsibility
//! - Define the todo storage contract the service depends on.
//! - Provide SQLite and in-memory engines satisfying that contract.
//!
//! # Invariants
//! - Writes enforce `NewTodo::validate()` / `TodoItem::validate()` first.
//! - Missing rows on update/delete surface as `RepoError::NotFound`.
//! - Enumeration order is ascending id (insertion order).

pub mod memory_repo;
pub mod seed;
pub mod todo_repo;
