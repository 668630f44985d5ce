//! Todo domain model.
//!
//! # Responsibility
//! - Define the persisted todo record and its insert-side shape.
//! - Validate core invariants before persistence and after read-back.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused.
//! - `title` is non-blank.
//! - `updated_at >= created_at`.
//!
//! Timestamps are Unix epoch milliseconds (UTC).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier for a todo record.
pub type TodoId = i64;

/// Todo priority level. Serialized as its integer level (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Priority {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    /// Returns the integer level stored and exchanged for this priority.
    pub fn level(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for Priority {
    type Error = TodoValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::High),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Low),
            other => Err(TodoValidationError::InvalidPriority(other)),
        }
    }
}

impl From<Priority> for i64 {
    fn from(value: Priority) -> Self {
        value.level()
    }
}

/// Validation failure for todo records and inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Title is empty after trimming.
    BlankTitle,
    /// Title length (in characters) is outside the accepted range.
    TitleLength { len: usize, min: usize, max: usize },
    /// Description length (in characters) exceeds the accepted maximum.
    DescriptionTooLong { len: usize, max: usize },
    /// Priority level is not 1, 2 or 3.
    InvalidPriority(i64),
    /// `updated_at` precedes `created_at`.
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::TitleLength { len, min, max } => write!(
                f,
                "title must be between {min} and {max} characters, got {len}"
            ),
            Self::DescriptionTooLong { len, max } => write!(
                f,
                "description must be at most {max} characters, got {len}"
            ),
            Self::InvalidPriority(value) => {
                write!(f, "priority must be 1, 2 or 3, got {value}")
            }
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must not precede created_at ({created_at})"
            ),
        }
    }
}

impl Error for TodoValidationError {}

/// Persisted todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    /// Optional deadline in epoch milliseconds; may precede `created_at`.
    pub due_date: Option<i64>,
    pub priority: Priority,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TodoItem {
    /// Checks invariants every stored record must satisfy.
    ///
    /// Length limits are a boundary concern and are not re-checked here.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_core_fields(&self.title, self.created_at, self.updated_at)
    }
}

/// Insert-side record: everything but the storage-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub due_date: Option<i64>,
    pub priority: Priority,
    pub created_at: i64,
    pub updated_at: i64,
}

impl NewTodo {
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_core_fields(&self.title, self.created_at, self.updated_at)
    }

    /// Attaches the storage-assigned id.
    pub fn into_item(self, id: TodoId) -> TodoItem {
        TodoItem {
            id,
            title: self.title,
            description: self.description,
            is_completed: self.is_completed,
            due_date: self.due_date,
            priority: self.priority,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn validate_core_fields(
    title: &str,
    created_at: i64,
    updated_at: i64,
) -> Result<(), TodoValidationError> {
    if title.trim().is_empty() {
        return Err(TodoValidationError::BlankTitle);
    }
    if updated_at < created_at {
        return Err(TodoValidationError::UpdatedBeforeCreated {
            created_at,
            updated_at,
        });
    }
    Ok(())
}
