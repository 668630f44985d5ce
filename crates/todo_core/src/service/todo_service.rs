//! Todo use-case service.
//!
//! # Responsibility
//! - Expose list/get/create/update/delete/complete over any
//!   `TodoRepository`.
//! - Normalize inputs (trimming, page bounds) before storage sees them.
//!
//! # Invariants
//! - "Not found" is an ordinary outcome (`None`/`false`), never an error.
//! - List applies filter, then sort (`created_at DESC`, stable), then page.
//! - `complete` never writes for an already-completed record.
//! - Storage errors propagate unchanged; the service never retries.

use crate::clock::{Clock, SystemClock};
use crate::model::todo::{NewTodo, Priority, TodoId, TodoItem, TodoValidationError};
use crate::repo::todo_repo::{RepoError, TodoRepository};
use crate::service::query::{PageWindow, TodoFilter};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TITLE_MIN_CHARS: usize = 3;
const TITLE_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 500;

pub type TodoServiceResult<T> = Result<T, TodoServiceError>;

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Input that should have been rejected upstream reached the core.
    InvalidInput(TodoValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidInput(err),
            other => Self::Repo(other),
        }
    }
}

/// Create command payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<i64>,
    pub priority: Priority,
}

impl CreateTodoInput {
    /// Boundary checks: title 3-100 chars, description at most 500 chars.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_text_fields(&self.title, self.description.as_deref())
    }
}

/// Full-replace update payload. Absent optional fields clear stored values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<i64>,
    pub priority: Priority,
    pub is_completed: bool,
}

impl UpdateTodoInput {
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_text_fields(&self.title, self.description.as_deref())
    }
}

/// Todo service facade over repository implementations.
pub struct TodoService<R: TodoRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service stamping times from the system clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: TodoRepository, C: Clock> TodoService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Lists one page of records matching `filter`, newest first.
    ///
    /// Out-of-range pages yield an empty list.
    pub fn list(
        &self,
        filter: &TodoFilter,
        page: i64,
        page_size: i64,
    ) -> TodoServiceResult<Vec<TodoItem>> {
        let window = PageWindow::normalize(page, page_size);
        let predicate = filter.to_predicate();

        let mut todos = self.repo.find_all(&predicate)?;
        // Stable: equal timestamps keep storage (insertion) order.
        todos.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        let matched = todos.len();
        let page_items: Vec<TodoItem> = todos
            .into_iter()
            .skip(window.offset())
            .take(window.limit())
            .collect();

        debug!(
            "event=todo_list module=service status=ok matched={} returned={} page={} page_size={}",
            matched,
            page_items.len(),
            window.page,
            window.page_size
        );
        Ok(page_items)
    }

    pub fn get_by_id(&self, id: TodoId) -> TodoServiceResult<Option<TodoItem>> {
        Ok(self.repo.find_by_id(id)?)
    }

    /// Creates a record with trimmed text fields and `is_completed = false`.
    pub fn create(&self, input: &CreateTodoInput) -> TodoServiceResult<TodoItem> {
        let title = normalize_title(&input.title)?;
        let now = self.clock.now_ms();
        let new_todo = NewTodo {
            title,
            description: normalize_description(input.description.as_deref()),
            is_completed: false,
            due_date: input.due_date,
            priority: input.priority,
            created_at: now,
            updated_at: now,
        };

        let id = self.repo.insert(&new_todo)?;
        info!("event=todo_create module=service status=ok id={id}");
        Ok(new_todo.into_item(id))
    }

    /// Replaces every mutable field of an existing record.
    ///
    /// Returns `false` when the record does not exist.
    pub fn update(&self, id: TodoId, input: &UpdateTodoInput) -> TodoServiceResult<bool> {
        let title = normalize_title(&input.title)?;
        let Some(existing) = self.repo.find_by_id(id)? else {
            info!("event=todo_update module=service status=not_found id={id}");
            return Ok(false);
        };

        let replaced = TodoItem {
            id,
            title,
            description: normalize_description(input.description.as_deref()),
            is_completed: input.is_completed,
            due_date: input.due_date,
            priority: input.priority,
            created_at: existing.created_at,
            updated_at: self.clock.now_ms().max(existing.created_at),
        };

        let written = write_outcome(self.repo.update(&replaced))?;
        info!("event=todo_update module=service status=ok id={id} written={written}");
        Ok(written)
    }

    /// Permanently removes a record. Returns `false` when it does not exist.
    pub fn delete(&self, id: TodoId) -> TodoServiceResult<bool> {
        if self.repo.find_by_id(id)?.is_none() {
            info!("event=todo_delete module=service status=not_found id={id}");
            return Ok(false);
        }

        let deleted = write_outcome(self.repo.delete(id))?;
        info!("event=todo_delete module=service status=ok id={id} deleted={deleted}");
        Ok(deleted)
    }

    /// Marks a record completed. Idempotent: an already-completed record is
    /// reported as success without a write.
    pub fn complete(&self, id: TodoId) -> TodoServiceResult<bool> {
        let Some(mut todo) = self.repo.find_by_id(id)? else {
            info!("event=todo_complete module=service status=not_found id={id}");
            return Ok(false);
        };

        if todo.is_completed {
            debug!("event=todo_complete module=service status=ok id={id} written=false");
            return Ok(true);
        }

        todo.is_completed = true;
        todo.updated_at = self.clock.now_ms().max(todo.created_at);
        let written = write_outcome(self.repo.update(&todo))?;
        info!("event=todo_complete module=service status=ok id={id} written={written}");
        Ok(written)
    }
}

/// Maps a write that lost a race with a concurrent delete to "not found".
fn write_outcome(result: Result<(), RepoError>) -> TodoServiceResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(RepoError::NotFound(_)) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

fn normalize_title(title: &str) -> TodoServiceResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TodoServiceError::InvalidInput(
            TodoValidationError::BlankTitle,
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description.map(|value| value.trim().to_string())
}

fn validate_text_fields(
    title: &str,
    description: Option<&str>,
) -> Result<(), TodoValidationError> {
    if title.trim().is_empty() {
        return Err(TodoValidationError::BlankTitle);
    }

    let title_len = title.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_len) {
        return Err(TodoValidationError::TitleLength {
            len: title_len,
            min: TITLE_MIN_CHARS,
            max: TITLE_MAX_CHARS,
        });
    }

    if let Some(description) = description {
        let len = description.chars().count();
        if len > DESCRIPTION_MAX_CHARS {
            return Err(TodoValidationError::DescriptionTooLong {
                len,
                max: DESCRIPTION_MAX_CHARS,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_description, CreateTodoInput, UpdateTodoInput};
    use crate::model::todo::{Priority, TodoValidationError};

    fn create(title: &str, description: Option<&str>) -> CreateTodoInput {
        CreateTodoInput {
            title: title.to_string(),
            description: description.map(str::to_string),
            due_date: None,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn boundary_validation_enforces_lengths() {
        assert!(create("abc", None).validate().is_ok());
        assert!(matches!(
            create("ab", None).validate(),
            Err(TodoValidationError::TitleLength { len: 2, .. })
        ));
        assert!(matches!(
            create(&"x".repeat(101), None).validate(),
            Err(TodoValidationError::TitleLength { len: 101, .. })
        ));
        assert!(create(&"x".repeat(100), Some(&"d".repeat(500)))
            .validate()
            .is_ok());
        assert!(matches!(
            create("title", Some(&"d".repeat(501))).validate(),
            Err(TodoValidationError::DescriptionTooLong { len: 501, .. })
        ));
        assert_eq!(
            create("    ", None).validate(),
            Err(TodoValidationError::BlankTitle)
        );
    }

    #[test]
    fn present_description_is_trimmed_but_kept() {
        assert_eq!(normalize_description(Some("   ")).as_deref(), Some(""));
        assert_eq!(
            normalize_description(Some("  body ")).as_deref(),
            Some("body")
        );
        assert_eq!(normalize_description(None), None);
    }

    #[test]
    fn update_input_deserializes_full_replace_payload() {
        let input: UpdateTodoInput = serde_json::from_str(
            r#"{"title":"Ship it","priority":1,"isCompleted":true}"#,
        )
        .unwrap();
        assert_eq!(input.priority, Priority::High);
        assert!(input.is_completed);
        assert!(input.description.is_none());
        assert!(input.due_date.is_none());
    }

    #[test]
    fn create_input_rejects_unknown_priority() {
        let parsed = serde_json::from_str::<CreateTodoInput>(r#"{"title":"abc","priority":0}"#);
        assert!(parsed.is_err());
    }
}
