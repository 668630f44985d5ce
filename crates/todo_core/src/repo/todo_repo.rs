//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup, predicate enumeration, insert, update and delete over
//!   the `todo_items` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `find_all` yields rows in ascending id order.
//! - `insert_all` writes every record or none.

use crate::db::schema::{schema_version, SCHEMA_VERSION, TODO_ITEMS_COLUMNS};
use crate::db::DbError;
use crate::model::todo::{NewTodo, Priority, TodoId, TodoItem, TodoValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    is_completed,
    due_date,
    priority,
    created_at,
    updated_at
FROM todo_items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    InvalidData(String),
    /// Connection schema version does not match this binary.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// In-memory store lock was poisoned by a panicking writer.
    Poisoned,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::Poisoned => write!(f, "in-memory todo store is poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract the todo service depends on.
///
/// Every method is atomic with respect to a single record.
pub trait TodoRepository {
    /// Persists a new record and returns its freshly assigned id.
    fn insert(&self, todo: &NewTodo) -> RepoResult<TodoId>;
    /// Persists a batch atomically; on error no record of the batch is kept.
    fn insert_all(&self, todos: &[NewTodo]) -> RepoResult<Vec<TodoId>>;
    fn count(&self) -> RepoResult<usize>;
    fn find_by_id(&self, id: TodoId) -> RepoResult<Option<TodoItem>>;
    /// Returns every record matching `predicate`, in ascending id order.
    fn find_all(&self, predicate: &dyn Fn(&TodoItem) -> bool) -> RepoResult<Vec<TodoItem>>;
    /// Replaces the record with `todo.id`; `NotFound` when absent.
    fn update(&self, todo: &TodoItem) -> RepoResult<()>;
    /// Removes the record; `NotFound` when absent.
    fn delete(&self, id: TodoId) -> RepoResult<()>;
}

impl<R: TodoRepository + ?Sized> TodoRepository for &R {
    fn insert(&self, todo: &NewTodo) -> RepoResult<TodoId> {
        (**self).insert(todo)
    }

    fn insert_all(&self, todos: &[NewTodo]) -> RepoResult<Vec<TodoId>> {
        (**self).insert_all(todos)
    }

    fn count(&self) -> RepoResult<usize> {
        (**self).count()
    }

    fn find_by_id(&self, id: TodoId) -> RepoResult<Option<TodoItem>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self, predicate: &dyn Fn(&TodoItem) -> bool) -> RepoResult<Vec<TodoItem>> {
        (**self).find_all(predicate)
    }

    fn update(&self, todo: &TodoItem) -> RepoResult<()> {
        (**self).update(todo)
    }

    fn delete(&self, id: TodoId) -> RepoResult<()> {
        (**self).delete(id)
    }
}

/// SQLite-backed todo repository borrowing a bootstrapped connection.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Wraps a connection after checking it carries the todo schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn insert(&self, todo: &NewTodo) -> RepoResult<TodoId> {
        todo.validate()?;
        insert_row(self.conn, todo)
    }

    fn insert_all(&self, todos: &[NewTodo]) -> RepoResult<Vec<TodoId>> {
        for todo in todos {
            todo.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(todos.len());
        for todo in todos {
            ids.push(insert_row(&tx, todo)?);
        }
        tx.commit()?;
        Ok(ids)
    }

    fn count(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM todo_items;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }

    fn find_by_id(&self, id: TodoId) -> RepoResult<Option<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self, predicate: &dyn Fn(&TodoItem) -> bool) -> RepoResult<Vec<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            let todo = parse_todo_row(row)?;
            if predicate(&todo) {
                todos.push(todo);
            }
        }

        Ok(todos)
    }

    fn update(&self, todo: &TodoItem) -> RepoResult<()> {
        todo.validate()?;

        let changed = self.conn.execute(
            "UPDATE todo_items
             SET
                title = ?1,
                description = ?2,
                is_completed = ?3,
                due_date = ?4,
                priority = ?5,
                updated_at = ?6
             WHERE id = ?7;",
            params![
                todo.title.as_str(),
                todo.description.as_deref(),
                bool_to_int(todo.is_completed),
                todo.due_date,
                todo.priority.level(),
                todo.updated_at,
                todo.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(todo.id));
        }

        Ok(())
    }

    fn delete(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todo_items WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn insert_row(conn: &Connection, todo: &NewTodo) -> RepoResult<TodoId> {
    conn.execute(
        "INSERT INTO todo_items (
            title,
            description,
            is_completed,
            due_date,
            priority,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            todo.title.as_str(),
            todo.description.as_deref(),
            bool_to_int(todo.is_completed),
            todo.due_date,
            todo.priority.level(),
            todo.created_at,
            todo.updated_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<TodoItem> {
    let id: TodoId = row.get("id")?;

    let priority_level: i64 = row.get("priority")?;
    let priority = Priority::try_from(priority_level).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_level}` in todo_items.priority for id {id}"
        ))
    })?;

    let is_completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_completed value `{other}` in todo_items.is_completed for id {id}"
            )));
        }
    };

    let todo = TodoItem {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        is_completed,
        due_date: row.get("due_date")?,
        priority,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    todo.validate()?;
    Ok(todo)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = schema_version(conn)?;
    if actual_version != SCHEMA_VERSION {
        return Err(RepoError::UninitializedConnection {
            expected_version: SCHEMA_VERSION,
            actual_version,
        });
    }

    if !table_exists(conn, "todo_items")? {
        return Err(RepoError::MissingRequiredTable("todo_items"));
    }

    for column in TODO_ITEMS_COLUMNS {
        if !table_has_column(conn, "todo_items", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "todo_items",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
