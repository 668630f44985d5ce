//! Single-version schema bootstrap.
//!
//! # Responsibility
//! - Create the `todo_items` table on a fresh database.
//! - Reject databases stamped by a newer schema.
//!
//! # Invariants
//! - A bootstrapped database has `PRAGMA user_version = SCHEMA_VERSION`.
//! - Bootstrapping an already-current database is a no-op.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const TODO_ITEMS_SQL: &str = include_str!("todo_items.sql");

/// Column set every todo table must expose.
pub const TODO_ITEMS_COLUMNS: [&str; 8] = [
    "id",
    "title",
    "description",
    "is_completed",
    "due_date",
    "priority",
    "created_at",
    "updated_at",
];

/// Creates the schema if missing and stamps the schema version.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current = schema_version(conn)?;

    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            supported: SCHEMA_VERSION,
        });
    }

    if current == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(TODO_ITEMS_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
