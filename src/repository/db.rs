//! Database Connection and Setup
//!
//! Opens the SQLite database and runs migrations.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, ErrorCode};
use tracing::info;

use crate::domain::{DomainError, DomainResult};
use super::entry::EntryRepository;

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _) => match err.code {
                ErrorCode::ConstraintViolation => DomainError::Conflict(e.to_string()),
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                    DomainError::Unavailable(e.to_string())
                }
                _ => DomainError::Internal(e.to_string()),
            },
            _ => DomainError::Internal(e.to_string()),
        }
    }
}

/// Open (or create) the database at `db_path` and bring the schema up to date.
///
/// `:memory:` opens a private in-memory database.
pub fn init_db(db_path: &Path, busy_timeout: Duration) -> DomainResult<Connection> {
    let conn = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory()?
    } else {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::Unavailable(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        Connection::open(db_path)?
    };

    conn.busy_timeout(busy_timeout)?;
    run_migrations(&conn)?;

    info!(path = %db_path.display(), "database ready");
    Ok(conn)
}

/// Open the database and wrap it in an entry repository.
pub fn open_repository(db_path: &Path, timeout: Duration) -> DomainResult<EntryRepository> {
    let conn = init_db(db_path, timeout)?;
    Ok(EntryRepository::new(conn, timeout))
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            id TEXT PRIMARY KEY NOT NULL,
            content TEXT NOT NULL CHECK (length(content) > 0),
            done INTEGER NOT NULL DEFAULT 0,
            sort_key REAL NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // Databases created before updates were tracked lack updated_at
    if !column_exists(conn, "entries", "updated_at")? {
        conn.execute(
            "ALTER TABLE entries ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''",
            [],
        )?;
        conn.execute(
            "UPDATE entries SET updated_at = created_at WHERE updated_at = ''",
            [],
        )?;
    }

    // Listing walks the key index in reverse
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_sort_key ON entries(sort_key DESC, id)",
        [],
    )?;

    Ok(())
}
