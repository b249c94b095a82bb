//! Entry Repository - Core CRUD Operations
//!
//! SQLite-backed implementation of Repository<Entry>.
//! Key management lives in entry_positioning.
//!
//! Every call takes the connection lock, runs its statements on the
//! blocking pool and is bounded by the store timeout. A call that times out
//! is reported as `Unavailable`; work already handed to the blocking pool
//! still runs to completion.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::{DomainError, DomainResult, Entry, EntryPatch};
use super::super::traits::{EntryStore, Repository};

const ENTRY_COLUMNS: &str = "id, content, done, sort_key, created_at, updated_at";

/// SQLite implementation of the entry store
pub struct EntryRepository {
    conn: Arc<Mutex<Connection>>,
    timeout: Duration,
}

impl EntryRepository {
    pub fn new(conn: Connection, timeout: Duration) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            timeout,
        }
    }

    /// Run `work` against the connection under the store timeout.
    pub(super) async fn run<R, F>(&self, op: &'static str, work: F) -> DomainResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut Connection) -> DomainResult<R> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let call = async move {
            let mut guard = conn.lock_owned().await;
            tokio::task::spawn_blocking(move || work(&mut *guard))
                .await
                .map_err(|e| DomainError::Internal(format!("{} task failed: {}", op, e)))?
        };

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, timeout_ms = self.timeout.as_millis() as u64, "store call timed out");
                Err(DomainError::Unavailable(format!(
                    "{} did not complete within {}s",
                    op,
                    self.timeout.as_secs_f64()
                )))
            }
        }
    }
}

#[async_trait]
impl Repository<Entry> for EntryRepository {
    /// Insert at the entry's own key; service creates go through `append`.
    async fn create(&self, entity: &Entry) -> DomainResult<Entry> {
        let entry = entity.clone();
        self.run("create", move |conn| {
            insert_entry(conn, &entry)?;
            fetch_entry(conn, &entry.id)?.ok_or_else(|| DomainError::entry_not_found(&entry.id))
        })
        .await
    }

    async fn find_by_id(&self, id: &String) -> DomainResult<Option<Entry>> {
        let id = id.clone();
        self.run("find_by_id", move |conn| fetch_entry(conn, &id)).await
    }

    async fn list_page(&self, page: u32, size: u32) -> DomainResult<Vec<Entry>> {
        debug!(page, size, "listing entries");
        self.run("list_page", move |conn| {
            let offset = i64::from(page) * i64::from(size);
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {} FROM entries ORDER BY sort_key DESC, id ASC LIMIT ?1 OFFSET ?2",
                ENTRY_COLUMNS
            ))?;
            let entries = stmt
                .query_map(params![i64::from(size), offset], row_to_entry)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
        .await
    }

    async fn delete(&self, id: &String) -> DomainResult<()> {
        let id = id.clone();
        self.run("delete", move |conn| {
            let removed = conn.execute("DELETE FROM entries WHERE id = ?1", params![id])?;
            if removed == 0 {
                return Err(DomainError::entry_not_found(&id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl EntryStore for EntryRepository {
    async fn update(&self, id: &str, patch: &EntryPatch) -> DomainResult<Entry> {
        let id = id.to_string();
        let patch = patch.clone();
        self.run("update", move |conn| {
            let changed = conn.execute(
                "UPDATE entries SET content = ?1, done = ?2, updated_at = ?3 WHERE id = ?4",
                params![patch.content, patch.done, patch.updated_at, id],
            )?;
            if changed == 0 {
                return Err(DomainError::entry_not_found(&id));
            }
            fetch_entry(conn, &id)?.ok_or_else(|| DomainError::entry_not_found(&id))
        })
        .await
    }
}

pub(super) fn insert_entry(conn: &Connection, entry: &Entry) -> DomainResult<()> {
    conn.execute(
        "INSERT INTO entries (id, content, done, sort_key, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.id,
            entry.content,
            entry.done,
            entry.key,
            entry.created_at,
            entry.updated_at
        ],
    )?;
    Ok(())
}

pub(super) fn fetch_entry(conn: &Connection, id: &str) -> DomainResult<Option<Entry>> {
    let entry = conn
        .query_row(
            &format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS),
            params![id],
            row_to_entry,
        )
        .optional()?;
    Ok(entry)
}

/// Convert a database row to Entry
fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        content: row.get(1)?,
        done: row.get(2)?,
        key: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
