//! Entry Positioning Operations
//!
//! Key assignment for appended and moved entries, plus renormalization.
//! Each operation reads the keys it depends on and writes the result
//! inside one immediate transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::{info, warn};

use crate::domain::ordering::{self, AppendRule, PlaceRule, Placement};
use crate::domain::{DomainError, DomainResult, Entry};
use super::super::traits::{EntryPositioningOperations, Reposition};
use super::entry_repo::{fetch_entry, insert_entry, EntryRepository};

#[async_trait]
impl EntryPositioningOperations for EntryRepository {
    async fn append(&self, entry: &Entry, rule: AppendRule) -> DomainResult<Entry> {
        let entry = entry.clone();
        self.run("append", move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let key = rule(max_key(&tx)?);
            let entry = entry.at_key(key);
            insert_entry(&tx, &entry)?;
            let stored = fetch_entry(&tx, &entry.id)?
                .ok_or_else(|| DomainError::entry_not_found(&entry.id))?;

            tx.commit()?;
            Ok(stored)
        })
        .await
    }

    async fn reposition(&self, request: &Reposition, rule: PlaceRule) -> DomainResult<Entry> {
        let request = request.clone();
        self.run("reposition", move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if key_of(&tx, &request.target)?.is_none() {
                return Err(DomainError::entry_not_found(&request.target));
            }

            let key = match rule(neighbor_key(&tx, &request.back)?, neighbor_key(&tx, &request.front)?)? {
                Placement::Key(key) => key,
                Placement::GapExhausted { back, front } => {
                    warn!(
                        target_id = %request.target,
                        back,
                        front,
                        "neighbor keys too close, renormalizing"
                    );
                    renormalize_keys(&tx, request.updated_at)?;
                    match rule(neighbor_key(&tx, &request.back)?, neighbor_key(&tx, &request.front)?)? {
                        Placement::Key(key) => key,
                        Placement::GapExhausted { back, front } => {
                            return Err(DomainError::Internal(format!(
                                "no room between keys {} and {} after renormalization",
                                back, front
                            )));
                        }
                    }
                }
            };

            let moved = write_key(&tx, &request.target, key, request.updated_at)?;
            tx.commit()?;
            Ok(moved)
        })
        .await
    }

    /// Direct key write; service moves go through `reposition`.
    async fn update_key(&self, id: &str, key: f64, updated_at: DateTime<Utc>) -> DomainResult<Entry> {
        let id = id.to_string();
        self.run("update_key", move |conn| write_key(conn, &id, key, updated_at))
            .await
    }

    async fn renormalize(&self, updated_at: DateTime<Utc>) -> DomainResult<usize> {
        self.run("renormalize", move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let count = renormalize_keys(&tx, updated_at)?;
            tx.commit()?;
            info!(count, "renormalized entry keys");
            Ok(count)
        })
        .await
    }
}

fn max_key(conn: &Connection) -> DomainResult<Option<f64>> {
    let max = conn.query_row("SELECT MAX(sort_key) FROM entries", [], |row| row.get(0))?;
    Ok(max)
}

fn key_of(conn: &Connection, id: &str) -> DomainResult<Option<f64>> {
    let key = conn
        .query_row(
            "SELECT sort_key FROM entries WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(key)
}

/// Key of an optional neighbor; a named neighbor must exist.
fn neighbor_key(conn: &Connection, id: &Option<String>) -> DomainResult<Option<f64>> {
    match id {
        Some(id) => key_of(conn, id)?
            .map(Some)
            .ok_or_else(|| DomainError::entry_not_found(id)),
        None => Ok(None),
    }
}

fn write_key(conn: &Connection, id: &str, key: f64, updated_at: DateTime<Utc>) -> DomainResult<Entry> {
    let changed = conn.execute(
        "UPDATE entries SET sort_key = ?1, updated_at = ?2 WHERE id = ?3",
        params![key, updated_at, id],
    )?;
    if changed == 0 {
        return Err(DomainError::entry_not_found(id));
    }
    fetch_entry(conn, id)?.ok_or_else(|| DomainError::entry_not_found(id))
}

/// Respace every key in current display order.
fn renormalize_keys(conn: &Connection, updated_at: DateTime<Utc>) -> DomainResult<usize> {
    let ids = conn
        .prepare("SELECT id FROM entries ORDER BY sort_key DESC, id ASC")?
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let keys = ordering::spaced_keys(ids.len());
    let mut stmt = conn.prepare("UPDATE entries SET sort_key = ?1, updated_at = ?2 WHERE id = ?3")?;
    for (id, key) in ids.iter().zip(keys) {
        stmt.execute(params![key, updated_at, id])?;
    }
    Ok(ids.len())
}
