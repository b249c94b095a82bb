//! Entry Service
//!
//! Validates requests, assigns ids and timestamps, and drives the store
//! with the ordering rules. Store errors pass through unchanged.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ordering::{append_key, place_between};
use crate::domain::{validate_content, DomainError, DomainResult, Entry, EntryPatch};
use crate::repository::{EntryStore, Reposition};

/// Paging window echoed back with a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: u32,
    pub size: u32,
}

/// One page of entries in display order
#[derive(Debug, Clone, PartialEq)]
pub struct EntryList {
    pub entries: Vec<Entry>,
    pub page: Page,
}

pub struct EntryService {
    store: Arc<dyn EntryStore>,
    max_page_size: u32,
}

impl EntryService {
    pub fn new(store: Arc<dyn EntryStore>, max_page_size: u32) -> Self {
        Self {
            store,
            max_page_size: max_page_size.max(1),
        }
    }

    /// Append a new entry at the top of the list.
    pub async fn create(&self, content: String, done: bool) -> DomainResult<Entry> {
        validate_content(&content)?;

        let entry = Entry::new(Uuid::new_v4().to_string(), content, done, Utc::now());
        let created = self.store.append(&entry, append_key).await?;

        info!(id = %created.id, key = created.key, "entry created");
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Entry> {
        debug!(id, "fetching entry");
        self.store
            .find_by_id(&id.to_string())
            .await?
            .ok_or_else(|| DomainError::entry_not_found(id))
    }

    /// List one `size`-wide window starting at `page * size`.
    ///
    /// Sizes above the configured maximum are rejected rather than shrunk,
    /// since a smaller size would also move the window.
    pub async fn list(&self, page: i64, size: i64) -> DomainResult<EntryList> {
        if page < 0 {
            return Err(DomainError::InvalidInput(format!("page must be >= 0, got {}", page)));
        }
        if size <= 0 {
            return Err(DomainError::InvalidInput(format!("size must be > 0, got {}", size)));
        }
        if size > i64::from(self.max_page_size) {
            return Err(DomainError::InvalidInput(format!(
                "size must be <= {}, got {}",
                self.max_page_size, size
            )));
        }

        let page = u32::try_from(page)
            .map_err(|_| DomainError::InvalidInput(format!("page {} is too large", page)))?;
        let size = u32::try_from(size)
            .map_err(|_| DomainError::InvalidInput(format!("size {} is too large", size)))?;

        let entries = self.store.list_page(page, size).await?;
        Ok(EntryList {
            entries,
            page: Page { page, size },
        })
    }

    /// Replace content and completion; the key is never touched here.
    pub async fn update(&self, id: &str, content: String, done: bool) -> DomainResult<Entry> {
        validate_content(&content)?;

        let patch = EntryPatch {
            content,
            done,
            updated_at: Utc::now(),
        };
        let updated = self.store.update(id, &patch).await?;

        info!(id, done, "entry updated");
        Ok(updated)
    }

    /// Move `target` between `back` (ends up below) and `front` (ends up above).
    pub async fn reorder(
        &self,
        target: &str,
        back: Option<&str>,
        front: Option<&str>,
    ) -> DomainResult<Entry> {
        if back.is_none() && front.is_none() {
            return Err(DomainError::InvalidInput(
                "reorder needs a back or front neighbor".to_string(),
            ));
        }
        if back == Some(target) || front == Some(target) {
            return Err(DomainError::InvalidInput(format!(
                "entry {} cannot be its own neighbor",
                target
            )));
        }
        if back.is_some() && back == front {
            return Err(DomainError::InvalidInput(
                "back and front neighbors must differ".to_string(),
            ));
        }

        let request = Reposition {
            target: target.to_string(),
            back: back.map(str::to_string),
            front: front.map(str::to_string),
            updated_at: Utc::now(),
        };
        let moved = self.store.reposition(&request, place_between).await?;

        info!(id = target, key = moved.key, ?back, ?front, "entry reordered");
        Ok(moved)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.store.delete(&id.to_string()).await?;
        info!(id, "entry deleted");
        Ok(())
    }

    /// Respace every key, keeping the current order.
    pub async fn renormalize(&self) -> DomainResult<usize> {
        self.store.renormalize(Utc::now()).await
    }
}
