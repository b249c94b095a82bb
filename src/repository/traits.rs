//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ordering::{AppendRule, PlaceRule};
use crate::domain::{DomainResult, Entity, Entry, EntryPatch};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert an entity with the key it already carries and return it as
    /// stored. The service creates entries through `append` instead.
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>>;

    /// One page of entities in display order
    async fn list_page(&self, page: u32, size: u32) -> DomainResult<Vec<T>>;

    /// Delete entity by ID, `NotFound` if it does not exist
    async fn delete(&self, id: &T::Id) -> DomainResult<()>;
}

/// A move request: put `target` between `back` and `front`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reposition {
    pub target: String,
    /// Neighbor that ends up after the target (smaller key)
    pub back: Option<String>,
    /// Neighbor that ends up before the target (larger key)
    pub front: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Key management for entries.
///
/// `append` and `reposition` read and write inside one transaction, so two
/// concurrent calls cannot compute their keys from the same snapshot.
#[async_trait]
pub trait EntryPositioningOperations: Send + Sync {
    /// Insert `entry` with the key `rule` derives from the current maximum
    async fn append(&self, entry: &Entry, rule: AppendRule) -> DomainResult<Entry>;

    /// Move an entry between its neighbors, respacing the list if the
    /// neighbors are too close to split
    async fn reposition(&self, request: &Reposition, rule: PlaceRule) -> DomainResult<Entry>;

    /// Overwrite the key of a single entry, unchecked against its
    /// neighbors. The service moves entries through `reposition` instead.
    async fn update_key(&self, id: &str, key: f64, updated_at: DateTime<Utc>) -> DomainResult<Entry>;

    /// Reassign evenly spaced keys across the whole list, keeping its order
    async fn renormalize(&self, updated_at: DateTime<Utc>) -> DomainResult<usize>;
}

/// Everything the list service needs from storage
#[async_trait]
pub trait EntryStore: Repository<Entry> + EntryPositioningOperations {
    /// Change content and completion only; `NotFound` if absent
    async fn update(&self, id: &str, patch: &EntryPatch) -> DomainResult<Entry>;
}
