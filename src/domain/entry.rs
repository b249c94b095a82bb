//! Entry Entity
//!
//! A single line of the ordered todo list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};

/// A todo entry positioned by a fractional sort key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, assigned once at creation
    pub id: String,
    /// Displayed text, never empty once persisted
    pub content: String,
    /// Completion flag; does not affect ordering
    pub done: bool,
    /// Sort key; larger keys are listed first
    pub key: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Create an unpositioned entry; the key is assigned on append.
    pub fn new(id: String, content: String, done: bool, now: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            done,
            key: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Same entry at a given key
    pub fn at_key(mut self, key: f64) -> Self {
        self.key = key;
        self
    }
}

impl Entity for Entry {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// Client-editable fields of an entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPatch {
    pub content: String,
    pub done: bool,
    pub updated_at: DateTime<Utc>,
}

/// Reject empty content.
pub fn validate_content(content: &str) -> DomainResult<()> {
    if content.is_empty() {
        return Err(DomainError::InvalidInput("content must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let now = Utc::now();
        let entry = Entry::new("a1".to_string(), "Buy milk".to_string(), false, now);
        assert_eq!(entry.id(), "a1");
        assert_eq!(entry.key, 0.0);
        assert_eq!(entry.created_at, entry.updated_at);
        assert_eq!(entry.at_key(20.0).key, 20.0);
    }

    #[test]
    fn test_validate_content() {
        assert!(validate_content("x").is_ok());
        assert!(matches!(validate_content(""), Err(DomainError::InvalidInput(_))));
    }
}
