//! Service Layer
//!
//! Orchestrates validation, ordering rules and storage for entries.

mod entry_service;

pub use entry_service::{EntryList, EntryService, Page};
