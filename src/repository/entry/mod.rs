//! Entry Repository Module
//!
//! - entry_repo: Core CRUD operations
//! - entry_positioning: Key assignment, moves and renormalization

mod entry_repo;
mod entry_positioning;

pub use entry_repo::EntryRepository;
