//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod entry;

#[cfg(test)]
mod tests;

pub use traits::{EntryPositioningOperations, EntryStore, Reposition, Repository};
pub use db::{init_db, open_repository};
pub use entry::EntryRepository;
