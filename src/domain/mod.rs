//! Domain Layer
//!
//! Contains the entry entity, core abstractions and the ordering rules.
//! This layer does no I/O.

mod entity;
mod entry;
pub mod ordering;

pub use entity::{Entity, DomainError, DomainResult, ErrorKind};
pub use entry::{validate_content, Entry, EntryPatch};
