//! Storage traits and implementations
//!
//! This module defines the persistence layer for mailbox entities. The
//! trait-based design allows swapping between in-memory and SQLite
//! backends; [`EntityStore`] holds the loaded collections on top of either.

mod entity;
mod memory;
mod sqlite;
mod traits;

pub use entity::{DEFAULT_SIGNATURE, EntityStore};
pub use memory::InMemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;
pub use traits::{KeyValueStore, keys, load_collection, load_value, save_collection, save_value};
