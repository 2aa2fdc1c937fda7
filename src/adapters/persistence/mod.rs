//! Persistence Adapters - Key-Value Roster Storage
//!
//! Implements the `KeyValueStore` port on the filesystem (atomic
//! one-file-per-key writes) and in memory, and the `PlayerRepository`
//! port as a JSON roster stored under a single key.

pub mod file_store;
pub mod memory_store;
pub mod roster_repository;

pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
pub use roster_repository::{DEFAULT_STORAGE_KEY, RosterRepository};
