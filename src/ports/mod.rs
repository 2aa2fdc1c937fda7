//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `KeyValueStore`: Durable string storage addressed by key
//! - `PlayerRepository`: Roster load/save (base records only)

pub mod key_value;
pub mod repository;
