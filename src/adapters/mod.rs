//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies, plus the console front-end.
//!
//! Adapter categories:
//! - `persistence`: File and in-memory key-value stores, JSON roster repository
//! - `console`: Line command parsing and roster rendering

pub mod console;
pub mod persistence;
