//! Use Cases Layer - Application Logic
//!
//! Orchestrates domain updates with the persistence port.
//!
//! Use cases:
//! - `Controller`: Session state machine; applies intents, publishes views
//! - `SaveQueue`: Off-path roster saves (detached or single-writer)

pub mod controller;
pub mod save_queue;

pub use controller::{Controller, ControllerError, ControllerPhase, RosterSource, RosterView};
pub use save_queue::SaveQueue;
