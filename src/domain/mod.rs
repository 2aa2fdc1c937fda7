//! Domain layer - Players, rosters and intents.
//!
//! Pure state and update rules for the bid ledger. No I/O here
//! (hexagonal architecture inner ring); everything is testable in isolation.

pub mod intent;
pub mod player;
pub mod roster;

// Re-export core types for convenience
pub use intent::{Intent, NavigationParams, parse_money};
pub use player::{BaseRecord, PlayerRecord};
pub use roster::{Roster, RosterError};
