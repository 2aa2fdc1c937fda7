//! Player domain types.
//!
//! Defines the in-memory player record and the persisted base record.
//! Money and bid are plain signed integers: negative values are allowed
//! and no validation layer sits in front of them.

use serde::{Deserialize, Serialize};

/// A single player as tracked during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Display name. Expected to be unique within a roster, not enforced.
    pub name: String,
    /// Current balance. May go negative.
    pub money: i64,
    /// Current bid for the open round. Session-local, never persisted.
    pub bid: i64,
}

impl PlayerRecord {
    /// Create a player with a zero bid.
    pub fn new(name: impl Into<String>, money: i64) -> Self {
        Self {
            name: name.into(),
            money,
            bid: 0,
        }
    }

    /// Project onto the persisted shape. The bid is always written as 0.
    pub fn to_base(&self) -> BaseRecord {
        BaseRecord {
            name: self.name.clone(),
            money: self.money,
            bid: 0,
        }
    }
}

/// Persisted player shape: `{"name": .., "money": .., "bid": 0}`.
///
/// `bid` is carried for format compatibility only. Records written by
/// older stores may omit it, in which case it defaults to 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRecord {
    pub name: String,
    pub money: i64,
    #[serde(default)]
    pub bid: i64,
}

impl From<BaseRecord> for PlayerRecord {
    fn from(record: BaseRecord) -> Self {
        Self {
            name: record.name,
            money: record.money,
            bid: record.bid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base_forces_zero_bid() {
        let player = PlayerRecord {
            name: "Alice".to_string(),
            money: 100,
            bid: 25,
        };
        let base = player.to_base();
        assert_eq!(base.name, "Alice");
        assert_eq!(base.money, 100);
        assert_eq!(base.bid, 0);
    }

    #[test]
    fn test_base_record_missing_bid_defaults_to_zero() {
        let base: BaseRecord = serde_json::from_str(r#"{"name":"Bob","money":150}"#).unwrap();
        assert_eq!(base.bid, 0);
        let player = PlayerRecord::from(base);
        assert_eq!(player, PlayerRecord::new("Bob", 150));
    }

    #[test]
    fn test_base_record_wire_shape() {
        let json = serde_json::to_string(&PlayerRecord::new("Carol", -5).to_base()).unwrap();
        assert_eq!(json, r#"{"name":"Carol","money":-5,"bid":0}"#);
    }
}
