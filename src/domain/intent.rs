//! Intents - Discrete State Change Requests
//!
//! An `Intent` is the only way state changes reach the controller.
//! `NavigationParams` models the loose string bag the navigation layer
//! hands over when the add/remove screens return to the scoreboard.

use serde::{Deserialize, Serialize};

/// A named request to mutate session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Append a player with a starting balance.
    AddPlayer { name: String, money: i64 },
    /// Remove every player with this name.
    RemovePlayer { name: String },
    /// Adjust a player's balance. Rejected while money is locked.
    MoneyDelta { index: usize, delta: i64 },
    /// Adjust a player's bid. Session-local.
    BidDelta { index: usize, delta: i64 },
    /// Settle the open round in favour of a player.
    Won { winner_index: usize },
    /// Flip the money lock.
    ToggleMoneyLock,
}

impl Intent {
    /// Whether applying this intent should be followed by a save.
    pub const fn persists(&self) -> bool {
        matches!(
            self,
            Self::AddPlayer { .. }
                | Self::RemovePlayer { .. }
                | Self::MoneyDelta { .. }
                | Self::Won { .. }
        )
    }

    /// Short label for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddPlayer { .. } => "add_player",
            Self::RemovePlayer { .. } => "remove_player",
            Self::MoneyDelta { .. } => "money_delta",
            Self::BidDelta { .. } => "bid_delta",
            Self::Won { .. } => "won",
            Self::ToggleMoneyLock => "toggle_money_lock",
        }
    }
}

/// Raw navigation parameters, e.g. `{type: "add", name: "Carol", money: "200"}`.
///
/// All fields arrive as optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub money: Option<String>,
}

impl NavigationParams {
    /// Interpret the parameter bag.
    ///
    /// `add` needs a non-empty name and non-empty money text; `remove`
    /// needs a non-empty name. Anything else yields `None`.
    pub fn into_intent(self) -> Option<Intent> {
        let name = self.name.filter(|n| !n.is_empty())?;

        match self.kind.as_deref() {
            Some("add") => {
                let money = self.money.filter(|m| !m.is_empty())?;
                Some(Intent::AddPlayer {
                    name,
                    money: parse_money(&money),
                })
            }
            Some("remove") => Some(Intent::RemovePlayer { name }),
            _ => None,
        }
    }
}

/// Parse money text into an integer, coercing anything unparsable to 0.
///
/// Reads an optional sign and the leading run of digits, ignoring
/// whatever follows: `"12.5"` is 12 and `"200abc"` is 200. Values past
/// the `i64` range clamp to its bounds.
pub fn parse_money(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return 0;
    }

    let magnitude = &rest[..digits];
    let signed = if negative {
        format!("-{magnitude}")
    } else {
        magnitude.to_string()
    };

    signed
        .parse()
        .unwrap_or(if negative { i64::MIN } else { i64::MAX })
}
