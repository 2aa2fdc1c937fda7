//! Roster - Ordered Player Collection and Round Settlement
//!
//! Every update is a pure function over the prior roster: methods take
//! `&self` and hand back a new `Roster`, leaving the receiver untouched.
//!
//! Settlement rule for winner `w`:
//! - every other player `i` pays `bid[i]` into the pot and resets to 0
//! - `w` collects the pot; their own bid is zeroed without being charged
//!
//! Total money is conserved across a settlement.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::{BaseRecord, PlayerRecord};

/// Errors raised by roster updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("player index {index} out of range for roster of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("settling for player {winner_index} would overflow a balance")]
    Overflow { winner_index: usize },
}

/// Ordered sequence of players, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<PlayerRecord>,
}

impl Roster {
    /// Create a roster from an existing list of players.
    pub const fn new(players: Vec<PlayerRecord>) -> Self {
        Self { players }
    }

    /// Rebuild a roster from persisted records, keeping their order.
    pub fn from_base_records(records: Vec<BaseRecord>) -> Self {
        Self::new(records.into_iter().map(PlayerRecord::from).collect())
    }

    /// Persisted projection: `{name, money}` with every bid forced to 0.
    pub fn to_base_records(&self) -> Vec<BaseRecord> {
        self.players.iter().map(PlayerRecord::to_base).collect()
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlayerRecord> {
        self.players.get(index)
    }

    /// Sum of all balances.
    pub fn total_money(&self) -> i64 {
        self.players
            .iter()
            .fold(0i64, |acc, p| acc.saturating_add(p.money))
    }

    /// Sum of all open bids (the current pot, winner included).
    pub fn total_bids(&self) -> i64 {
        self.players
            .iter()
            .fold(0i64, |acc, p| acc.saturating_add(p.bid))
    }

    /// Sum of the bids a given winner would collect.
    pub fn losing_bids(&self, winner_index: usize) -> i64 {
        self.players
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != winner_index)
            .fold(0i64, |acc, (_, p)| acc.saturating_add(p.bid))
    }

    /// Append a player with the given starting money and a zero bid.
    ///
    /// Duplicate names are accepted as-is.
    #[must_use]
    pub fn add_player(&self, name: impl Into<String>, starting_money: i64) -> Self {
        let mut players = self.players.clone();
        players.push(PlayerRecord::new(name, starting_money));
        Self { players }
    }

    /// Drop every player whose name matches, preserving the order of the rest.
    #[must_use]
    pub fn remove_player(&self, name: &str) -> Self {
        let players = self
            .players
            .iter()
            .filter(|p| p.name != name)
            .cloned()
            .collect();
        Self { players }
    }

    /// `money[index] += delta`. No floor or ceiling beyond `i64` saturation.
    pub fn adjust_money(&self, index: usize, delta: i64) -> Result<Self, RosterError> {
        self.update_at(index, |p| p.money = p.money.saturating_add(delta))
    }

    /// `bid[index] += delta`. Negative bids are not rejected.
    pub fn adjust_bid(&self, index: usize, delta: i64) -> Result<Self, RosterError> {
        self.update_at(index, |p| p.bid = p.bid.saturating_add(delta))
    }

    /// Settle the open round in favour of `winner_index`.
    ///
    /// Afterwards every bid is 0 and `total_money()` is unchanged. A round
    /// whose pot or any resulting balance leaves the `i64` range is
    /// rejected with `RosterError::Overflow`.
    pub fn settle(&self, winner_index: usize) -> Result<Self, RosterError> {
        self.check_index(winner_index)?;

        let overflow = RosterError::Overflow { winner_index };
        let mut players = self.players.clone();
        let mut pot = 0i64;

        for (i, player) in players.iter_mut().enumerate() {
            if i == winner_index {
                continue;
            }
            pot = pot.checked_add(player.bid).ok_or_else(|| overflow.clone())?;
            player.money = player
                .money
                .checked_sub(player.bid)
                .ok_or_else(|| overflow.clone())?;
            player.bid = 0;
        }

        if let Some(winner) = players.get_mut(winner_index) {
            winner.money = winner.money.checked_add(pot).ok_or(overflow)?;
            winner.bid = 0;
        }

        Ok(Self { players })
    }

    fn update_at(
        &self,
        index: usize,
        update: impl FnOnce(&mut PlayerRecord),
    ) -> Result<Self, RosterError> {
        self.check_index(index)?;
        let mut players = self.players.clone();
        if let Some(player) = players.get_mut(index) {
            update(player);
        }
        Ok(Self { players })
    }

    fn check_index(&self, index: usize) -> Result<(), RosterError> {
        if index < self.players.len() {
            Ok(())
        } else {
            Err(RosterError::IndexOutOfRange {
                index,
                len: self.players.len(),
            })
        }
    }
}
