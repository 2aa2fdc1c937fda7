//! Configuration Module - TOML-based Ledger Configuration
//!
//! Loads and validates configuration from `config.toml`. Every section
//! has defaults, so an absent file or a partial file both work. The
//! default roster lives here rather than in the domain layer.

pub mod loader;

use serde::Deserialize;

use crate::domain::player::PlayerRecord;
use crate::domain::roster::Roster;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Identity and logging.
  pub app: AppSection,
  /// Storage location and save strategy.
  pub persistence: PersistenceConfig,
  /// Roster seeded when nothing is stored.
  pub roster: RosterConfig,
}

/// Identity and logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
  /// Human-readable instance name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
  /// Log output format.
  pub log_format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  /// Compact human-readable lines.
  #[default]
  Pretty,
  /// One JSON object per line.
  Json,
}

/// How saves are carried off the event path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
  /// One spawned task per save. Overlapping saves may land out of order.
  Detached,
  /// Single writer fed through a one-slot queue; the last issued roster wins.
  #[default]
  Serialized,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
  /// Directory for the key-value files.
  pub data_dir: String,
  /// Key the roster is stored under.
  pub storage_key: String,
  /// Save strategy.
  pub save_mode: SaveMode,
}

/// Default roster configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
  /// Players seeded when the store is empty or unreadable.
  pub default_players: Vec<DefaultPlayer>,
}

/// A seeded player.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefaultPlayer {
  pub name: String,
  pub money: i64,
}

impl RosterConfig {
  /// Build the fallback roster.
  pub fn default_roster(&self) -> Roster {
    Roster::new(
      self
        .default_players
        .iter()
        .map(|p| PlayerRecord::new(p.name.clone(), p.money))
        .collect(),
    )
  }
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
      log_format: LogFormat::default(),
    }
  }
}

impl Default for PersistenceConfig {
  fn default() -> Self {
    Self {
      data_dir: default_data_dir(),
      storage_key: default_storage_key(),
      save_mode: SaveMode::default(),
    }
  }
}

impl Default for RosterConfig {
  fn default() -> Self {
    Self {
      default_players: default_players(),
    }
  }
}

// Default value functions

fn default_name() -> String {
  "bid-ledger".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_data_dir() -> String {
  "data".to_string()
}

fn default_storage_key() -> String {
  crate::adapters::persistence::DEFAULT_STORAGE_KEY.to_string()
}

fn default_players() -> Vec<DefaultPlayer> {
  vec![
    DefaultPlayer {
      name: "Alice".to_string(),
      money: 100,
    },
    DefaultPlayer {
      name: "Bob".to_string(),
      money: 150,
    },
  ]
}
