//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config: AppConfig = toml::from_str(&content)
    .with_context(|| format!("Failed to parse {}", path.display()))?;

  validate_config(&config)?;

  Ok(config)
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
///
/// A file that exists but is invalid is still an error.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
  if Path::new(path).exists() {
    load_config(path)
  } else {
    Ok(AppConfig::default())
  }
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty storage location
/// - A usable default roster (non-empty, named, unique)
pub fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.persistence.data_dir.trim().is_empty(),
    "persistence.data_dir must not be empty"
  );
  anyhow::ensure!(
    !config.persistence.storage_key.is_empty(),
    "persistence.storage_key must not be empty"
  );

  anyhow::ensure!(
    !config.roster.default_players.is_empty(),
    "At least one default player must be configured"
  );

  let mut seen = HashSet::new();
  for (i, player) in config.roster.default_players.iter().enumerate() {
    anyhow::ensure!(
      !player.name.trim().is_empty(),
      "Default player {} has an empty name",
      i
    );
    anyhow::ensure!(
      seen.insert(player.name.as_str()),
      "Default player name {} is duplicated",
      player.name
    );
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::DefaultPlayer;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_load_or_default_without_file() {
    let config = load_or_default("definitely-missing-config.toml").unwrap();
    assert_eq!(config.roster.default_players.len(), 2);
  }

  #[test]
  fn test_load_full_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      r#"
        [app]
        name = "friday-night"
        log_format = "json"

        [persistence]
        data_dir = "/tmp/ledger"
        storage_key = "friday"

        [[roster.default_players]]
        name = "Zed"
        money = 500
      "#,
    )
    .unwrap();

    let config = load_config(path.to_str().unwrap()).unwrap();
    assert_eq!(config.app.name, "friday-night");
    assert_eq!(config.persistence.storage_key, "friday");
    assert_eq!(
      config.roster.default_players,
      vec![DefaultPlayer {
        name: "Zed".to_string(),
        money: 500
      }]
    );
  }

  #[test]
  fn test_invalid_file_is_error_even_with_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[persistence]\nsave_mode = \"sometimes\"\n").unwrap();
    assert!(load_or_default(path.to_str().unwrap()).is_err());
  }

  #[test]
  fn test_rejects_duplicate_default_names() {
    let mut config = AppConfig::default();
    config.roster.default_players.push(DefaultPlayer {
      name: "Alice".to_string(),
      money: 1,
    });
    assert!(validate_config(&config).is_err());
  }

  #[test]
  fn test_rejects_empty_roster_and_key() {
    let mut config = AppConfig::default();
    config.roster.default_players.clear();
    assert!(validate_config(&config).is_err());

    let mut config = AppConfig::default();
    config.persistence.storage_key.clear();
    assert!(validate_config(&config).is_err());
  }
}
