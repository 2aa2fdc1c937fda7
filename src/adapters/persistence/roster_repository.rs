//! Roster Repository - Concrete Adapter for the PlayerRepository Port
//!
//! Encodes the roster as a JSON array of `{"name", "money", "bid"}`
//! objects and stores it under a single fixed key of any
//! `KeyValueStore`. The usecases layer only knows about the
//! `PlayerRepository` trait, never about keys or JSON.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::domain::player::BaseRecord;
use crate::ports::key_value::KeyValueStore;
use crate::ports::repository::PlayerRepository;

/// Default storage key for the roster.
pub const DEFAULT_STORAGE_KEY: &str = "@players_data";

/// Roster persistence over a key-value store.
pub struct RosterRepository<K: KeyValueStore> {
    /// Backing store.
    store: K,
    /// Key the whole roster lives under.
    key: String,
}

impl<K: KeyValueStore> RosterRepository<K> {
    /// Create a repository using the default storage key.
    pub fn new(store: K) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Create a repository using a custom storage key.
    pub fn with_key(store: K, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn store(&self) -> &K {
        &self.store
    }
}

#[async_trait]
impl<K: KeyValueStore> PlayerRepository for RosterRepository<K> {
    #[instrument(skip(self), fields(key = %self.key))]
    async fn load(&self) -> Result<Option<Vec<BaseRecord>>> {
        let Some(raw) = self.store.get_item(&self.key).await? else {
            info!("No stored roster found");
            return Ok(None);
        };

        if raw.trim().is_empty() {
            warn!("Stored roster is empty, ignoring");
            return Ok(None);
        }

        let records: Vec<BaseRecord> =
            serde_json::from_str(&raw).context("Failed to parse stored roster JSON")?;

        info!(players = records.len(), "Roster loaded");
        Ok(Some(records))
    }

    #[instrument(skip(self, records), fields(key = %self.key, players = records.len()))]
    async fn save(&self, records: &[BaseRecord]) -> Result<()> {
        let to_save: Vec<BaseRecord> = records
            .iter()
            .map(|r| BaseRecord {
                name: r.name.clone(),
                money: r.money,
                bid: 0,
            })
            .collect();

        let json = serde_json::to_string(&to_save).context("Failed to serialize roster")?;

        self.store
            .set_item(&self.key, &json)
            .await
            .context("Failed to write roster")?;

        info!("Roster saved");
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        self.store.get_item(&self.key).await.is_ok()
    }
}
