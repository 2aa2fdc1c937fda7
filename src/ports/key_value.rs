//! Key-Value Port - Platform Storage Interface
//!
//! The minimal async string store the roster is persisted through.
//! Mirrors the full surface mobile platforms expose as app-local
//! storage (get, set, remove): whole values addressed by a fixed key,
//! no partial updates. The roster flow itself only reads and writes.

use async_trait::async_trait;

/// Async string store addressed by key.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
  /// Read the value stored under `key`, `None` if the key was never written.
  async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;

  /// Replace the value stored under `key`.
  async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;

  /// Delete the value stored under `key`. Missing keys are not an error.
  async fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl KeyValueStore for Box<dyn KeyValueStore> {
  async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
    (**self).get_item(key).await
  }

  async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
    (**self).set_item(key, value).await
  }

  async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
    (**self).remove_item(key).await
  }
}
