//! Repository Port - Roster Persistence Interface
//!
//! Loads and saves the roster as a flat list of base records
//! (`name`, `money`, `bid = 0`). Saves overwrite the stored roster
//! wholesale; there is no incremental diff.

use async_trait::async_trait;

use crate::domain::player::BaseRecord;

/// Trait for roster persistence providers.
///
/// Failures are reported, never fatal: the controller logs them and
/// keeps the in-memory roster as the source of truth.
#[async_trait]
pub trait PlayerRepository: Send + Sync + 'static {
  /// Load the stored roster. `None` when nothing has been saved yet.
  async fn load(&self) -> anyhow::Result<Option<Vec<BaseRecord>>>;

  /// Overwrite the stored roster. Implementations must write `bid = 0`.
  async fn save(&self, records: &[BaseRecord]) -> anyhow::Result<()>;

  /// Check if the backing store is reachable, i.e. a read of the roster
  /// succeeds. Writability is only discovered on the next save.
  async fn is_healthy(&self) -> bool;
}
