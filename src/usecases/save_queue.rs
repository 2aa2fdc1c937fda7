//! Save Queue - Off-Path Roster Persistence
//!
//! Carries roster saves away from the intent-processing path so a slow
//! or failing store never blocks the next intent. Two strategies:
//!
//! - `Detached`: one spawned task per save. Overlapping saves may
//!   complete out of order; whichever lands last wins. Dropping the
//!   queue detaches its tasks rather than aborting them.
//! - `Serialized`: a single writer task fed through a one-slot
//!   `watch` channel. Rapid submissions coalesce and the most recently
//!   submitted roster is always the last one written.
//!
//! Save failures are logged and dropped. The in-memory roster stays
//! the source of truth for the session.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SaveMode;
use crate::domain::player::BaseRecord;
use crate::ports::repository::PlayerRepository;

/// Persistence dispatcher owned by the controller.
pub struct SaveQueue<R: PlayerRepository> {
  repo: Arc<R>,
  inner: Inner,
}

enum Inner {
  Detached {
    in_flight: Vec<JoinHandle<()>>,
  },
  Serialized {
    slot: watch::Sender<Option<Vec<BaseRecord>>>,
    writer: JoinHandle<()>,
  },
}

impl<R: PlayerRepository> SaveQueue<R> {
  /// Create a queue for the given strategy.
  ///
  /// Must be called from within a Tokio runtime: the serialized
  /// strategy spawns its writer task immediately.
  pub fn new(repo: Arc<R>, mode: SaveMode) -> Self {
    let inner = match mode {
      SaveMode::Detached => Inner::Detached {
        in_flight: Vec::new(),
      },
      SaveMode::Serialized => {
        let (slot, rx) = watch::channel(None);
        let writer = tokio::spawn(run_writer(Arc::clone(&repo), rx));
        Inner::Serialized { slot, writer }
      }
    };

    Self { repo, inner }
  }

  pub const fn mode(&self) -> SaveMode {
    match self.inner {
      Inner::Detached { .. } => SaveMode::Detached,
      Inner::Serialized { .. } => SaveMode::Serialized,
    }
  }

  /// Hand a roster snapshot off for saving. Never waits on the store.
  pub fn submit(&mut self, records: Vec<BaseRecord>) {
    match &mut self.inner {
      Inner::Detached { in_flight } => {
        in_flight.retain(|handle| !handle.is_finished());

        let repo = Arc::clone(&self.repo);
        in_flight.push(tokio::spawn(async move {
          save_logged(repo.as_ref(), &records).await;
        }));
      }
      Inner::Serialized { slot, .. } => {
        // send_replace never fails, even if the writer has exited.
        slot.send_replace(Some(records));
      }
    }
  }

  /// Wait for every submitted save to finish, then stop the writer.
  pub async fn shutdown(self) {
    match self.inner {
      Inner::Detached { in_flight } => {
        let pending = in_flight.len();
        for handle in in_flight {
          if let Err(e) = handle.await {
            warn!(error = %e, "Save task panicked");
          }
        }
        debug!(pending, "Detached saves drained");
      }
      Inner::Serialized { slot, writer } => {
        drop(slot);
        if let Err(e) = writer.await {
          warn!(error = %e, "Roster writer task panicked");
        }
      }
    }
    info!("Save queue stopped");
  }
}

/// Single writer loop: always saves the latest value in the slot.
async fn run_writer<R: PlayerRepository>(
  repo: Arc<R>,
  mut rx: watch::Receiver<Option<Vec<BaseRecord>>>,
) {
  // An unseen value is still delivered after the sender is dropped,
  // so the final submission is written before the loop ends.
  while rx.changed().await.is_ok() {
    let pending = rx.borrow_and_update().clone();
    if let Some(records) = pending {
      save_logged(repo.as_ref(), &records).await;
    }
  }
  debug!("Roster writer exiting");
}

async fn save_logged<R: PlayerRepository>(repo: &R, records: &[BaseRecord]) {
  if let Err(e) = repo.save(records).await {
    warn!(
      error = %e,
      players = records.len(),
      "Failed to save roster, keeping in-memory state"
    );
  }
}
