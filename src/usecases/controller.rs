//! Controller - Session State Machine
//!
//! Owns the roster for the lifetime of a session and is its only
//! mutator. External intents arrive one at a time through `dispatch`,
//! are applied as pure roster updates, and (for everything except bid
//! changes and the money lock) are followed by a save handed to the
//! `SaveQueue`.
//!
//! Lifecycle: `Uninitialized → Loading → Ready`. Intents are rejected
//! until `start` has seeded the roster from storage or defaults.
//!
//! Display layers bind to `subscribe()`, a `watch` channel carrying the
//! latest `RosterView` after every change.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::config::{AppConfig, SaveMode};
use crate::domain::intent::{Intent, NavigationParams};
use crate::domain::player::PlayerRecord;
use crate::domain::roster::{Roster, RosterError};
use crate::ports::repository::PlayerRepository;
use crate::usecases::save_queue::SaveQueue;

/// Controller lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControllerPhase {
  /// Constructed, storage not consulted yet.
  Uninitialized,
  /// Waiting on the initial load.
  Loading,
  /// Accepting intents.
  Ready,
}

/// Where the session roster came from at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSource {
  /// Adopted from storage.
  Stored,
  /// Nothing usable was stored; seeded from the configured defaults.
  Default,
}

/// Snapshot published to subscribers after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterView {
  pub players: Vec<PlayerRecord>,
  pub money_locked: bool,
  pub phase: ControllerPhase,
}

/// Reasons an intent was not applied. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
  #[error("controller not ready (phase {0:?})")]
  NotReady(ControllerPhase),
  #[error("controller already started")]
  AlreadyStarted,
  #[error("money is locked")]
  MoneyLocked,
  #[error(transparent)]
  Roster(#[from] RosterError),
}

/// Session controller over a roster repository.
pub struct Controller<R: PlayerRepository> {
  /// Persistence port, used directly only for the initial load.
  repo: Arc<R>,
  /// Off-path save dispatcher.
  saves: SaveQueue<R>,
  /// Roster seeded when storage has nothing usable.
  default_roster: Roster,
  /// Current session roster.
  roster: Roster,
  /// When set, money adjustments are rejected.
  money_locked: bool,
  phase: ControllerPhase,
  /// Publishes `RosterView` snapshots.
  view_tx: watch::Sender<RosterView>,
}

impl<R: PlayerRepository> Controller<R> {
  /// Create an uninitialized controller.
  ///
  /// Must be called from within a Tokio runtime (see `SaveQueue::new`).
  pub fn new(repo: Arc<R>, default_roster: Roster, save_mode: SaveMode) -> Self {
    let phase = ControllerPhase::Uninitialized;
    let (view_tx, _) = watch::channel(RosterView {
      players: Vec::new(),
      money_locked: false,
      phase,
    });

    Self {
      saves: SaveQueue::new(Arc::clone(&repo), save_mode),
      repo,
      default_roster,
      roster: Roster::default(),
      money_locked: false,
      phase,
      view_tx,
    }
  }

  /// Create a controller using the configured default roster and save mode.
  pub fn from_config(repo: Arc<R>, config: &AppConfig) -> Self {
    Self::new(
      repo,
      config.roster.default_roster(),
      config.persistence.save_mode,
    )
  }

  /// Subscribe to roster snapshots. The current value is available immediately.
  pub fn subscribe(&self) -> watch::Receiver<RosterView> {
    self.view_tx.subscribe()
  }

  pub fn view(&self) -> RosterView {
    RosterView {
      players: self.roster.players().to_vec(),
      money_locked: self.money_locked,
      phase: self.phase,
    }
  }

  pub const fn roster(&self) -> &Roster {
    &self.roster
  }

  pub const fn phase(&self) -> ControllerPhase {
    self.phase
  }

  pub const fn is_money_locked(&self) -> bool {
    self.money_locked
  }

  /// Load the stored roster, or seed the defaults, and become `Ready`.
  ///
  /// A failed or empty load is not an error: the controller falls back
  /// to the default roster and runs with whatever storage allows.
  #[instrument(skip(self))]
  pub async fn start(&mut self) -> Result<RosterSource, ControllerError> {
    if self.phase != ControllerPhase::Uninitialized {
      return Err(ControllerError::AlreadyStarted);
    }

    self.set_phase(ControllerPhase::Loading);

    let loaded = match self.repo.load().await {
      Ok(records) => records,
      Err(e) => {
        warn!(error = %e, "Failed to load roster, using defaults");
        None
      }
    };

    let source = match loaded {
      Some(records) if !records.is_empty() => {
        self.roster = Roster::from_base_records(records);
        RosterSource::Stored
      }
      _ => {
        self.roster = self.default_roster.clone();
        RosterSource::Default
      }
    };

    self.set_phase(ControllerPhase::Ready);

    info!(
      players = self.roster.len(),
      source = ?source,
      save_mode = ?self.saves.mode(),
      "Controller ready"
    );

    Ok(source)
  }

  /// Apply one intent.
  ///
  /// On error the roster and lock flag are left exactly as they were.
  #[instrument(skip(self), fields(kind = intent.kind()))]
  pub fn dispatch(&mut self, intent: Intent) -> Result<(), ControllerError> {
    if self.phase != ControllerPhase::Ready {
      debug!(phase = ?self.phase, "Intent rejected before ready");
      return Err(ControllerError::NotReady(self.phase));
    }

    let persists = intent.persists();

    let next = match intent {
      Intent::AddPlayer { name, money } => {
        info!(name = %name, money, "Adding player");
        self.roster.add_player(name, money)
      }
      Intent::RemovePlayer { name } => {
        let next = self.roster.remove_player(&name);
        info!(
          name = %name,
          removed = self.roster.len() - next.len(),
          "Removing player"
        );
        next
      }
      Intent::MoneyDelta { index, delta } => {
        if self.money_locked {
          debug!(index, delta, "Money adjustment rejected while locked");
          return Err(ControllerError::MoneyLocked);
        }
        self.roster.adjust_money(index, delta)?
      }
      Intent::BidDelta { index, delta } => self.roster.adjust_bid(index, delta)?,
      Intent::Won { winner_index } => {
        let next = self.roster.settle(winner_index)?;
        info!(
          winner = winner_index,
          collected = self.roster.losing_bids(winner_index),
          "Round settled"
        );
        next
      }
      Intent::ToggleMoneyLock => {
        self.money_locked = !self.money_locked;
        info!(locked = self.money_locked, "Money lock toggled");
        self.publish();
        return Ok(());
      }
    };

    self.roster = next;
    self.publish();

    if persists {
      self.saves.submit(self.roster.to_base_records());
    }

    Ok(())
  }

  /// Interpret navigation parameters and dispatch the resulting intent.
  ///
  /// Returns `Ok(false)` when the parameters carry no actionable request.
  pub fn apply_params(&mut self, params: NavigationParams) -> Result<bool, ControllerError> {
    match params.into_intent() {
      Some(intent) => self.dispatch(intent).map(|()| true),
      None => {
        debug!("Navigation params carry no intent");
        Ok(false)
      }
    }
  }

  /// Flush pending saves and stop the writer.
  pub async fn shutdown(self) {
    info!(players = self.roster.len(), "Controller shutting down");
    self.saves.shutdown().await;
  }

  fn set_phase(&mut self, phase: ControllerPhase) {
    self.phase = phase;
    self.publish();
  }

  fn publish(&self) {
    self.view_tx.send_replace(self.view());
  }
}
