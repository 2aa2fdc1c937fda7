//! Integration Tests - Controller Against Mocked and Real Storage
//!
//! Tests the interaction between the controller, the save queue and the
//! persistence port. Uses mockall for the repository port and
//! tokio::test for async tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mockall::mock;

use bid_ledger::adapters::persistence::{FileKeyValueStore, MemoryKeyValueStore, RosterRepository};
use bid_ledger::config::{AppConfig, SaveMode};
use bid_ledger::domain::intent::{Intent, NavigationParams};
use bid_ledger::domain::player::{BaseRecord, PlayerRecord};
use bid_ledger::domain::roster::Roster;
use bid_ledger::ports::repository::PlayerRepository;
use bid_ledger::usecases::{Controller, ControllerError, RosterSource};

// ---- Mock Definitions ----

mock! {
    pub Repo {}

    #[async_trait::async_trait]
    impl PlayerRepository for Repo {
        async fn load(&self) -> anyhow::Result<Option<Vec<BaseRecord>>>;
        async fn save(&self, records: &[BaseRecord]) -> anyhow::Result<()>;
        async fn is_healthy(&self) -> bool;
    }
}

type SaveLog = Arc<Mutex<Vec<Vec<BaseRecord>>>>;

/// A mock whose `save` calls are recorded into the returned log.
fn recording_repo(load: fn() -> anyhow::Result<Option<Vec<BaseRecord>>>) -> (MockRepo, SaveLog) {
    let log: SaveLog = Arc::new(Mutex::new(Vec::new()));
    let mut repo = MockRepo::new();

    repo.expect_load().returning(load);

    let sink = Arc::clone(&log);
    repo.expect_save().returning(move |records| {
        sink.lock().unwrap().push(records.to_vec());
        Ok(())
    });

    (repo, log)
}

fn base(name: &str, money: i64) -> BaseRecord {
    BaseRecord {
        name: name.to_string(),
        money,
        bid: 0,
    }
}

// ---- Integration Tests ----

#[tokio::test]
async fn test_load_failure_falls_back_to_default_roster() {
    let (repo, log) = recording_repo(|| Err(anyhow::anyhow!("storage offline")));
    let mut controller = Controller::from_config(Arc::new(repo), &AppConfig::default());

    let source = controller.start().await.unwrap();
    assert_eq!(source, RosterSource::Default);
    assert_eq!(
        controller.roster().players(),
        &[PlayerRecord::new("Alice", 100), PlayerRecord::new("Bob", 150)]
    );

    controller.shutdown().await;
    assert!(log.lock().unwrap().is_empty(), "startup must not save");
}

#[tokio::test]
async fn test_empty_stored_roster_falls_back_to_default() {
    let (repo, _log) = recording_repo(|| Ok(Some(Vec::new())));
    let mut controller = Controller::from_config(Arc::new(repo), &AppConfig::default());
    assert_eq!(controller.start().await.unwrap(), RosterSource::Default);
    assert_eq!(controller.roster().len(), 2);
}

#[tokio::test]
async fn test_bid_changes_never_reach_storage() {
    let (repo, log) = recording_repo(|| Ok(None));
    let mut controller = Controller::new(
        Arc::new(repo),
        Roster::new(vec![PlayerRecord::new("Alice", 100)]),
        SaveMode::Detached,
    );
    controller.start().await.unwrap();

    for _ in 0..5 {
        controller
            .dispatch(Intent::BidDelta { index: 0, delta: 1 })
            .unwrap();
    }
    controller.dispatch(Intent::ToggleMoneyLock).unwrap();
    assert_eq!(controller.roster().players()[0].bid, 5);

    controller.shutdown().await;
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_every_persisting_intent_saves_with_zero_bids() {
    let (repo, log) = recording_repo(|| Ok(None));
    let mut controller = Controller::new(
        Arc::new(repo),
        Roster::new(vec![PlayerRecord::new("Alice", 100), PlayerRecord::new("Bob", 150)]),
        SaveMode::Detached,
    );
    controller.start().await.unwrap();

    controller.dispatch(Intent::BidDelta { index: 0, delta: 30 }).unwrap();
    controller.dispatch(Intent::BidDelta { index: 1, delta: 20 }).unwrap();
    controller.dispatch(Intent::MoneyDelta { index: 1, delta: 1 }).unwrap();
    controller.dispatch(Intent::Won { winner_index: 0 }).unwrap();
    controller
        .dispatch(Intent::AddPlayer { name: "Carol".to_string(), money: 200 })
        .unwrap();
    controller
        .dispatch(Intent::RemovePlayer { name: "Bob".to_string() })
        .unwrap();

    controller.shutdown().await;

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 4);
    assert!(log.iter().flatten().all(|r| r.bid == 0));
    assert!(
        log.contains(&vec![base("Alice", 100), base("Bob", 151)]),
        "money delta saved while bids were open, bids written as 0"
    );
    assert!(log.contains(&vec![base("Alice", 120), base("Bob", 131)]));
    assert!(log.contains(&vec![base("Alice", 120), base("Carol", 200)]));
}

#[tokio::test]
async fn test_save_failure_is_not_fatal() {
    let mut repo = MockRepo::new();
    repo.expect_load().returning(|| Ok(None));
    repo.expect_save()
        .returning(|_| Err(anyhow::anyhow!("disk full")));

    let mut controller = Controller::from_config(Arc::new(repo), &AppConfig::default());
    controller.start().await.unwrap();

    controller.dispatch(Intent::MoneyDelta { index: 0, delta: 10 }).unwrap();
    controller.dispatch(Intent::MoneyDelta { index: 0, delta: 10 }).unwrap();
    assert_eq!(controller.roster().players()[0].money, 120);

    controller.shutdown().await;
}

#[tokio::test]
async fn test_locked_money_rejects_without_saving() {
    let (repo, log) = recording_repo(|| Ok(None));
    let mut controller = Controller::from_config(Arc::new(repo), &AppConfig::default());
    controller.start().await.unwrap();

    controller.dispatch(Intent::ToggleMoneyLock).unwrap();
    assert_eq!(
        controller.dispatch(Intent::MoneyDelta { index: 0, delta: 5 }),
        Err(ControllerError::MoneyLocked)
    );

    controller.shutdown().await;
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_session_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default();

    // First session: play a round, add a player.
    {
        let store = FileKeyValueStore::new(dir.path()).await.unwrap();
        let repo = Arc::new(RosterRepository::new(store));
        let mut controller = Controller::from_config(repo, &config);
        assert_eq!(controller.start().await.unwrap(), RosterSource::Default);

        controller.dispatch(Intent::BidDelta { index: 0, delta: 30 }).unwrap();
        controller.dispatch(Intent::BidDelta { index: 1, delta: 20 }).unwrap();
        controller.dispatch(Intent::Won { winner_index: 1 }).unwrap();

        let params = NavigationParams {
            kind: Some("add".to_string()),
            name: Some("Carol".to_string()),
            money: Some("200".to_string()),
        };
        assert!(controller.apply_params(params).unwrap());

        // Open bids are session-local.
        controller.dispatch(Intent::BidDelta { index: 2, delta: 9 }).unwrap();
        controller.shutdown().await;
    }

    // Second session: money and names survive, bids do not.
    let store = FileKeyValueStore::new(dir.path()).await.unwrap();
    let repo = Arc::new(RosterRepository::new(store));
    let mut controller = Controller::from_config(repo, &config);
    assert_eq!(controller.start().await.unwrap(), RosterSource::Stored);
    assert_eq!(
        controller.roster().players(),
        &[
            PlayerRecord::new("Alice", 70),
            PlayerRecord::new("Bob", 180),
            PlayerRecord::new("Carol", 200),
        ]
    );
}

#[tokio::test]
async fn test_serialized_saves_end_with_latest_roster() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::new(dir.path()).await.unwrap();
    let repo = Arc::new(RosterRepository::new(store));

    let mut controller = Controller::new(
        Arc::clone(&repo),
        Roster::new(vec![PlayerRecord::new("Alice", 0)]),
        SaveMode::Serialized,
    );
    controller.start().await.unwrap();

    for _ in 0..100 {
        controller
            .dispatch(Intent::MoneyDelta { index: 0, delta: 1 })
            .unwrap();
    }
    controller.shutdown().await;

    let stored = repo.load().await.unwrap().unwrap();
    assert_eq!(stored, vec![base("Alice", 100)]);
}

#[tokio::test]
async fn test_detached_save_lands_after_controller_dropped() {
    let repo = Arc::new(RosterRepository::new(MemoryKeyValueStore::new()));
    let mut controller = Controller::new(
        Arc::clone(&repo),
        Roster::new(vec![PlayerRecord::new("Alice", 0)]),
        SaveMode::Detached,
    );
    controller.start().await.unwrap();
    controller
        .dispatch(Intent::MoneyDelta { index: 0, delta: 5 })
        .unwrap();
    drop(controller);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let stored = repo.load().await.unwrap();
    assert_eq!(stored, Some(vec![base("Alice", 5)]));
}
