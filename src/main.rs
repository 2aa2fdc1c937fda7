//! Bid Ledger - Console Entry Point
//!
//! Drives the ledger core from stdin. Runs until `quit`, EOF or SIGINT.
//!
//! Wiring sequence:
//! 1. Load config (first CLI arg, `BID_LEDGER_CONFIG`, or `config.toml`)
//! 2. Init tracing (stderr; JSON or compact)
//! 3. Open the file key-value store (falls back to memory if unusable)
//! 4. Build RosterRepository + Controller, load or seed the roster
//! 5. Read commands, dispatch intents, print the roster on every change
//! 6. On exit, flush the pending save

use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use bid_ledger::adapters::console::{self, ConsoleCommand};
use bid_ledger::adapters::persistence::{FileKeyValueStore, MemoryKeyValueStore, RosterRepository};
use bid_ledger::config::{self, AppConfig, LogFormat};
use bid_ledger::ports::key_value::KeyValueStore;
use bid_ledger::ports::repository::PlayerRepository;
use bid_ledger::usecases::{Controller, RosterView};

type Repo = RosterRepository<Box<dyn KeyValueStore>>;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BID_LEDGER_CONFIG").ok())
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_or_default(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize logging ───────────────────────────────
    init_tracing(&config);

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        save_mode = ?config.persistence.save_mode,
        "Starting bid ledger"
    );

    // ── 3. Open storage ─────────────────────────────────────
    let store: Box<dyn KeyValueStore> =
        match FileKeyValueStore::new(&config.persistence.data_dir).await {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!(error = %e, "Storage unavailable, running session-only");
                Box::new(MemoryKeyValueStore::new())
            }
        };
    let repo = Arc::new(RosterRepository::with_key(
        store,
        config.persistence.storage_key.clone(),
    ));
    if !repo.is_healthy().await {
        warn!("Roster storage is not readable, saves may fail");
    }

    // ── 4. Controller ───────────────────────────────────────
    let mut controller = Controller::from_config(repo, &config);
    controller
        .start()
        .await
        .context("Failed to start controller")?;

    let mut view_rx = controller.subscribe();
    println!("{}", console::render_roster(&view_rx.borrow_and_update()));
    println!("type `help` for commands");

    // ── 5. Command loop ─────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            biased;
            _ = signal::ctrl_c() => {
                info!("SIGINT received, shutting down");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if handle_line(&mut controller, &mut view_rx, &line).is_break() {
                        break;
                    }
                }
                Ok(None) => {
                    info!("Input closed, shutting down");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Failed to read input");
                    break;
                }
            },
        }
    }

    // ── 6. Flush and exit ───────────────────────────────────
    controller.shutdown().await;
    info!("Shutdown complete");
    Ok(())
}

/// Parse and apply one input line, printing the roster if it changed.
fn handle_line(
    controller: &mut Controller<Repo>,
    view_rx: &mut watch::Receiver<RosterView>,
    line: &str,
) -> ControlFlow<()> {
    let command = match console::parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return ControlFlow::Continue(()),
        Err(e) => {
            debug!(error = %e, line, "Unparsable command");
            println!("{e}");
            return ControlFlow::Continue(());
        }
    };

    match command {
        ConsoleCommand::Dispatch(intent) => {
            if let Err(e) = controller.dispatch(intent) {
                warn!(error = %e, "Intent not applied");
                println!("{e}");
            }
        }
        ConsoleCommand::List => {
            println!("{}", console::render_roster(&controller.view()));
            return ControlFlow::Continue(());
        }
        ConsoleCommand::Help => {
            println!("{}", console::HELP);
            return ControlFlow::Continue(());
        }
        ConsoleCommand::Quit => return ControlFlow::Break(()),
    }

    if view_rx.has_changed().unwrap_or(false) {
        println!("{}", console::render_roster(&view_rx.borrow_and_update()));
    }
    ControlFlow::Continue(())
}

/// Structured logging to stderr. `RUST_LOG` overrides the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.app.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.app.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.compact().init(),
    }
}
