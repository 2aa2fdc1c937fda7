//! Console Adapter - Line Commands In, Roster Table Out
//!
//! Stands in for the scoreboard screens: each typed line becomes an
//! `Intent` (or a host action) and the current `RosterView` is rendered
//! as a plain-text table.
//!
//! Commands:
//! - `add <name> <money>`   add a player (money text coerced, bad text -> 0)
//! - `remove <name>`        remove every player with that name
//! - `money <index> <delta>`
//! - `bid <index> <delta>`
//! - `won <index>`          settle the round
//! - `lock`                 toggle the money lock
//! - `list`, `help`, `quit`

use std::fmt::Write as _;

use thiserror::Error;

use crate::domain::intent::{Intent, NavigationParams};
use crate::usecases::controller::RosterView;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Forward to the controller.
    Dispatch(Intent),
    /// Print the roster.
    List,
    /// Print usage.
    Help,
    /// Flush and exit.
    Quit,
}

/// Reasons a console line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
commands:
  add <name> <money>     add a player
  remove <name>          remove every player with that name
  money <index> <delta>  adjust a balance (blocked while locked)
  bid <index> <delta>    adjust a bid
  won <index>            settle the round for a player
  lock                   toggle the money lock
  list                   show the roster
  quit                   save and exit";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => {
            // The last word is the money text; the rest is the name.
            let (money, name) = args
                .split_last()
                .filter(|(_, name)| !name.is_empty())
                .ok_or(CommandError::Usage("add <name> <money>"))?;
            let params = NavigationParams {
                kind: Some("add".to_string()),
                name: Some(name.join(" ")),
                money: Some((*money).to_string()),
            };
            let intent = params
                .into_intent()
                .ok_or(CommandError::Usage("add <name> <money>"))?;
            ConsoleCommand::Dispatch(intent)
        }
        "remove" => {
            let params = NavigationParams {
                kind: Some("remove".to_string()),
                name: Some(args.join(" ")),
                money: None,
            };
            let intent = params
                .into_intent()
                .ok_or(CommandError::Usage("remove <name>"))?;
            ConsoleCommand::Dispatch(intent)
        }
        "money" => {
            let (index, delta) = index_and_delta(&args, "money <index> <delta>")?;
            ConsoleCommand::Dispatch(Intent::MoneyDelta { index, delta })
        }
        "bid" => {
            let (index, delta) = index_and_delta(&args, "bid <index> <delta>")?;
            ConsoleCommand::Dispatch(Intent::BidDelta { index, delta })
        }
        "won" => match args.as_slice() {
            [index] => ConsoleCommand::Dispatch(Intent::Won {
                winner_index: parse_number(index)?,
            }),
            _ => return Err(CommandError::Usage("won <index>")),
        },
        "lock" | "unlock" => ConsoleCommand::Dispatch(Intent::ToggleMoneyLock),
        "list" | "ls" => ConsoleCommand::List,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

fn index_and_delta(args: &[&str], usage: &'static str) -> Result<(usize, i64), CommandError> {
    match args {
        [index, delta] => Ok((parse_number(index)?, parse_number(delta)?)),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_number<T: std::str::FromStr>(text: &str) -> Result<T, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}

/// Render the roster as a fixed-width table.
pub fn render_roster(view: &RosterView) -> String {
    let name_width = view
        .players
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<name_width$}  {:>10}  {:>8}",
        "#", "name", "money", "bid"
    );
    for (i, player) in view.players.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<name_width$}  {:>10}  {:>8}",
            i, player.name, player.money, player.bid
        );
    }
    let pot: i64 = view.players.iter().map(|p| p.bid).sum();
    let _ = write!(
        out,
        "pot {pot} | money {}",
        if view.money_locked { "locked" } else { "unlocked" }
    );
    out
}
