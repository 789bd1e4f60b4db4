//! CRP command parser.
//!
//! Parses incoming CRP protocol commands from raw text into structured
//! `Command` variants that the engine main loop can dispatch on.

use tracing::warn;

use crate::board::{Coord, Player};

/// Grid and player count given with `newgame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewGameParams {
    pub rows: usize,
    pub cols: usize,
    pub players: u8,
}

/// A parsed front-end-to-engine CRP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize the CRP protocol handshake.
    Crp,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Start a new game, optionally overriding grid and player count.
    NewGame(Option<NewGameParams>),

    /// Start over with the current game's configuration.
    Restart,

    /// Set the position from a BFEN string.
    Position { bfen: String },

    /// Place an orb. Without an explicit player the mover is whoever's turn it is.
    Move { coord: Coord, player: Option<Player> },

    /// Ask for the capacity of a cell.
    Capacity { coord: Coord },

    /// List the cells the current player may place on.
    Legal,

    /// Print the current position.
    Board,

    /// Print cells and orbs held by every player.
    Standings,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let first = *tokens.first()?;

    match first {
        "crp" => Some(Command::Crp),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "restart" => Some(Command::Restart),
        "legal" => Some(Command::Legal),
        "board" => Some(Command::Board),
        "standings" => Some(Command::Standings),

        "setoption" => parse_setoption(&tokens),
        "newgame" => parse_newgame(&tokens),
        "position" => parse_position(&tokens),
        "move" => parse_move(&tokens),
        "capacity" => parse_capacity(&tokens),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");
    let (name_parts, value_parts) = match value_idx {
        Some(vi) => (&tokens[2..vi], &tokens[vi + 1..]),
        None => (&tokens[2..], &tokens[tokens.len()..]),
    };
    if name_parts.is_empty() {
        warn!("malformed setoption: empty name");
        return None;
    }

    let name = name_parts.join(" ");
    let value = (!value_parts.is_empty()).then(|| value_parts.join(" "));
    Some(Command::SetOption { name, value })
}

/// Parses `newgame [<rows> <cols> <players>]`.
fn parse_newgame(tokens: &[&str]) -> Option<Command> {
    match tokens {
        [_] => Some(Command::NewGame(None)),
        [_, rows, cols, players] => {
            match (rows.parse::<usize>(), cols.parse::<usize>(), players.parse::<u8>()) {
                (Ok(rows), Ok(cols), Ok(players)) => Some(Command::NewGame(Some(NewGameParams {
                    rows,
                    cols,
                    players,
                }))),
                _ => {
                    warn!("malformed newgame: dimensions must be non-negative integers");
                    None
                }
            }
        }
        _ => {
            warn!("malformed newgame: expected 'newgame [<rows> <cols> <players>]'");
            None
        }
    }
}

/// Parses `position <bfen>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        warn!("malformed position: expected 'position <bfen>'");
        return None;
    }
    // BFEN is a single token (no spaces) following "position"
    let bfen = tokens[1].to_string();
    Some(Command::Position { bfen })
}

/// Parses a `<row> <col>` pair.
fn parse_coord(row: &str, col: &str) -> Option<Coord> {
    match (row.parse::<usize>(), col.parse::<usize>()) {
        (Ok(row), Ok(col)) => Some(Coord::new(row, col)),
        _ => None,
    }
}

/// Parses `move <row> <col> [<player>]`.
fn parse_move(tokens: &[&str]) -> Option<Command> {
    let (coord, player) = match tokens {
        [_, row, col] => (parse_coord(row, col), None),
        [_, row, col, player] => {
            let player = player.parse::<u8>().ok().and_then(Player::new);
            if player.is_none() {
                warn!(player = tokens[3], "malformed move: invalid player");
                return None;
            }
            (parse_coord(row, col), player)
        }
        _ => {
            warn!("malformed move: expected 'move <row> <col> [<player>]'");
            return None;
        }
    };
    match coord {
        Some(coord) => Some(Command::Move { coord, player }),
        None => {
            warn!("malformed move: row and col must be non-negative integers");
            None
        }
    }
}

/// Parses `capacity <row> <col>`.
fn parse_capacity(tokens: &[&str]) -> Option<Command> {
    let coord = match tokens {
        [_, row, col] => parse_coord(row, col),
        _ => None,
    };
    match coord {
        Some(coord) => Some(Command::Capacity { coord }),
        None => {
            warn!("malformed capacity: expected 'capacity <row> <col>'");
            None
        }
    }
}
