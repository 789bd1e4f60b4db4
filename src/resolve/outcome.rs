//! Win detection and turn rotation.
//!
//! A game can only end once the grace period has passed, i.e. once at least
//! `player_count + 1` moves have been made. After that, the game is won as
//! soon as exactly one player owns orbs on the board. A board with no owned
//! cells at all keeps the game going; there are no draws.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player};

/// Whether a game is still running, and who won if not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ongoing,
    Won(Player),
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Won(_))
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Status::Won(p) => Some(p),
            Status::Ongoing => None,
        }
    }
}

/// How the turn passes after a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnRotation {
    /// Every player keeps getting turns, even with no cells left.
    #[default]
    Sequential,
    /// Players who have moved at least once and own no cells are skipped.
    SkipEliminated,
}

impl TurnRotation {
    /// Parses a rotation from its option name.
    pub fn from_name(name: &str) -> Option<TurnRotation> {
        match name {
            "sequential" => Some(TurnRotation::Sequential),
            "skip-eliminated" => Some(TurnRotation::SkipEliminated),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TurnRotation::Sequential => "sequential",
            TurnRotation::SkipEliminated => "skip-eliminated",
        }
    }
}

/// Returns true while the grace period still rules out a win.
pub const fn in_grace_period(move_count: u32, player_count: u8) -> bool {
    move_count < player_count as u32 + 1
}

/// Decides whether the game has ended after `move_count` moves.
///
/// `move_count` includes the move that produced `board`.
pub fn evaluate(board: &Board, move_count: u32, player_count: u8) -> Status {
    if in_grace_period(move_count, player_count) {
        return Status::Ongoing;
    }
    match board.owners().as_slice() {
        [only] => Status::Won(*only),
        _ => Status::Ongoing,
    }
}

/// Plain wrap-around successor: `(current % player_count) + 1`.
pub fn next_player(current: Player, player_count: u8) -> Player {
    let next = current.number() % player_count + 1;
    Player::new(next).unwrap_or(Player::FIRST)
}

/// Returns true if `player` has made a move and no longer owns any cell.
///
/// A player who has not moved yet is never eliminated.
pub fn is_eliminated(board: &Board, player: Player, moves_made: u32) -> bool {
    moves_made > 0 && !board.has_cells(player)
}

/// Picks the player to move after `current` under the given rotation.
///
/// `moves_by_player[i]` is the number of moves made by player `i + 1`.
pub fn advance_turn(
    board: &Board,
    current: Player,
    player_count: u8,
    moves_by_player: &[u32],
    rotation: TurnRotation,
) -> Player {
    let mut candidate = next_player(current, player_count);
    if rotation == TurnRotation::Sequential {
        return candidate;
    }
    for _ in 0..player_count {
        let made = moves_by_player.get(candidate.index()).copied().unwrap_or(0);
        if !is_eliminated(board, candidate, made) {
            return candidate;
        }
        candidate = next_player(candidate, player_count);
    }
    next_player(current, player_count)
}
