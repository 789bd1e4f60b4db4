//! Legal move generation.
//!
//! Lists the cells a player may place on and picks random legal moves for
//! the playout harness.

use rand::Rng;

use crate::board::{Board, Coord, Player};
use crate::session::GameSession;

/// Cells `player` may place an orb on: every empty cell and every cell the
/// player already owns, in row-major order.
pub fn legal_moves(board: &Board, player: Player) -> Vec<Coord> {
    board
        .iter()
        .filter(|(_, cell)| cell.accepts(player))
        .map(|(coord, _)| coord)
        .collect()
}

/// Picks a uniformly random legal move for the player to move.
///
/// Returns `None` once the game is over, or if every cell belongs to
/// another player.
pub fn random_move(session: &GameSession, rng: &mut impl Rng) -> Option<Coord> {
    if session.is_terminal() {
        return None;
    }
    let legal = legal_moves(session.board(), session.current_player());
    if legal.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..legal.len());
    Some(legal[idx])
}
