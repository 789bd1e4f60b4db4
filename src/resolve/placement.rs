//! Orb placement.
//!
//! Applies a single player move to a board snapshot, producing a new
//! snapshot. The input board is never modified.

use thiserror::Error;

use crate::board::{Board, Cell, Coord, GridSize, Player};

/// Reasons `apply_move` refuses a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("cell {coord} is outside the {size} grid")]
    OutOfBounds { coord: Coord, size: GridSize },

    #[error("cell {coord} belongs to player {owner}, not player {player}")]
    Owned {
        coord: Coord,
        owner: Player,
        player: Player,
    },
}

/// Places one orb for `player` at `coord`.
///
/// The target must be empty or already owned by `player`. The returned
/// board has the target's count incremented and its owner set; explosions
/// are left to the chain resolver.
pub fn apply_move(board: &Board, coord: Coord, player: Player) -> Result<Board, PlacementError> {
    let size = board.size();
    let cell = *board
        .get(coord)
        .ok_or(PlacementError::OutOfBounds { coord, size })?;

    if let Some(owner) = cell.owner {
        if owner != player {
            return Err(PlacementError::Owned {
                coord,
                owner,
                player,
            });
        }
    }

    let mut next = board.clone();
    *next.cell_mut(coord) = Cell::owned(player, cell.count.saturating_add(1));
    Ok(next)
}
