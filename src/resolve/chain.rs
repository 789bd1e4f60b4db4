//! Chain reaction resolution.
//!
//! Resolution runs in batched passes. Each pass first scans the whole board
//! in row-major order for owned cells at or above capacity, then explodes
//! every collected cell. Explosions within one pass are simultaneous: a cell
//! can receive orbs from several neighbors, and the last exploding neighbor
//! in scan order ends up owning it.
//!
//! Passes repeat until a scan finds nothing or the pass ceiling is reached.
//! Hitting the ceiling is not an error; the board is returned as it stands
//! and the resolution is flagged.

use serde::Serialize;
use tracing::warn;

use crate::board::{capacity, neighbors, Board, Cell, Coord, Player};

/// Default limit on explosion passes per resolution.
pub const DEFAULT_MAX_PASSES: usize = 100;

/// One cell exploding, tagged with its owner at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Explosion {
    pub coord: Coord,
    pub owner: Player,
}

/// The outcome of resolving a board to a fixpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The board after the last pass.
    pub board: Board,
    /// Cells exploded in each pass, in scan order. Empty if nothing exploded.
    pub waves: Vec<Vec<Explosion>>,
    /// True if the pass ceiling stopped resolution while cells were still
    /// over capacity.
    pub ceiling_hit: bool,
}

impl Resolution {
    /// Number of passes that exploded at least one cell.
    pub fn passes(&self) -> usize {
        self.waves.len()
    }

    /// Total number of explosions across all passes.
    pub fn explosions(&self) -> usize {
        self.waves.iter().map(Vec::len).sum()
    }
}

/// Resolves chain reactions with a fixed pass ceiling.
///
/// Keep one resolver around and call `resolve()` repeatedly: the scan
/// buffer is reused across passes and calls. The returned waves are
/// freshly allocated each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainResolver {
    max_passes: usize,
    scan_buf: Vec<Explosion>,
}

impl Default for ChainResolver {
    fn default() -> Self {
        ChainResolver::new(DEFAULT_MAX_PASSES)
    }
}

impl ChainResolver {
    /// Creates a resolver that stops after `max_passes` exploding passes.
    pub fn new(max_passes: usize) -> Self {
        ChainResolver {
            max_passes,
            scan_buf: Vec::new(),
        }
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Resolves all explosions on `board`, returning the stabilized board.
    pub fn resolve(&mut self, board: &Board) -> Resolution {
        let mut work = board.clone();
        let mut waves = Vec::new();

        while waves.len() < self.max_passes {
            self.scan(&work);
            if self.scan_buf.is_empty() {
                return Resolution {
                    board: work,
                    waves,
                    ceiling_hit: false,
                };
            }
            explode(&mut work, &self.scan_buf);
            waves.push(self.scan_buf.clone());
        }

        self.scan(&work);
        let remaining = self.scan_buf.len();
        let ceiling_hit = remaining > 0;
        if ceiling_hit {
            warn!(
                max_passes = self.max_passes,
                remaining, "chain reaction stopped at pass ceiling"
            );
        }
        Resolution {
            board: work,
            waves,
            ceiling_hit,
        }
    }

    /// Refills the scan buffer with every owned cell at or above capacity,
    /// in row-major order.
    fn scan(&mut self, board: &Board) {
        let size = board.size();
        self.scan_buf.clear();
        self.scan_buf
            .extend(board.iter().filter_map(|(coord, cell)| match cell.owner {
                Some(owner) if cell.count >= capacity(coord, size) => {
                    Some(Explosion { coord, owner })
                }
                _ => None,
            }));
    }
}

/// Explodes the collected cells in order.
fn explode(board: &mut Board, wave: &[Explosion]) {
    let size = board.size();
    for ex in wave {
        *board.cell_mut(ex.coord) = Cell::EMPTY;
        for n in neighbors(ex.coord, size) {
            let cell = board.cell_mut(n);
            cell.count = cell.count.saturating_add(1);
            cell.owner = Some(ex.owner);
        }
    }
}

/// Resolves `board` with the default pass ceiling.
pub fn resolve(board: &Board) -> Resolution {
    ChainResolver::default().resolve(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GridSize;

    fn p(n: u8) -> Player {
        Player::new(n).unwrap()
    }

    fn board_with(size: GridSize, cells: &[((usize, usize), Cell)]) -> Board {
        let mut board = Board::empty(size);
        for &((r, c), cell) in cells {
            board.set(Coord::new(r, c), cell);
        }
        board
    }

    #[test]
    fn stable_board_is_unchanged() {
        let board = board_with(
            GridSize::new(6, 8),
            &[((0, 0), Cell::owned(p(1), 1)), ((2, 2), Cell::owned(p(2), 3))],
        );
        let res = resolve(&board);
        assert_eq!(res.board, board);
        assert_eq!(res.passes(), 0);
        assert_eq!(res.explosions(), 0);
        assert!(!res.ceiling_hit);
    }

    #[test]
    fn corner_explosion_spreads_to_two_neighbors() {
        let board = board_with(GridSize::new(6, 8), &[((0, 0), Cell::owned(p(1), 2))]);
        let res = resolve(&board);
        assert_eq!(res.board.get(Coord::new(0, 0)), Some(&Cell::EMPTY));
        assert_eq!(res.board.get(Coord::new(0, 1)), Some(&Cell::owned(p(1), 1)));
        assert_eq!(res.board.get(Coord::new(1, 0)), Some(&Cell::owned(p(1), 1)));
        assert_eq!(res.explosions(), 1);
        assert_eq!(res.passes(), 1);
    }

    #[test]
    fn explosion_captures_neighbors() {
        let board = board_with(
            GridSize::new(6, 8),
            &[
                ((2, 2), Cell::owned(p(1), 4)),
                ((1, 2), Cell::owned(p(2), 1)),
                ((2, 3), Cell::owned(p(3), 1)),
            ],
        );
        let res = resolve(&board);
        for n in neighbors(Coord::new(2, 2), board.size()) {
            assert_eq!(res.board.get(n).unwrap().owner, Some(p(1)), "{}", n);
        }
        assert_eq!(res.board.get(Coord::new(1, 2)).unwrap().count, 2);
        assert_eq!(res.board.get(Coord::new(2, 3)).unwrap().count, 2);
    }

    #[test]
    fn single_explosion_conserves_orbs() {
        let board = board_with(
            GridSize::new(6, 8),
            &[((0, 3), Cell::owned(p(1), 3)), ((1, 3), Cell::owned(p(2), 1))],
        );
        let res = resolve(&board);
        assert_eq!(res.explosions(), 1);
        assert_eq!(res.board.total_orbs(), board.total_orbs());
        assert_eq!(res.board.get(Coord::new(0, 3)), Some(&Cell::EMPTY));
        assert_eq!(res.board.get(Coord::new(0, 2)), Some(&Cell::owned(p(1), 1)));
        assert_eq!(res.board.get(Coord::new(0, 4)), Some(&Cell::owned(p(1), 1)));
        assert_eq!(res.board.get(Coord::new(1, 3)), Some(&Cell::owned(p(1), 2)));
    }

    #[test]
    fn simultaneous_explosions_stack_and_last_owner_wins() {
        let board = board_with(
            GridSize::new(3, 3),
            &[((0, 0), Cell::owned(p(1), 2)), ((0, 2), Cell::owned(p(2), 2))],
        );
        let res = resolve(&board);
        assert_eq!(res.passes(), 1);
        assert_eq!(
            res.waves[0],
            vec![
                Explosion { coord: Coord::new(0, 0), owner: p(1) },
                Explosion { coord: Coord::new(0, 2), owner: p(2) },
            ]
        );
        // Both explosions reach (0, 1); (0, 2) comes later in scan order.
        assert_eq!(res.board.get(Coord::new(0, 1)), Some(&Cell::owned(p(2), 2)));
        assert_eq!(res.board.get(Coord::new(1, 0)), Some(&Cell::owned(p(1), 1)));
        assert_eq!(res.board.get(Coord::new(1, 2)), Some(&Cell::owned(p(2), 1)));
    }

    #[test]
    fn cascade_runs_in_separate_passes() {
        let board = board_with(
            GridSize::new(2, 2),
            &[((0, 0), Cell::owned(p(1), 2)), ((0, 1), Cell::owned(p(1), 1))],
        );
        let res = resolve(&board);
        assert_eq!(res.passes(), 2);
        assert_eq!(res.waves[0][0].coord, Coord::new(0, 0));
        assert_eq!(res.waves[1][0].coord, Coord::new(0, 1));
        assert_eq!(res.board.get(Coord::new(0, 0)), Some(&Cell::owned(p(1), 1)));
        assert_eq!(res.board.get(Coord::new(0, 1)), Some(&Cell::EMPTY));
        assert_eq!(res.board.get(Coord::new(1, 0)), Some(&Cell::owned(p(1), 1)));
        assert_eq!(res.board.get(Coord::new(1, 1)), Some(&Cell::owned(p(1), 1)));
        assert!(res.board.is_stable());
    }

    #[test]
    fn overfull_cell_loses_excess_orbs() {
        let board = board_with(GridSize::new(6, 8), &[((0, 0), Cell::owned(p(1), 3))]);
        let res = resolve(&board);
        assert_eq!(res.board.total_orbs(), 2);
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let board = board_with(
            GridSize::new(3, 3),
            &[
                ((0, 0), Cell::owned(p(1), 2)),
                ((1, 1), Cell::owned(p(2), 3)),
                ((0, 1), Cell::owned(p(2), 2)),
            ],
        );
        let once = resolve(&board);
        let twice = resolve(&once.board);
        assert_eq!(twice.board, once.board);
        assert_eq!(twice.passes(), 0);
    }

    #[test]
    fn oscillating_board_hits_ceiling() {
        // A full 2x2 board with five orbs can never stabilize.
        let one = Cell::owned(p(1), 1);
        let board = board_with(
            GridSize::new(2, 2),
            &[
                ((0, 0), Cell::owned(p(1), 2)),
                ((0, 1), one),
                ((1, 0), one),
                ((1, 1), one),
            ],
        );
        let res = resolve(&board);
        assert!(res.ceiling_hit);
        assert_eq!(res.passes(), DEFAULT_MAX_PASSES);
        assert!(!res.board.is_stable());
        assert!(res.board.is_consistent());
    }

    #[test]
    fn custom_ceiling_stops_early() {
        let board = board_with(
            GridSize::new(2, 2),
            &[((0, 0), Cell::owned(p(1), 2)), ((0, 1), Cell::owned(p(1), 1))],
        );
        let res = ChainResolver::new(1).resolve(&board);
        assert!(res.ceiling_hit);
        assert_eq!(res.passes(), 1);
        assert_eq!(res.board.get(Coord::new(0, 1)), Some(&Cell::owned(p(1), 2)));
    }

    #[test]
    fn ceiling_not_flagged_when_last_pass_stabilizes() {
        let board = board_with(GridSize::new(6, 8), &[((0, 0), Cell::owned(p(1), 2))]);
        let res = ChainResolver::new(1).resolve(&board);
        assert!(!res.ceiling_hit);
        assert_eq!(res.passes(), 1);
    }

    #[test]
    fn resolve_leaves_input_untouched() {
        let board = board_with(GridSize::new(6, 8), &[((0, 0), Cell::owned(p(1), 2))]);
        let before = board.clone();
        let _ = resolve(&board);
        assert_eq!(board, before);
    }

    #[test]
    fn reused_resolver_matches_fresh_one() {
        let mut resolver = ChainResolver::default();
        let cascade = board_with(
            GridSize::new(2, 2),
            &[((0, 0), Cell::owned(p(1), 2)), ((0, 1), Cell::owned(p(1), 1))],
        );
        let corner = board_with(GridSize::new(6, 8), &[((0, 0), Cell::owned(p(2), 2))]);

        let first = resolver.resolve(&cascade);
        assert_eq!(first, resolve(&cascade));
        // Leftovers from the previous call must not leak into the next one.
        let second = resolver.resolve(&corner);
        assert_eq!(second, resolve(&corner));
        assert_eq!(second.explosions(), 1);
        assert_eq!(resolver.resolve(&cascade), first);
    }
}
