//! Game sessions.
//!
//! A `GameSession` bundles the board with the turn bookkeeping for one game.
//! It is a plain value: the front end holds it, submits moves against it,
//! and replaces it with the session each accepted move returns. A rejected
//! move leaves the caller's session exactly as it was.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::board::{capacity, Board, Coord, GridSize, Holdings, Player};
use crate::config::{ConfigError, GameConfig};
use crate::movegen;
use crate::resolve::{
    advance_turn, apply_move, evaluate, ChainResolver, Explosion, PlacementError, Status,
};

/// A move refused by [`GameSession::submit_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("it is player {expected}'s turn, not player {got}'s")]
    OutOfTurn { expected: Player, got: Player },

    #[error("cell {coord} is outside the {size} grid")]
    OutOfBounds { coord: Coord, size: GridSize },

    #[error(
        "cell {coord} belongs to player {owner}; player {mover} may only use empty or own cells"
    )]
    Ownership {
        coord: Coord,
        owner: Player,
        mover: Player,
    },

    #[error("the game is over, player {winner} has won")]
    GameAlreadyOver { winner: Player },
}

impl RuleViolation {
    /// Short machine-readable name used by the line protocol.
    pub const fn kind(&self) -> &'static str {
        match self {
            RuleViolation::OutOfTurn { .. } => "out-of-turn",
            RuleViolation::OutOfBounds { .. } => "out-of-bounds",
            RuleViolation::Ownership { .. } => "ownership",
            RuleViolation::GameAlreadyOver { .. } => "game-over",
        }
    }
}

impl From<PlacementError> for RuleViolation {
    fn from(err: PlacementError) -> Self {
        match err {
            PlacementError::OutOfBounds { coord, size } => {
                RuleViolation::OutOfBounds { coord, size }
            }
            PlacementError::Owned {
                coord,
                owner,
                player,
            } => RuleViolation::Ownership {
                coord,
                owner,
                mover: player,
            },
        }
    }
}

/// What happened during the last accepted move. Front ends use this to
/// pace explosion animations before accepting the next input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveSummary {
    pub coord: Coord,
    pub player: Player,
    pub explosions: usize,
    pub passes: usize,
    pub waves: Vec<Vec<Explosion>>,
    pub ceiling_hit: bool,
}

/// One player's share of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub player: Player,
    pub holdings: Holdings,
    pub moves: u32,
}

/// The state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    current: Player,
    move_count: u32,
    moves_by_player: Vec<u32>,
    status: Status,
    last_move: Option<MoveSummary>,
}

impl GameSession {
    /// Starts a game: empty board, player 1 to move, no moves made.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(GameSession {
            board: Board::empty(config.grid),
            current: Player::FIRST,
            move_count: 0,
            moves_by_player: vec![0; config.player_count as usize],
            status: Status::Ongoing,
            last_move: None,
            config,
        })
    }

    /// Rebuilds a session from a mid-game position.
    ///
    /// Per-player move counts are not part of a position; every player who
    /// has had a turn in strict rotation is credited with one move per
    /// round. The status is recomputed from the board.
    pub fn from_position(
        config: GameConfig,
        board: Board,
        current: Player,
        move_count: u32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if board.size() != config.grid {
            return Err(ConfigError::GridMismatch {
                expected: config.grid,
                found: board.size(),
            });
        }
        if current.number() > config.player_count {
            return Err(ConfigError::UnknownPlayer {
                player: current,
                player_count: config.player_count,
            });
        }
        for (coord, cell) in board.iter() {
            if !cell.is_consistent() {
                return Err(ConfigError::InconsistentCell {
                    coord,
                    count: cell.count,
                });
            }
            if let Some(owner) = cell.owner {
                if owner.number() > config.player_count {
                    return Err(ConfigError::CellOwnerOutOfRange {
                        coord,
                        owner,
                        player_count: config.player_count,
                    });
                }
            }
        }
        let n = config.player_count as u32;
        let moves_by_player = (0..n)
            .map(|i| move_count / n + u32::from(i < move_count % n))
            .collect();
        let status = evaluate(&board, move_count, config.player_count);
        Ok(GameSession {
            config,
            board,
            current,
            move_count,
            moves_by_player,
            status,
            last_move: None,
        })
    }

    /// Returns a fresh session with the same configuration.
    pub fn restart(&self) -> Self {
        GameSession {
            board: Board::empty(self.config.grid),
            current: Player::FIRST,
            move_count: 0,
            moves_by_player: vec![0; self.config.player_count as usize],
            status: Status::Ongoing,
            last_move: None,
            config: self.config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn winner(&self) -> Option<Player> {
        self.status.winner()
    }

    pub fn last_move(&self) -> Option<&MoveSummary> {
        self.last_move.as_ref()
    }

    /// Capacity of a cell on this session's grid, or None if out of bounds.
    pub fn cell_capacity(&self, coord: Coord) -> Option<u8> {
        let size = self.config.grid;
        size.contains(coord).then(|| capacity(coord, size))
    }

    /// Cells the current player may place on. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Coord> {
        if self.is_terminal() {
            return Vec::new();
        }
        movegen::legal_moves(&self.board, self.current)
    }

    /// Cells, orbs and moves made for every player.
    pub fn standings(&self) -> Vec<Standing> {
        Player::all(self.config.player_count)
            .map(|player| Standing {
                player,
                holdings: self.board.holdings(player),
                moves: self.moves_by_player[player.index()],
            })
            .collect()
    }

    /// Validates and plays one move, returning the resulting session.
    ///
    /// Checks run in order: game over, turn, bounds, ownership. On success
    /// the orb is placed, chain reactions are resolved, the win condition is
    /// evaluated, and the turn passes on unless the game has ended.
    pub fn submit_move(&self, coord: Coord, player: Player) -> Result<GameSession, RuleViolation> {
        if let Status::Won(winner) = self.status {
            return Err(RuleViolation::GameAlreadyOver { winner });
        }
        if player != self.current {
            return Err(RuleViolation::OutOfTurn {
                expected: self.current,
                got: player,
            });
        }

        let placed = apply_move(&self.board, coord, player)?;
        let resolution = ChainResolver::new(self.config.max_passes).resolve(&placed);

        let move_count = self.move_count + 1;
        let mut moves_by_player = self.moves_by_player.clone();
        moves_by_player[player.index()] += 1;

        let status = evaluate(&resolution.board, move_count, self.config.player_count);
        let current = match status {
            Status::Won(_) => self.current,
            Status::Ongoing => advance_turn(
                &resolution.board,
                self.current,
                self.config.player_count,
                &moves_by_player,
                self.config.rotation,
            ),
        };

        debug!(
            player = player.number(),
            row = coord.row,
            col = coord.col,
            explosions = resolution.explosions(),
            passes = resolution.passes(),
            move_count,
            "move resolved"
        );

        let summary = MoveSummary {
            coord,
            player,
            explosions: resolution.explosions(),
            passes: resolution.passes(),
            ceiling_hit: resolution.ceiling_hit,
            waves: resolution.waves,
        };

        Ok(GameSession {
            config: self.config,
            board: resolution.board,
            current,
            move_count,
            moves_by_player,
            status,
            last_move: Some(summary),
        })
    }
}

/// Starts a default-rule game on a `rows` x `cols` grid.
pub fn create_game(rows: usize, cols: usize, player_count: u8) -> Result<GameSession, ConfigError> {
    GameSession::new(GameConfig::new(rows, cols, player_count))
}
