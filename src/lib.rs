//! Chain Reaction rule engine library.
//!
//! Exposes the board representation, chain reaction resolver, game
//! sessions, move generation, and protocol modules for use by integration
//! tests and the binary entry points.

pub mod board;
pub mod config;
pub mod engine;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod selfplay;
pub mod session;

pub use board::{get_cell_capacity, Board, Cell, Coord, GridSize, Player};
pub use config::{ConfigError, GameConfig};
pub use session::{create_game, GameSession, MoveSummary, RuleViolation};
