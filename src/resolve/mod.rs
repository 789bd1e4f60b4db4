//! Move resolution.
//!
//! Places orbs, resolves the chain reactions they trigger, and decides
//! whether the game is over and who moves next.

pub mod chain;
pub mod outcome;
pub mod placement;

pub use chain::{resolve, ChainResolver, Explosion, Resolution, DEFAULT_MAX_PASSES};
pub use outcome::{
    advance_turn, evaluate, in_grace_period, is_eliminated, next_player, Status, TurnRotation,
};
pub use placement::{apply_move, PlacementError};
