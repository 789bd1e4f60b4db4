//! Board representation and game-state types.
//!
//! Contains the grid geometry (capacities and adjacency), the cell and
//! player types, and the board snapshot itself.

pub mod cell;
pub mod grid;
pub mod state;

pub use cell::{Cell, Player, MAX_PLAYERS, MIN_PLAYERS};
pub use grid::{
    capacity, get_cell_capacity, neighbors, Coord, GridPreset, GridSize, Neighbors, MAX_DIMENSION,
    MAX_NEIGHBORS, MIN_DIMENSION,
};
pub use state::{Board, Holdings};
