//! Board snapshot.
//!
//! A `Board` is a grid size plus a row-major vector of cells. It is the
//! only unit of game state that gets snapshotted: engine functions take a
//! board by reference and hand back a new one, so a caller's "before"
//! snapshot is never mutated.

use std::fmt;

use serde::Serialize;

use super::cell::{Cell, Player, MAX_PLAYERS};
use super::grid::{capacity, Coord, GridSize};

/// Complete board contents at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Board {
    size: GridSize,
    cells: Vec<Cell>,
}

/// Cell and orb totals for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Holdings {
    pub cells: usize,
    pub orbs: usize,
}

impl Board {
    /// Creates a board of the given size with every cell empty.
    pub fn empty(size: GridSize) -> Self {
        Board {
            size,
            cells: vec![Cell::EMPTY; size.cell_count()],
        }
    }

    /// Builds a board from row-major cells. Returns None if the cell count
    /// does not match the grid size.
    pub fn from_cells(size: GridSize, cells: Vec<Cell>) -> Option<Self> {
        if cells.len() != size.cell_count() {
            return None;
        }
        Some(Board { size, cells })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the cell at `coord`, or None if it is out of bounds.
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        if !self.size.contains(coord) {
            return None;
        }
        self.cells.get(self.size.index(coord))
    }

    /// Mutable access for in-crate working copies.
    pub(crate) fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        let idx = self.size.index(coord);
        &mut self.cells[idx]
    }

    /// Overwrites a cell. Returns false if `coord` is out of bounds.
    pub fn set(&mut self, coord: Coord, cell: Cell) -> bool {
        if !self.size.contains(coord) {
            return false;
        }
        let idx = self.size.index(coord);
        self.cells[idx] = cell;
        true
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates `(coord, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (self.size.coord_at(i), c))
    }

    /// Iterates the rows of the board, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.size.cols.max(1))
    }

    /// Returns true if no cell is at or above its capacity.
    pub fn is_stable(&self) -> bool {
        self.iter()
            .all(|(coord, cell)| cell.is_empty() || cell.count < capacity(coord, self.size))
    }

    /// Returns true if every cell satisfies the count/owner invariant.
    pub fn is_consistent(&self) -> bool {
        self.cells.iter().all(Cell::is_consistent)
    }

    /// Total number of orbs on the board.
    pub fn total_orbs(&self) -> usize {
        self.cells.iter().map(|c| c.count as usize).sum()
    }

    /// Distinct owners of non-empty cells, in ascending player order.
    pub fn owners(&self) -> Vec<Player> {
        let mut seen = [false; MAX_PLAYERS as usize];
        for cell in &self.cells {
            if let Some(owner) = cell.owner {
                if cell.count > 0 {
                    seen[owner.index()] = true;
                }
            }
        }
        seen.iter()
            .enumerate()
            .filter(|(_, s)| **s)
            .filter_map(|(i, _)| Player::new(i as u8 + 1))
            .collect()
    }

    /// Returns true if `player` owns at least one cell.
    pub fn has_cells(&self, player: Player) -> bool {
        self.cells.iter().any(|c| c.owner == Some(player))
    }

    /// Cell and orb totals for one player.
    pub fn holdings(&self, player: Player) -> Holdings {
        self.cells
            .iter()
            .filter(|c| c.owner == Some(player))
            .fold(Holdings::default(), |acc, c| Holdings {
                cells: acc.cells + 1,
                orbs: acc.orbs + c.count as usize,
            })
    }
}

/// Renders the board as a text grid: `.` for empty cells, otherwise the
/// owner number followed by the orb count.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell.owner {
                    Some(owner) => format!("{}{}", owner, cell.count),
                    None => " .".to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
