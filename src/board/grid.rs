//! Grid geometry: dimensions, coordinates, capacities, and adjacency.
//!
//! Capacity is never stored on the board. It is derived from a coordinate
//! and the grid dimensions, and equals the number of in-bounds orthogonal
//! neighbors (2 for corners, 3 for edges, 4 for interior cells).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest supported number of rows or columns.
pub const MIN_DIMENSION: usize = 2;

/// Largest supported number of rows or columns.
pub const MAX_DIMENSION: usize = 32;

/// The maximum number of orthogonal neighbors a cell can have.
pub const MAX_NEIGHBORS: usize = 4;

/// A cell coordinate, zero-based from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Dimensions of a rectangular grid. Fixed for the lifetime of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    pub const fn new(rows: usize, cols: usize) -> Self {
        GridSize { rows, cols }
    }

    /// Total number of cells on the grid.
    pub const fn cell_count(self) -> usize {
        self.rows * self.cols
    }

    /// Returns true if the coordinate lies inside `[0, rows) x [0, cols)`.
    pub const fn contains(self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Returns true if both dimensions are within the supported range.
    pub const fn is_supported(self) -> bool {
        self.rows >= MIN_DIMENSION
            && self.rows <= MAX_DIMENSION
            && self.cols >= MIN_DIMENSION
            && self.cols <= MAX_DIMENSION
    }

    /// Row-major index of an in-bounds coordinate.
    pub const fn index(self, coord: Coord) -> usize {
        coord.row * self.cols + coord.col
    }

    /// Inverse of [`GridSize::index`].
    pub const fn coord_at(self, idx: usize) -> Coord {
        Coord {
            row: idx / self.cols,
            col: idx % self.cols,
        }
    }

    /// Iterates every coordinate in row-major order.
    pub fn coords(self) -> impl Iterator<Item = Coord> {
        (0..self.cell_count()).map(move |i| self.coord_at(i))
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// The grid layouts offered by the game setup screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridPreset {
    /// 6 rows by 8 columns. The default layout.
    #[default]
    Wide,
    /// 7 rows by 7 columns.
    Square,
    /// 8 rows by 6 columns.
    Tall,
}

impl GridPreset {
    pub const ALL: [GridPreset; 3] = [GridPreset::Wide, GridPreset::Square, GridPreset::Tall];

    pub const fn size(self) -> GridSize {
        match self {
            GridPreset::Wide => GridSize::new(6, 8),
            GridPreset::Square => GridSize::new(7, 7),
            GridPreset::Tall => GridSize::new(8, 6),
        }
    }

    /// Parses a preset from its `RxC` label, e.g. `"7x7"`.
    pub fn from_label(label: &str) -> Option<GridPreset> {
        GridPreset::ALL
            .into_iter()
            .find(|p| p.size().to_string() == label)
    }
}

/// Returns the orb count at which the cell at `coord` explodes.
///
/// Starts from the maximum of four neighbors and drops one for each grid
/// boundary the cell touches.
pub const fn capacity(coord: Coord, size: GridSize) -> u8 {
    let mut neighbors = MAX_NEIGHBORS as u8;
    if coord.row == 0 {
        neighbors -= 1;
    }
    if size.rows > 0 && coord.row == size.rows - 1 {
        neighbors -= 1;
    }
    if coord.col == 0 {
        neighbors -= 1;
    }
    if size.cols > 0 && coord.col == size.cols - 1 {
        neighbors -= 1;
    }
    neighbors
}

/// Capacity lookup in the argument order used by front ends.
pub const fn get_cell_capacity(rows: usize, cols: usize, row: usize, col: usize) -> u8 {
    capacity(Coord::new(row, col), GridSize::new(rows, cols))
}

/// The in-bounds orthogonal neighbors of a cell, in up, down, left, right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    buf: [Coord; MAX_NEIGHBORS],
    len: usize,
}

impl Neighbors {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[Coord] {
        &self.buf[..self.len]
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.as_slice().contains(&coord)
    }

    fn push(&mut self, coord: Coord) {
        self.buf[self.len] = coord;
        self.len += 1;
    }
}

impl IntoIterator for Neighbors {
    type Item = Coord;
    type IntoIter = std::iter::Take<std::array::IntoIter<Coord, MAX_NEIGHBORS>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter().take(self.len)
    }
}

/// Returns the in-bounds orthogonal neighbors of `coord`.
pub fn neighbors(coord: Coord, size: GridSize) -> Neighbors {
    let mut out = Neighbors {
        buf: [Coord::new(0, 0); MAX_NEIGHBORS],
        len: 0,
    };
    if coord.row > 0 {
        out.push(Coord::new(coord.row - 1, coord.col));
    }
    if coord.row < size.rows.saturating_sub(1) {
        out.push(Coord::new(coord.row + 1, coord.col));
    }
    if coord.col > 0 {
        out.push(Coord::new(coord.row, coord.col - 1));
    }
    if coord.col < size.cols.saturating_sub(1) {
        out.push(Coord::new(coord.row, coord.col + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE: GridSize = GridSize::new(6, 8);

    #[test]
    fn corner_edge_interior_capacities() {
        assert_eq!(capacity(Coord::new(0, 0), WIDE), 2);
        assert_eq!(capacity(Coord::new(0, 7), WIDE), 2);
        assert_eq!(capacity(Coord::new(5, 0), WIDE), 2);
        assert_eq!(capacity(Coord::new(5, 7), WIDE), 2);
        assert_eq!(capacity(Coord::new(0, 3), WIDE), 3);
        assert_eq!(capacity(Coord::new(2, 0), WIDE), 3);
        assert_eq!(capacity(Coord::new(5, 4), WIDE), 3);
        assert_eq!(capacity(Coord::new(3, 7), WIDE), 3);
        assert_eq!(capacity(Coord::new(2, 3), WIDE), 4);
    }

    #[test]
    fn capacity_classes_cover_every_cell() {
        for preset in GridPreset::ALL {
            let size = preset.size();
            for coord in size.coords() {
                let row_edge = coord.row == 0 || coord.row + 1 == size.rows;
                let col_edge = coord.col == 0 || coord.col + 1 == size.cols;
                let expected = match (row_edge, col_edge) {
                    (true, true) => 2,
                    (true, false) | (false, true) => 3,
                    (false, false) => 4,
                };
                assert_eq!(capacity(coord, size), expected, "{} on {}", coord, size);
            }
        }
    }

    #[test]
    fn capacity_matches_neighbor_count() {
        let size = GridSize::new(2, 5);
        for coord in size.coords() {
            assert_eq!(capacity(coord, size) as usize, neighbors(coord, size).len());
        }
    }

    #[test]
    fn far_out_coordinates_do_not_overflow() {
        let far = Coord::new(usize::MAX, usize::MAX);
        assert_eq!(capacity(far, WIDE), 4);
        assert_eq!(get_cell_capacity(6, 8, usize::MAX, 0), 3);
        let ns = neighbors(far, WIDE);
        assert_eq!(
            ns.as_slice(),
            &[Coord::new(usize::MAX - 1, usize::MAX), Coord::new(usize::MAX, usize::MAX - 1)]
        );
        assert!(neighbors(Coord::new(0, 0), GridSize::new(0, 0)).is_empty());
    }

    #[test]
    fn front_end_argument_order() {
        assert_eq!(get_cell_capacity(6, 8, 0, 0), 2);
        assert_eq!(get_cell_capacity(6, 8, 0, 1), 3);
        assert_eq!(get_cell_capacity(6, 8, 1, 1), 4);
    }

    #[test]
    fn neighbor_order_is_up_down_left_right() {
        let n = neighbors(Coord::new(2, 3), WIDE);
        assert_eq!(
            n.as_slice(),
            &[
                Coord::new(1, 3),
                Coord::new(3, 3),
                Coord::new(2, 2),
                Coord::new(2, 4)
            ]
        );
    }

    #[test]
    fn corner_neighbors_stay_in_bounds() {
        let n: Vec<Coord> = neighbors(Coord::new(0, 0), WIDE).into_iter().collect();
        assert_eq!(n, vec![Coord::new(1, 0), Coord::new(0, 1)]);

        let n: Vec<Coord> = neighbors(Coord::new(5, 7), WIDE).into_iter().collect();
        assert_eq!(n, vec![Coord::new(4, 7), Coord::new(5, 6)]);
    }

    #[test]
    fn index_roundtrip() {
        for coord in WIDE.coords() {
            assert_eq!(WIDE.coord_at(WIDE.index(coord)), coord);
        }
        assert_eq!(WIDE.coords().count(), 48);
    }

    #[test]
    fn contains_checks_both_axes() {
        assert!(WIDE.contains(Coord::new(5, 7)));
        assert!(!WIDE.contains(Coord::new(6, 0)));
        assert!(!WIDE.contains(Coord::new(0, 8)));
    }

    #[test]
    fn preset_labels() {
        assert_eq!(GridPreset::from_label("6x8"), Some(GridPreset::Wide));
        assert_eq!(GridPreset::from_label("7x7"), Some(GridPreset::Square));
        assert_eq!(GridPreset::from_label("8x6"), Some(GridPreset::Tall));
        assert_eq!(GridPreset::from_label("9x9"), None);
        assert_eq!(GridPreset::default().size(), GridSize::new(6, 8));
    }

    #[test]
    fn supported_dimensions() {
        assert!(GridSize::new(2, 2).is_supported());
        assert!(GridSize::new(32, 32).is_supported());
        assert!(!GridSize::new(1, 8).is_supported());
        assert!(!GridSize::new(6, 33).is_supported());
    }
}
