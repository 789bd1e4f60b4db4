//! BFEN (board FEN) encoding and decoding.
//!
//! BFEN is a one-line notation for a full Chain Reaction position, in the
//! spirit of chess FEN. It carries the grid, player count, every cell, the
//! player to move, and the number of moves made so far.
//!
//! Format: `<rows>x<cols>:<players>/<row 0>/.../<row n-1>/<to move>/<moves>`
//!
//! Each row holds `cols` comma-separated cells: `-` for an empty cell,
//! otherwise `<owner>.<count>`, e.g. `2.3` for three orbs owned by player 2.

use crate::board::{Board, Cell, Coord, GridSize, Player, MAX_PLAYERS, MIN_PLAYERS};
use crate::config::{ConfigError, GameConfig};
use crate::session::GameSession;

/// Errors that can occur during BFEN parsing.
#[derive(Debug, thiserror::Error)]
pub enum BfenError {
    #[error("expected {expected} sections separated by '/', got {got}")]
    WrongSectionCount { expected: usize, got: usize },

    #[error("invalid header: '{0}' (expected <rows>x<cols>:<players>)")]
    InvalidHeader(String),

    #[error("unsupported grid size {0}")]
    UnsupportedGrid(GridSize),

    #[error("invalid player count: '{0}'")]
    InvalidPlayerCount(String),

    #[error("row {row} has {got} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid cell entry at {coord}: '{entry}'")]
    InvalidCell { coord: Coord, entry: String },

    #[error("player {player} at {coord} exceeds the player count {player_count}")]
    OwnerOutOfRange {
        coord: Coord,
        player: Player,
        player_count: u8,
    },

    #[error("invalid player to move: '{0}'")]
    InvalidPlayer(String),

    #[error("invalid move count: '{0}'")]
    InvalidMoveCount(String),
}

/// A decoded BFEN position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub player_count: u8,
    pub board: Board,
    pub current: Player,
    pub move_count: u32,
}

impl Position {
    /// Builds a session from this position, taking the rule options
    /// (rotation, pass ceiling) from `base`.
    pub fn into_session(self, base: GameConfig) -> Result<GameSession, ConfigError> {
        let config = GameConfig {
            grid: self.board.size(),
            player_count: self.player_count,
            ..base
        };
        GameSession::from_position(config, self.board, self.current, self.move_count)
    }
}

/// Parses the `<rows>x<cols>:<players>` header.
fn parse_header(s: &str) -> Result<(GridSize, u8), BfenError> {
    let invalid = || BfenError::InvalidHeader(s.to_string());
    let (dims, players) = s.split_once(':').ok_or_else(invalid)?;
    let (rows, cols) = dims.split_once('x').ok_or_else(invalid)?;
    let rows: usize = rows.parse().map_err(|_| invalid())?;
    let cols: usize = cols.parse().map_err(|_| invalid())?;
    let size = GridSize::new(rows, cols);
    if !size.is_supported() {
        return Err(BfenError::UnsupportedGrid(size));
    }

    let player_count: u8 = players
        .parse()
        .map_err(|_| BfenError::InvalidPlayerCount(players.to_string()))?;
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        return Err(BfenError::InvalidPlayerCount(players.to_string()));
    }
    Ok((size, player_count))
}

/// Parses a single cell entry: `-` or `<owner>.<count>`.
fn parse_cell(entry: &str, coord: Coord, player_count: u8) -> Result<Cell, BfenError> {
    if entry == "-" {
        return Ok(Cell::EMPTY);
    }
    let invalid = || BfenError::InvalidCell {
        coord,
        entry: entry.to_string(),
    };

    let (owner_str, count_str) = entry.split_once('.').ok_or_else(invalid)?;
    let mut owner_chars = owner_str.chars();
    let owner = match (owner_chars.next(), owner_chars.next()) {
        (Some(c), None) => Player::from_bfen_char(c).ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };
    if owner.number() > player_count {
        return Err(BfenError::OwnerOutOfRange {
            coord,
            player: owner,
            player_count,
        });
    }

    let count: u8 = count_str.parse().map_err(|_| invalid())?;
    if count == 0 {
        return Err(invalid());
    }
    Ok(Cell::owned(owner, count))
}

/// Parses a BFEN string into a position.
pub fn parse_bfen(s: &str) -> Result<Position, BfenError> {
    let sections: Vec<&str> = s.trim().split('/').collect();
    let header = sections.first().copied().unwrap_or_default();
    let (size, player_count) = parse_header(header)?;

    let expected = size.rows + 3;
    if sections.len() != expected {
        return Err(BfenError::WrongSectionCount {
            expected,
            got: sections.len(),
        });
    }

    let mut cells = Vec::with_capacity(size.cell_count());
    for (row, row_str) in sections[1..=size.rows].iter().enumerate() {
        let entries: Vec<&str> = row_str.split(',').collect();
        if entries.len() != size.cols {
            return Err(BfenError::RowLength {
                row,
                expected: size.cols,
                got: entries.len(),
            });
        }
        for (col, entry) in entries.iter().enumerate() {
            cells.push(parse_cell(entry, Coord::new(row, col), player_count)?);
        }
    }
    let board = Board::from_cells(size, cells).ok_or(BfenError::WrongSectionCount {
        expected,
        got: sections.len(),
    })?;

    let current_str = sections[size.rows + 1];
    let current = current_str
        .parse::<u8>()
        .ok()
        .and_then(Player::new)
        .filter(|p| p.number() <= player_count)
        .ok_or_else(|| BfenError::InvalidPlayer(current_str.to_string()))?;

    let moves_str = sections[size.rows + 2];
    let move_count: u32 = moves_str
        .parse()
        .map_err(|_| BfenError::InvalidMoveCount(moves_str.to_string()))?;

    Ok(Position {
        player_count,
        board,
        current,
        move_count,
    })
}

/// Encodes a single cell.
fn encode_cell(cell: &Cell) -> String {
    match cell.owner {
        Some(owner) => format!("{}.{}", owner.bfen_char(), cell.count),
        None => "-".to_string(),
    }
}

/// Encodes a session's position into a canonical BFEN string.
pub fn encode_bfen(session: &GameSession) -> String {
    let board = session.board();
    let size = board.size();
    let mut result = String::with_capacity(size.cell_count() * 4 + 16);

    result.push_str(&format!("{}:{}", size, session.config().player_count));
    for row in board.rows() {
        result.push('/');
        let entries: Vec<String> = row.iter().map(encode_cell).collect();
        result.push_str(&entries.join(","));
    }
    result.push_str(&format!(
        "/{}/{}",
        session.current_player(),
        session.move_count()
    ));

    result
}
