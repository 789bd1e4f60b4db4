//! Players and cells.
//!
//! A cell either holds orbs owned by exactly one player or is empty and
//! unowned. Players carry no state beyond their 1-based identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest number of players in a game.
pub const MIN_PLAYERS: u8 = 2;

/// Largest number of players in a game.
pub const MAX_PLAYERS: u8 = 6;

/// A player identifier in `[1, player_count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Player(u8);

impl Player {
    /// The player who moves first in every game.
    pub const FIRST: Player = Player(1);

    /// Creates a player from its 1-based number. Returns None for 0 or
    /// numbers above [`MAX_PLAYERS`].
    pub const fn new(number: u8) -> Option<Player> {
        if number >= 1 && number <= MAX_PLAYERS {
            Some(Player(number))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index for per-player arrays.
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Returns the single-character BFEN abbreviation.
    pub const fn bfen_char(self) -> char {
        (b'0' + self.0) as char
    }

    /// Parses a player from its single-character BFEN abbreviation.
    pub fn from_bfen_char(c: char) -> Option<Player> {
        c.to_digit(10).and_then(|d| Player::new(d as u8))
    }

    /// Iterates players `1..=player_count`.
    pub fn all(player_count: u8) -> impl Iterator<Item = Player> {
        (1..=player_count.min(MAX_PLAYERS)).map(Player)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The contents of one grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Number of orbs in the cell.
    pub count: u8,
    /// Owning player, None exactly when `count == 0`.
    pub owner: Option<Player>,
}

impl Cell {
    /// An empty, unowned cell.
    pub const EMPTY: Cell = Cell {
        count: 0,
        owner: None,
    };

    pub const fn owned(owner: Player, count: u8) -> Cell {
        Cell {
            count,
            owner: Some(owner),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns true if the count/owner pairing is consistent.
    pub const fn is_consistent(&self) -> bool {
        (self.count == 0) == self.owner.is_none()
    }

    /// Returns true if `player` may place an orb here.
    pub fn accepts(&self, player: Player) -> bool {
        match self.owner {
            None => true,
            Some(owner) => owner == player,
        }
    }
}
