//! Game configuration.
//!
//! A `GameConfig` is supplied once when a session is created and never
//! changes afterwards. It can be built in code, loaded from JSON, or
//! assembled from protocol options.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{
    Coord, GridPreset, GridSize, Player, MAX_DIMENSION, MAX_PLAYERS, MIN_DIMENSION, MIN_PLAYERS,
};
use crate::resolve::{TurnRotation, DEFAULT_MAX_PASSES};

/// Errors raised while building or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "grid {0} is outside the supported {min}..={max} range per side",
        min = MIN_DIMENSION,
        max = MAX_DIMENSION
    )]
    UnsupportedGrid(GridSize),

    #[error(
        "player count {0} is outside the supported {min}..={max} range",
        min = MIN_PLAYERS,
        max = MAX_PLAYERS
    )]
    UnsupportedPlayerCount(u8),

    #[error("position grid {found} does not match the configured {expected} grid")]
    GridMismatch { expected: GridSize, found: GridSize },

    #[error("player {player} is not part of a {player_count}-player game")]
    UnknownPlayer { player: Player, player_count: u8 },

    #[error("cell {coord} holds {count} orbs but its owner does not match")]
    InconsistentCell { coord: Coord, count: u8 },

    #[error("cell {coord} is owned by player {owner}, not part of a {player_count}-player game")]
    CellOwnerOutOfRange {
        coord: Coord,
        owner: Player,
        player_count: u8,
    },

    #[error("max passes must be at least 1")]
    ZeroMaxPasses,

    #[error("unknown grid preset: '{0}'")]
    UnknownPreset(String),

    #[error("unknown turn rotation: '{0}'")]
    UnknownRotation(String),

    #[error("unknown option: '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option {name}")]
    InvalidOptionValue { name: String, value: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings fixed for the lifetime of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridSize,
    pub player_count: u8,
    pub rotation: TurnRotation,
    pub max_passes: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid: GridPreset::default().size(),
            player_count: MIN_PLAYERS,
            rotation: TurnRotation::Sequential,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl GameConfig {
    /// A default configuration with the given grid and player count.
    pub fn new(rows: usize, cols: usize, player_count: u8) -> Self {
        GameConfig {
            grid: GridSize::new(rows, cols),
            player_count,
            ..GameConfig::default()
        }
    }

    /// A default configuration using one of the setup presets.
    pub fn from_preset(preset: GridPreset, player_count: u8) -> Self {
        GameConfig {
            grid: preset.size(),
            player_count,
            ..GameConfig::default()
        }
    }

    pub fn with_rotation(mut self, rotation: TurnRotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Checks every field against the supported ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid.is_supported() {
            return Err(ConfigError::UnsupportedGrid(self.grid));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigError::UnsupportedPlayerCount(self.player_count));
        }
        if self.max_passes == 0 {
            return Err(ConfigError::ZeroMaxPasses);
        }
        Ok(())
    }

    /// Parses and validates a configuration from a JSON string. Missing
    /// fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        GameConfig::from_json(&data)
    }

    /// Applies one named option, as sent by `setoption`.
    ///
    /// Values are not range-checked here; call [`GameConfig::validate`]
    /// before starting a game.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let number = |v: &str| {
            v.parse::<usize>()
                .map_err(|_| ConfigError::InvalidOptionValue {
                    name: name.to_string(),
                    value: v.to_string(),
                })
        };
        match name.to_ascii_lowercase().as_str() {
            "rows" => self.grid.rows = number(value)?,
            "cols" => self.grid.cols = number(value)?,
            "players" => {
                let n = number(value)?;
                self.player_count = u8::try_from(n).unwrap_or(u8::MAX);
            }
            "preset" => {
                let preset = GridPreset::from_label(value)
                    .ok_or_else(|| ConfigError::UnknownPreset(value.to_string()))?;
                self.grid = preset.size();
            }
            "rotation" => {
                self.rotation = TurnRotation::from_name(value)
                    .ok_or_else(|| ConfigError::UnknownRotation(value.to_string()))?;
            }
            "maxpasses" => self.max_passes = number(value)?,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }
}
