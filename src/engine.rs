//! Engine state management.
//!
//! Holds the game configuration assembled from `setoption`, the current
//! session, and writes the protocol responses for each command.

use std::io::{self, Write};

use thiserror::Error;
use tracing::{info, warn};

use crate::board::{capacity, Coord, Player, MAX_DIMENSION, MAX_PLAYERS, MIN_DIMENSION, MIN_PLAYERS};
use crate::config::{ConfigError, GameConfig};
use crate::protocol::bfen::{encode_bfen, parse_bfen, BfenError};
use crate::protocol::parser::NewGameParams;
use crate::session::GameSession;

/// Errors reported back to the front end as `error <message>` lines.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no game in progress")]
    NoGame,

    #[error("failed to parse BFEN: {0}")]
    Bfen(#[from] BfenError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Holds the mutable state of the engine between commands.
#[derive(Debug, Default)]
pub struct Engine {
    pub config: GameConfig,
    pub session: Option<GameSession>,
}

impl Engine {
    /// Creates a new engine with the default configuration and no game.
    pub fn new() -> Self {
        Engine::default()
    }

    /// Applies a `setoption`. Options take effect at the next `newgame`.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) {
        let Some(value) = value else {
            warn!(option = name, "setoption without a value ignored");
            return;
        };
        if let Err(e) = self.config.set_option(name, value) {
            warn!(option = name, error = %e, "setoption rejected");
        }
    }

    /// Starts a new game from the configured options, with grid and player
    /// count overridden by `params` when given.
    pub fn new_game(&mut self, params: Option<NewGameParams>) -> Result<&GameSession, EngineError> {
        let mut config = self.config;
        if let Some(p) = params {
            config.grid.rows = p.rows;
            config.grid.cols = p.cols;
            config.player_count = p.players;
        }
        let session = GameSession::new(config)?;
        self.config = config;
        info!(grid = %config.grid, players = config.player_count, "new game");
        Ok(self.session.insert(session))
    }

    /// Restarts the current game, or starts one if none is running.
    pub fn restart(&mut self) -> Result<&GameSession, EngineError> {
        match self.session.take() {
            Some(session) => Ok(self.session.insert(session.restart())),
            None => self.new_game(None),
        }
    }

    /// Sets the current position from a BFEN string. Rule options are kept.
    pub fn set_position(&mut self, bfen: &str) -> Result<(), EngineError> {
        let session = parse_bfen(bfen)?.into_session(self.config)?;
        self.config = *session.config();
        self.session = Some(session);
        Ok(())
    }

    /// Handles the CRP handshake: writes id, options, protocol_version, and crpok.
    pub fn handle_crp<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let defaults = GameConfig::default();
        writeln!(out, "id name chain-reaction")?;
        writeln!(out, "id author chain-reaction")?;
        writeln!(
            out,
            "option name Rows type spin default {} min {} max {}",
            defaults.grid.rows, MIN_DIMENSION, MAX_DIMENSION
        )?;
        writeln!(
            out,
            "option name Cols type spin default {} min {} max {}",
            defaults.grid.cols, MIN_DIMENSION, MAX_DIMENSION
        )?;
        writeln!(
            out,
            "option name Players type spin default {} min {} max {}",
            defaults.player_count, MIN_PLAYERS, MAX_PLAYERS
        )?;
        writeln!(out, "option name Preset type combo default 6x8 var 6x8 var 7x7 var 8x6")?;
        writeln!(
            out,
            "option name Rotation type combo default sequential var sequential var skip-eliminated"
        )?;
        writeln!(
            out,
            "option name MaxPasses type spin default {} min 1 max 10000",
            defaults.max_passes
        )?;
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "crpok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles `newgame` and `restart` results: announces the game or the error.
    pub fn handle_newgame<W: Write>(
        &mut self,
        params: Option<NewGameParams>,
        restart: bool,
        out: &mut W,
    ) -> io::Result<()> {
        let result = if restart {
            self.restart()
        } else {
            self.new_game(params)
        };
        match result {
            Ok(session) => {
                let config = session.config();
                writeln!(
                    out,
                    "newgame {} players {}",
                    config.grid, config.player_count
                )?;
            }
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Handles `position <bfen>`. Silent on success.
    pub fn handle_position<W: Write>(&mut self, bfen: &str, out: &mut W) -> io::Result<()> {
        if let Err(e) = self.set_position(bfen) {
            writeln!(out, "error {}", e)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Handles `move <row> <col> [<player>]`.
    ///
    /// Without an explicit player the move is made for whoever is to move.
    pub fn handle_move<W: Write>(
        &mut self,
        coord: Coord,
        player: Option<Player>,
        out: &mut W,
    ) -> io::Result<()> {
        let Some(session) = &self.session else {
            writeln!(out, "error {}", EngineError::NoGame)?;
            return out.flush();
        };
        let player = player.unwrap_or(session.current_player());

        match session.submit_move(coord, player) {
            Ok(next) => {
                if let Some(summary) = next.last_move() {
                    writeln!(
                        out,
                        "moved {} {} explosions {} passes {}",
                        coord.row, coord.col, summary.explosions, summary.passes
                    )?;
                    if summary.ceiling_hit {
                        writeln!(out, "ceiling {}", next.config().max_passes)?;
                    }
                }
                match next.winner() {
                    Some(winner) => writeln!(out, "gameover {}", winner)?,
                    None => writeln!(out, "turn {}", next.current_player())?,
                }
                self.session = Some(next);
            }
            Err(violation) => {
                writeln!(out, "illegal {} {}", violation.kind(), violation)?;
            }
        }
        out.flush()
    }

    /// Handles `capacity <row> <col>`, using the configured grid when no
    /// game is running.
    pub fn handle_capacity<W: Write>(&self, coord: Coord, out: &mut W) -> io::Result<()> {
        let size = self
            .session
            .as_ref()
            .map_or(self.config.grid, |s| s.config().grid);
        if size.contains(coord) {
            writeln!(out, "capacity {}", capacity(coord, size))?;
        } else {
            writeln!(out, "error cell {} is outside the {} grid", coord, size)?;
        }
        out.flush()
    }

    /// Handles `legal`: every cell the player to move may use, as `row,col`.
    pub fn handle_legal<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(session) = &self.session else {
            writeln!(out, "error {}", EngineError::NoGame)?;
            return out.flush();
        };
        let mut line = String::from("legal");
        for coord in session.legal_moves() {
            line.push_str(&format!(" {},{}", coord.row, coord.col));
        }
        writeln!(out, "{}", line)?;
        out.flush()
    }

    /// Handles `board`: the BFEN line followed by a text rendering.
    pub fn handle_board<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(session) = &self.session else {
            writeln!(out, "error {}", EngineError::NoGame)?;
            return out.flush();
        };
        writeln!(out, "position {}", encode_bfen(session))?;
        write!(out, "{}", session.board())?;
        out.flush()
    }

    /// Handles `standings`: one line per player.
    pub fn handle_standings<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(session) = &self.session else {
            writeln!(out, "error {}", EngineError::NoGame)?;
            return out.flush();
        };
        for standing in session.standings() {
            writeln!(
                out,
                "player {} cells {} orbs {}",
                standing.player, standing.holdings.cells, standing.holdings.orbs
            )?;
        }
        out.flush()
    }
}
