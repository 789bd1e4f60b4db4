//! Random playout generation.
//!
//! Plays full games where every move is drawn uniformly from the legal
//! moves. This is a stress harness for the resolver rather than an
//! opponent: it records how long games run, how large chain reactions get,
//! and how often the pass ceiling is reached.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::board::{GridSize, Player};
use crate::config::{ConfigError, GameConfig};
use crate::movegen::random_move;
use crate::protocol::bfen::encode_bfen;
use crate::session::GameSession;

/// Errors that stop a playout run before any game is played.
#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error("invalid game configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for a playout run.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Rules and setup shared by every game.
    pub game: GameConfig,
    /// Moves after which an unfinished game is abandoned.
    pub max_moves: u32,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Base seed; game `i` uses `seed + i`. `None` draws from entropy.
    pub seed: Option<u64>,
    /// Suppress per-game progress logging.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            game: GameConfig::default(),
            max_moves: 1000,
            threads: 4,
            seed: None,
            quiet: false,
        }
    }
}

/// A completed (or abandoned) playout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub grid: GridSize,
    pub players: u8,
    /// `None` when the game hit `max_moves` without a winner.
    pub winner: Option<Player>,
    pub moves: u32,
    pub total_explosions: usize,
    /// Most passes needed to resolve a single move.
    pub longest_chain: usize,
    pub ceiling_hits: usize,
    pub final_bfen: String,
}

fn game_rng(seed: Option<u64>, game_id: usize) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s.wrapping_add(game_id as u64)),
        None => SmallRng::from_entropy(),
    }
}

/// Plays a single random game and returns its record.
pub fn play_game(
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, ConfigError> {
    let mut session = GameSession::new(config.game)?;
    let mut total_explosions = 0;
    let mut longest_chain = 0;
    let mut ceiling_hits = 0;

    while session.move_count() < config.max_moves {
        let Some(coord) = random_move(&session, rng) else {
            break;
        };
        let next = match session.submit_move(coord, session.current_player()) {
            Ok(next) => next,
            Err(e) => {
                error!(game_id, error = %e, "generated move was rejected");
                break;
            }
        };
        if let Some(summary) = next.last_move() {
            total_explosions += summary.explosions;
            longest_chain = longest_chain.max(summary.passes);
            ceiling_hits += usize::from(summary.ceiling_hit);
        }
        session = next;
    }

    Ok(GameRecord {
        game_id,
        grid: session.config().grid,
        players: session.config().player_count,
        winner: session.winner(),
        moves: session.move_count(),
        total_explosions,
        longest_chain,
        ceiling_hits,
        final_bfen: encode_bfen(&session),
    })
}

fn log_game(game: &GameRecord, done: usize, total: usize, started: Instant) {
    let outcome = match game.winner {
        Some(w) => format!("player {} wins", w),
        None => "unfinished".to_string(),
    };
    info!(
        game = game.game_id,
        moves = game.moves,
        longest_chain = game.longest_chain,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "game {}/{}: {}",
        done,
        total,
        outcome
    );
}

/// Runs a playout batch, producing every game record in completion order.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    })?;
    Ok(games)
}

/// Runs a playout batch, calling `on_game` with each completed record.
///
/// This allows the caller to process games incrementally (e.g. write to disk)
/// rather than waiting for all games to finish.
pub fn run_self_play_with_callback<F>(
    config: &SelfPlayConfig,
    on_game: F,
) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    config.game.validate()?;
    if config.threads > 1 {
        run_self_play_parallel(config, on_game)
    } else {
        run_self_play_sequential(config, on_game)
    }
}

/// Sequential playout: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let started = Instant::now();
        let mut rng = game_rng(config.seed, i);
        let game = play_game(config, i, &mut rng)?;
        if !config.quiet {
            log_game(&game, i + 1, config.num_games, started);
        }
        on_game(game);
    }
    Ok(())
}

/// Parallel playout: plays games concurrently using rayon.
/// Uses a channel to deliver completed games to the callback from worker threads.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();

    std::thread::scope(|scope| {
        let completed = &completed;
        scope.spawn(move || {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let started = Instant::now();
                        let mut rng = game_rng(config.seed, i);
                        // The configuration was validated before the pool started.
                        let Ok(game) = play_game(config, i, &mut rng) else {
                            return;
                        };
                        if !config.quiet {
                            let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                            log_game(&game, n, config.num_games, started);
                        }
                        let _ = tx.send(game);
                    });
            });
        });

        // Receive completed games on the calling thread and pass to callback.
        for game in rx {
            on_game(game);
        }
    });

    Ok(())
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> io::Result<()> {
    for game in games {
        write_game_json(game, out)?;
    }
    out.flush()
}

/// Writes a single game record as one JSON line.
pub fn write_game_json<W: Write>(game: &GameRecord, out: &mut W) -> io::Result<()> {
    serde_json::to_writer(&mut *out, game)?;
    writeln!(out)
}

/// Aggregate statistics over a batch of games.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub games: usize,
    pub unfinished: usize,
    /// Wins per player; index 0 is player 1.
    pub wins: Vec<usize>,
    pub avg_moves: f64,
    pub longest_chain: usize,
    pub ceiling_hits: usize,
}

/// Computes the summary of a batch of games.
pub fn summarize(games: &[GameRecord]) -> Summary {
    let max_players = games.iter().map(|g| g.players as usize).max().unwrap_or(0);
    let mut summary = Summary {
        games: games.len(),
        wins: vec![0; max_players],
        ..Summary::default()
    };
    let mut total_moves = 0u64;

    for game in games {
        total_moves += u64::from(game.moves);
        summary.longest_chain = summary.longest_chain.max(game.longest_chain);
        summary.ceiling_hits += game.ceiling_hits;
        match game.winner {
            Some(w) => summary.wins[w.index()] += 1,
            None => summary.unfinished += 1,
        }
    }
    summary.avg_moves = total_moves as f64 / games.len().max(1) as f64;
    summary
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Playout Summary ===")?;
        writeln!(f, "Games: {}", self.games)?;
        writeln!(f, "Avg moves/game: {:.1}", self.avg_moves)?;
        writeln!(f, "Unfinished: {}", self.unfinished)?;
        writeln!(f, "Longest chain: {} passes", self.longest_chain)?;
        writeln!(f, "Ceiling hits: {}", self.ceiling_hits)?;
        writeln!(f, "Win distribution:")?;
        for (i, &wins) in self.wins.iter().enumerate() {
            let pct = 100.0 * wins as f64 / self.games.max(1) as f64;
            writeln!(f, "  player {}: {} ({:.1}%)", i + 1, wins, pct)?;
        }
        Ok(())
    }
}
