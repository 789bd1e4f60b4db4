//! Random playout CLI.
//!
//! Plays Chain Reaction games with uniformly random moves and outputs one
//! JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use chain_reaction::config::GameConfig;
use chain_reaction::resolve::TurnRotation;
use chain_reaction::selfplay::{self, SelfPlayConfig};

#[derive(Parser)]
#[command(about = "Plays random Chain Reaction games and writes JSONL records")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 10)]
    games: usize,

    /// Grid rows
    #[arg(long, default_value_t = 6)]
    rows: usize,

    /// Grid columns
    #[arg(long, default_value_t = 8)]
    cols: usize,

    /// Number of players
    #[arg(short, long, default_value_t = 2)]
    players: u8,

    /// Turn rotation: "sequential" or "skip-eliminated"
    #[arg(long, default_value = "sequential", value_parser = parse_rotation)]
    rotation: TurnRotation,

    /// Explosion pass ceiling per move
    #[arg(long, default_value_t = 100)]
    max_passes: usize,

    /// Abandon a game after this many moves
    #[arg(long, default_value_t = 1000)]
    max_moves: u32,

    /// Number of parallel threads
    #[arg(short, long, default_value_t = 4)]
    threads: usize,

    /// RNG seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress per-game progress and the summary
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn parse_rotation(s: &str) -> Result<TurnRotation, String> {
    TurnRotation::from_name(s).ok_or_else(|| format!("unknown rotation '{}'", s))
}

fn init_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

fn write_output(games: &[selfplay::GameRecord], path: Option<&PathBuf>) -> io::Result<()> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            selfplay::write_jsonl(games, &mut writer)
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(games, &mut writer)?;
            writer.flush()
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level);

    let config = SelfPlayConfig {
        num_games: args.games,
        game: GameConfig::new(args.rows, args.cols, args.players)
            .with_rotation(args.rotation)
            .with_max_passes(args.max_passes),
        max_moves: args.max_moves,
        threads: args.threads,
        seed: args.seed,
        quiet: args.quiet,
    };

    info!(
        games = config.num_games,
        grid = %config.game.grid,
        players = config.game.player_count,
        threads = config.threads,
        "starting playouts"
    );

    let start = Instant::now();
    let mut games = match selfplay::run_self_play(&config) {
        Ok(games) => games,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    games.sort_by_key(|g| g.game_id);
    let elapsed = start.elapsed().as_secs_f64();

    if !args.quiet {
        info!(
            "completed {} games in {:.1}s ({:.1} games/s)",
            games.len(),
            elapsed,
            games.len() as f64 / elapsed.max(f64::EPSILON)
        );
        eprint!("{}", selfplay::summarize(&games));
    }

    if let Err(e) = write_output(&games, args.output.as_ref()) {
        error!("failed to write output: {}", e);
        return ExitCode::FAILURE;
    }
    if let Some(path) = &args.output {
        info!(path = %path.display(), "wrote {} games", games.len());
    }
    ExitCode::SUCCESS
}
