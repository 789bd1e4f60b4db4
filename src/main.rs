//! Chain Reaction engine implementing the CRP line protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through `tracing`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use chain_reaction::config::GameConfig;
use chain_reaction::engine::Engine;
use chain_reaction::protocol::parser::{parse_command, Command};

#[derive(Parser)]
#[command(version, about = "Chain Reaction rule engine speaking the CRP line protocol")]
struct Args {
    /// JSON file with the initial game configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace".
    /// RUST_LOG takes precedence when set.
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Runs the main CRP protocol loop until `quit` or end of input.
fn run<W: Write>(engine: &mut Engine, out: &mut W) -> io::Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;

        let Some(cmd) = parse_command(&line) else {
            continue;
        };

        match cmd {
            Command::Crp => engine.handle_crp(out)?,
            Command::IsReady => engine.handle_isready(out)?,
            Command::SetOption { name, value } => engine.set_option(&name, value.as_deref()),
            Command::NewGame(params) => engine.handle_newgame(params, false, out)?,
            Command::Restart => engine.handle_newgame(None, true, out)?,
            Command::Position { bfen } => engine.handle_position(&bfen, out)?,
            Command::Move { coord, player } => engine.handle_move(coord, player, out)?,
            Command::Capacity { coord } => engine.handle_capacity(coord, out)?,
            Command::Legal => engine.handle_legal(out)?,
            Command::Board => engine.handle_board(out)?,
            Command::Standings => engine.handle_standings(out)?,
            Command::Quit => break,
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level);

    let mut engine = Engine::new();
    if let Some(path) = &args.config {
        match GameConfig::load(path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded configuration");
                engine.config = config;
            }
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    match run(&mut engine, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("i/o error: {}", e);
            ExitCode::FAILURE
        }
    }
}
