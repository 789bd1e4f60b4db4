use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use chain_reaction::board::{capacity, Board, Cell, Coord, GridSize, Player};
use chain_reaction::config::GameConfig;
use chain_reaction::movegen::legal_moves;
use chain_reaction::protocol::bfen::{encode_bfen, parse_bfen};
use chain_reaction::resolve::{apply_move, ChainResolver};
use chain_reaction::selfplay::{play_game, SelfPlayConfig};
use chain_reaction::GameSession;

/// A 6x8 board with every cell one orb short of exploding, owners striped
/// by column. A single placement sets off the whole board.
fn critical_board() -> Board {
    let size = GridSize::new(6, 8);
    let mut board = Board::empty(size);
    for coord in size.coords() {
        let owner = Player::new((coord.col % 2) as u8 + 1).unwrap();
        board.set(coord, Cell::owned(owner, capacity(coord, size) - 1));
    }
    board
}

/// A mid-game position with a mix of owners and loads.
fn midgame_session() -> GameSession {
    let mut session = GameSession::new(GameConfig::default()).unwrap();
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..30 {
        let Some(coord) = chain_reaction::movegen::random_move(&session, &mut rng) else {
            break;
        };
        session = session
            .submit_move(coord, session.current_player())
            .unwrap();
    }
    session
}

fn bench_resolve_critical(c: &mut Criterion) {
    let placed = apply_move(&critical_board(), Coord::new(0, 0), Player::FIRST).unwrap();
    let mut resolver = ChainResolver::default();
    c.bench_function("resolve_critical_6x8", |b| {
        b.iter(|| resolver.resolve(black_box(&placed)))
    });
}

fn bench_resolve_single_pass(c: &mut Criterion) {
    let placed = apply_move(&critical_board(), Coord::new(3, 3), Player::FIRST).unwrap();
    let mut resolver = ChainResolver::new(1);
    c.bench_function("resolve_single_pass", |b| {
        b.iter(|| resolver.resolve(black_box(&placed)))
    });
}

fn bench_submit_move(c: &mut Criterion) {
    let session = midgame_session();
    let coord = legal_moves(session.board(), session.current_player())[0];
    let player = session.current_player();
    c.bench_function("submit_move_midgame", |b| {
        b.iter(|| black_box(&session).submit_move(black_box(coord), player))
    });
}

fn bench_legal_moves(c: &mut Criterion) {
    let session = midgame_session();
    c.bench_function("legal_moves_midgame", |b| {
        b.iter(|| legal_moves(black_box(session.board()), session.current_player()))
    });
}

fn bench_bfen(c: &mut Criterion) {
    let session = midgame_session();
    let bfen = encode_bfen(&session);
    c.bench_function("bfen_encode", |b| b.iter(|| encode_bfen(black_box(&session))));
    c.bench_function("bfen_parse", |b| b.iter(|| parse_bfen(black_box(&bfen))));
}

fn bench_random_playout(c: &mut Criterion) {
    let config = SelfPlayConfig {
        max_moves: 500,
        quiet: true,
        ..SelfPlayConfig::default()
    };
    c.bench_function("random_playout_6x8_2p", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| play_game(black_box(&config), 0, &mut rng))
    });
}

fn bench_board_clone(c: &mut Criterion) {
    let board = critical_board();
    c.bench_function("board_clone", |b| b.iter(|| black_box(&board).clone()));
}

criterion_group!(
    benches,
    bench_resolve_critical,
    bench_resolve_single_pass,
    bench_submit_move,
    bench_legal_moves,
    bench_bfen,
    bench_random_playout,
    bench_board_clone,
);
criterion_main!(benches);
