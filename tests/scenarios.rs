//! Whole-game scenarios played through the public session API.

use chain_reaction::board::{Board, Cell, Coord, GridSize, Player};
use chain_reaction::resolve::{Status, TurnRotation};
use chain_reaction::{create_game, GameConfig, GameSession, RuleViolation};

fn p(n: u8) -> Player {
    Player::new(n).unwrap()
}

fn play(session: GameSession, row: usize, col: usize) -> GameSession {
    let player = session.current_player();
    session.submit_move(Coord::new(row, col), player).unwrap()
}

#[test]
fn corner_fills_and_explodes() {
    let mut s = create_game(6, 8, 2).unwrap();
    s = play(s, 0, 0);
    assert_eq!(s.board().get(Coord::new(0, 0)), Some(&Cell::owned(p(1), 1)));
    s = play(s, 3, 4);
    s = play(s, 0, 0);

    assert_eq!(s.board().get(Coord::new(0, 0)), Some(&Cell::EMPTY));
    assert_eq!(s.board().get(Coord::new(0, 1)), Some(&Cell::owned(p(1), 1)));
    assert_eq!(s.board().get(Coord::new(1, 0)), Some(&Cell::owned(p(1), 1)));
    assert_eq!(s.board().total_orbs(), 3);
}

#[test]
fn lone_owner_during_grace_period_has_not_won() {
    let s = play(create_game(6, 8, 2).unwrap(), 2, 2);
    assert_eq!(s.board().owners(), vec![p(1)]);
    assert_eq!(s.status(), Status::Ongoing);
    assert_eq!(s.current_player(), p(2));
}

#[test]
fn lone_owner_after_grace_period_wins() {
    let mut board = Board::empty(GridSize::new(6, 8));
    board.set(Coord::new(3, 3), Cell::owned(p(2), 2));
    board.set(Coord::new(4, 4), Cell::owned(p(2), 1));
    let s = GameSession::from_position(GameConfig::default(), board, p(1), 3).unwrap();
    assert_eq!(s.status(), Status::Won(p(2)));
    assert!(s.legal_moves().is_empty());
}

#[test]
fn foreign_cell_is_rejected_and_board_kept() {
    let s = play(create_game(6, 8, 2).unwrap(), 2, 2);
    let before = s.board().clone();
    let err = s.submit_move(Coord::new(2, 2), p(2)).unwrap_err();
    assert_eq!(
        err,
        RuleViolation::Ownership {
            coord: Coord::new(2, 2),
            owner: p(1),
            mover: p(2),
        }
    );
    assert_eq!(s.board(), &before);
    assert_eq!(s.current_player(), p(2));
}

#[test]
fn capture_wins_two_player_game() {
    // Player 2 sits next to player 1's corner and is captured on move 3.
    let mut s = create_game(6, 8, 2).unwrap();
    s = play(s, 0, 0); // 1
    s = play(s, 0, 1); // 2
    assert_eq!(s.status(), Status::Ongoing);
    s = play(s, 0, 0); // 1: explodes, captures (0,1)
    assert_eq!(s.last_move().map(|m| m.explosions), Some(1));
    assert_eq!(s.move_count(), 3);
    // Grace period for two players is three moves, so this already counts.
    assert_eq!(s.status(), Status::Won(p(1)));
    assert_eq!(s.board().get(Coord::new(0, 1)), Some(&Cell::owned(p(1), 2)));
}

#[test]
fn cascade_crosses_the_board_edge() {
    let mut board = Board::empty(GridSize::new(6, 8));
    board.set(Coord::new(0, 0), Cell::owned(p(1), 1));
    board.set(Coord::new(0, 1), Cell::owned(p(2), 2));
    board.set(Coord::new(0, 2), Cell::owned(p(2), 2));
    board.set(Coord::new(5, 7), Cell::owned(p(2), 1));
    let s = GameSession::from_position(GameConfig::default(), board, p(1), 10).unwrap();

    let s = s.submit_move(Coord::new(0, 0), p(1)).unwrap();
    let summary = s.last_move().unwrap();
    // (0,0) -> (0,1) -> (0,2) -> (0,3)
    assert_eq!(summary.passes, 3);
    assert_eq!(summary.explosions, 3);
    assert_eq!(s.board().get(Coord::new(0, 3)), Some(&Cell::owned(p(1), 1)));
    assert_eq!(s.board().get(Coord::new(1, 2)), Some(&Cell::owned(p(1), 1)));
    assert_eq!(s.status(), Status::Ongoing);
}

#[test]
fn three_player_rotation_modes() {
    // Player 2 has moved once and lost every cell.
    let mut board = Board::empty(GridSize::new(6, 8));
    board.set(Coord::new(2, 2), Cell::owned(p(1), 1));
    board.set(Coord::new(4, 4), Cell::owned(p(3), 1));

    let sequential =
        GameSession::from_position(GameConfig::new(6, 8, 3), board.clone(), p(1), 3).unwrap();
    let s = play(sequential, 2, 2);
    assert_eq!(s.current_player(), p(2));

    let config = GameConfig::new(6, 8, 3).with_rotation(TurnRotation::SkipEliminated);
    let skipping = GameSession::from_position(config, board, p(1), 3).unwrap();
    let s = play(skipping, 2, 2);
    assert_eq!(s.current_player(), p(3));
    let s = play(s, 4, 4);
    assert_eq!(s.current_player(), p(1));
}

#[test]
fn every_violation_leaves_session_unchanged() {
    let s = play(create_game(2, 2, 2).unwrap(), 0, 0);
    let before = s.clone();
    let attempts = [
        (Coord::new(1, 1), p(1)),
        (Coord::new(2, 0), p(2)),
        (Coord::new(0, 0), p(2)),
    ];
    for (coord, player) in attempts {
        assert!(s.submit_move(coord, player).is_err());
        assert_eq!(s, before);
    }
}
