use std::time::Duration;

use super::*;

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid fen")
}

fn seeded(iterations: u32) -> Mcts {
    Mcts::new(Evaluator::default(), iterations, 1.0, 8).with_seed(42)
}

#[test]
fn test_only_move_is_returned() {
    let p = pos("k7/8/8/8/8/8/1q6/K7 w - - 0 1");
    assert_eq!(p.legal_moves().len(), 1);
    let result = seeded(50).search(&p, SearchLimits::default()).expect("one move");
    assert_eq!(result.best_move.to_string(), "a1b2");
}

#[test]
fn test_finds_back_rank_mate() {
    let p = pos("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1");
    let result = seeded(400).search(&p, SearchLimits::default()).expect("moves");
    assert_eq!(result.best_move.to_string(), "d1d8");
    assert!(result.score > 900, "mate child should average near 1000, got {}", result.score);
}

#[test]
fn test_terminal_root_is_an_error() {
    let stalemate = pos("k7/8/1Q6/8/8/8/8/K7 b - - 0 1");
    let err = seeded(10).search(&stalemate, SearchLimits::default()).unwrap_err();
    assert!(matches!(err, SearchError::NoLegalMoves { in_check: false }));

    let mated = pos("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
    let err = seeded(10).search(&mated, SearchLimits::default()).unwrap_err();
    assert!(matches!(err, SearchError::NoLegalMoves { in_check: true }));
}

#[test]
fn test_same_seed_same_answer() {
    let p = Position::startpos();
    let a = seeded(200).search(&p, SearchLimits::default()).expect("moves");
    let b = seeded(200).search(&p, SearchLimits::default()).expect("moves");
    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.score, b.score);
    assert_eq!(a.nodes, b.nodes);
}

#[test]
fn test_iteration_cap_bounds_tree() {
    let result = seeded(30)
        .search(&Position::startpos(), SearchLimits::default())
        .expect("moves");
    // Root plus one expansion per iteration.
    assert!(result.nodes <= 31);
    assert!(!result.stopped);
}

#[test]
fn test_time_budget_stops_early() {
    let mut engine = Mcts::new(Evaluator::default(), u32::MAX, 1.4, 40).with_seed(1);
    let limits = SearchLimits::depth_and_time(3, Duration::from_millis(50));
    let result = engine.search(&Position::startpos(), limits).expect("moves");
    assert!(result.stopped);
    assert!(Position::startpos().is_legal(&result.best_move));
}
