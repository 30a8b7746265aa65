use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::types::Piece;

/// Records everything it is told, shared with the test through an `Arc`.
#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<GameEvent>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn events(&self) -> Vec<GameEvent> {
        self.events.lock().expect("lock").clone()
    }

    fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("lock").clone()
    }
}

impl GameObserver for Recorder {
    fn on_game_event(&mut self, event: &GameEvent) {
        self.events.lock().expect("lock").push(event.clone());
    }

    fn on_error(&mut self, error: &ChessError) {
        self.errors.lock().expect("lock").push(error.to_string());
    }
}

fn play_all(game: &mut Game, moves: &[&str]) {
    for text in moves {
        game.play(text).unwrap_or_else(|e| panic!("{text}: {e}"));
    }
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("chess_rules_{}_{name}", std::process::id()))
}

#[test]
fn test_new_game_is_in_progress() {
    let game = Game::new();
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.side_to_move(), Color::White);
    assert_eq!(game.legal_moves().len(), 20);
    assert!(!game.can_undo());
    assert_eq!(game.repetition_count(), 1);
}

#[test]
fn test_accepted_move_updates_header_and_history() {
    let mut game = Game::new();
    play_all(&mut game, &["e2e4", "c7c5", "g1f3"]);
    let h = game.header();
    assert_eq!(h.side_to_move, Color::Black);
    assert_eq!(h.en_passant, None);
    assert_eq!(h.halfmove_clock, 1);
    assert_eq!(h.fullmove_number, 2);
    assert_eq!(game.ply_count(), 3);
    assert_eq!(game.move_list(), "1. e2-e4 c7-c5 2. Ng1-f3");
}

#[test]
fn test_illegal_move_is_rejected_without_mutation() {
    let mut game = Game::new();
    let recorder = Recorder::default();
    game.subscribe(Box::new(recorder.clone()));

    let before = game.position().clone();
    let bogus = Move::new(
        "e2".parse().expect("square"),
        "e5".parse().expect("square"),
        Piece::new(Color::White, PieceKind::Pawn),
    );
    assert!(matches!(game.play_move(bogus), Err(ChessError::IllegalMove { .. })));
    assert!(matches!(game.play("e7e5"), Err(ChessError::UnknownMove { .. })));

    assert_eq!(game.position(), &before);
    assert_eq!(game.ply_count(), 0);
    assert!(recorder.events().is_empty());
    assert_eq!(recorder.errors().len(), 2);
}

#[test]
fn test_fools_mate_is_terminal_and_absorbing() {
    let mut game = Game::new();
    let recorder = Recorder::default();
    game.subscribe(Box::new(recorder.clone()));

    play_all(&mut game, &["f2f3", "e7e5", "g2g4"]);
    let status = game.play("d8h4").expect("legal");
    assert_eq!(status, GameStatus::Checkmate { loser: Color::White });
    assert_eq!(status.winner(), Some(Color::Black));
    assert_eq!(status.result(), "0-1");
    assert!(game.move_list().ends_with("Qd8-h4#"));

    // One notification per accepted move, the last carrying the mate.
    let events = recorder.events();
    assert_eq!(events.len(), 4);
    assert!(matches!(
        events[3],
        GameEvent::MovePlayed {
            status: GameStatus::Checkmate { .. },
            ..
        }
    ));

    assert!(game.legal_moves().is_empty());
    assert!(matches!(game.play("a2a3"), Err(ChessError::GameOver { .. })));
    assert!(matches!(game.resign(Color::White), Err(ChessError::GameOver { .. })));
    assert_eq!(recorder.events().len(), 4);
}

#[test]
fn test_undo_and_redo() {
    let mut game = Game::new();
    let recorder = Recorder::default();
    game.subscribe(Box::new(recorder.clone()));

    play_all(&mut game, &["e2e4", "e7e5"]);
    let after_two = game.position().clone();

    let undone = game.undo().expect("history");
    assert_eq!(undone.to_string(), "e7e5");
    assert_eq!(game.side_to_move(), Color::Black);
    assert_eq!(game.header().en_passant, Some("e3".parse().expect("square")));
    assert!(game.can_redo());

    game.redo().expect("redo");
    assert_eq!(game.position(), &after_two);
    assert!(!game.can_redo());

    // A fresh move after undo discards the redo stack.
    game.undo().expect("history");
    game.play("d7d5").expect("legal");
    assert!(!game.can_redo());
    assert!(matches!(game.redo(), Err(ChessError::NothingToRedo)));

    let kinds: Vec<&str> = recorder
        .events()
        .iter()
        .map(|e| match e {
            GameEvent::MovePlayed { .. } => "played",
            GameEvent::MoveUndone { .. } => "undone",
            GameEvent::MoveRedone { .. } => "redone",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["played", "played", "undone", "redone", "undone", "played"]);

    let mut fresh = Game::new();
    assert!(matches!(fresh.undo(), Err(ChessError::NothingToUndo)));
}

#[test]
fn test_undo_rewinds_checkmate() {
    let mut game = Game::new();
    play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert!(game.is_over());
    game.undo().expect("history");
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.side_to_move(), Color::Black);
}

#[test]
fn test_threefold_repetition_ends_the_game() {
    let mut game = Game::new();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    play_all(&mut game, &shuffle);
    assert_eq!(game.repetition_count(), 2);
    assert_eq!(game.status(), GameStatus::InProgress);

    play_all(&mut game, &shuffle[..3]);
    let status = game.play(shuffle[3]).expect("legal");
    assert_eq!(status, GameStatus::Draw(DrawReason::ThreefoldRepetition));
    assert_eq!(status.result(), "1/2-1/2");

    // Rewinding one ply brings the count back under the limit.
    game.undo().expect("history");
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn test_fifty_move_rule() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").expect("valid");
    assert_eq!(game.status(), GameStatus::InProgress);
    let status = game.play("a1a2").expect("legal");
    assert_eq!(status, GameStatus::Draw(DrawReason::FiftyMoveRule));
}

#[test]
fn test_capture_into_insufficient_material() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").expect("valid");
    let status = game.play("e1e2").expect("legal");
    assert_eq!(status, GameStatus::Draw(DrawReason::InsufficientMaterial));
}

#[test]
fn test_resign_and_draw_agreement() {
    let mut game = Game::new();
    let recorder = Recorder::default();
    game.subscribe(Box::new(recorder.clone()));

    assert_eq!(game.propose_draw(Color::White).expect("open"), GameStatus::InProgress);
    assert!(game.draw_offered_by(Color::White));
    // A move withdraws pending offers.
    game.play("e2e4").expect("legal");
    assert!(!game.draw_offered_by(Color::White));

    game.propose_draw(Color::Black).expect("open");
    let status = game.propose_draw(Color::White).expect("open");
    assert_eq!(status, GameStatus::Draw(DrawReason::Agreement));
    assert!(matches!(
        recorder.events().last(),
        Some(GameEvent::GameEnded { .. })
    ));

    let mut game = Game::new();
    let status = game.resign(Color::Black).expect("open");
    assert_eq!(status, GameStatus::Resigned { loser: Color::Black });
    assert_eq!(status.result(), "1-0");
}

#[test]
fn test_withdrawn_draw_offer_does_not_count() {
    let mut game = Game::new();
    let recorder = Recorder::default();
    game.subscribe(Box::new(recorder.clone()));

    game.propose_draw(Color::White).expect("open");
    game.cancel_draw(Color::White);
    assert!(!game.draw_offered_by(Color::White));

    let status = game.propose_draw(Color::Black).expect("open");
    assert_eq!(status, GameStatus::InProgress);
    assert!(game.draw_offered_by(Color::Black));

    let offers: Vec<Color> = recorder
        .events()
        .iter()
        .filter_map(|event| match event {
            GameEvent::DrawOffered { by } => Some(*by),
            _ => None,
        })
        .collect();
    assert_eq!(offers, vec![Color::White, Color::Black]);
    assert_eq!(recorder.events().len(), 2);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let mut game = Game::new();
    let a = Recorder::default();
    let b = Recorder::default();
    let id_a = game.subscribe(Box::new(a.clone()));
    game.subscribe(Box::new(b.clone()));
    assert_eq!(game.observer_count(), 2);

    game.play("e2e4").expect("legal");
    assert!(game.unsubscribe(id_a));
    assert!(!game.unsubscribe(id_a));
    assert_eq!(game.observer_count(), 1);
    game.play("e7e5").expect("legal");

    assert_eq!(a.events().len(), 1);
    assert_eq!(b.events().len(), 2);
}

#[test]
fn test_exploration_copy_is_silent_and_independent() {
    let mut game = Game::new();
    let recorder = Recorder::default();
    game.subscribe(Box::new(recorder.clone()));
    game.play("e2e4").expect("legal");

    let mut scratch = game.exploration_copy();
    assert!(scratch.is_exploration());
    play_all(&mut scratch, &["e7e5", "g1f3"]);
    let _ = scratch.play("a1a8");

    assert_eq!(recorder.events().len(), 1);
    assert!(recorder.errors().is_empty());
    assert_eq!(game.ply_count(), 1);
    assert_eq!(scratch.ply_count(), 3);
}

#[test]
fn test_load_validation() {
    assert!(matches!(
        Game::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
        Err(ChessError::InvalidPosition { .. })
    ));
    // Black is in check with white to move.
    assert!(matches!(
        Game::from_fen("4k3/8/8/8/8/8/8/4RK2 w - - 0 1"),
        Err(ChessError::InvalidPosition { .. })
    ));
    assert!(matches!(
        Game::from_fen("not a fen"),
        Err(ChessError::MalformedFen { .. })
    ));
}

#[test]
fn test_save_and_load_both_formats() {
    let mut game = Game::new();
    play_all(&mut game, &["e2e4", "e7e5", "g1f3"]);

    let fen_path = temp_path("save.fen");
    game.save_fen(&fen_path).expect("writable temp dir");
    let loaded = Game::load(&fen_path).expect("readable");
    assert_eq!(loaded.position(), game.position());

    let snap_path = temp_path("save.txt");
    game.save_snapshot(&snap_path).expect("writable temp dir");
    let loaded = Game::load(&snap_path).expect("readable");
    for sq in Square::all() {
        assert_eq!(loaded.board().piece_at(sq), game.board().piece_at(sq));
    }
    assert_eq!(loaded.side_to_move(), Color::Black);

    let _ = std::fs::remove_file(fen_path);
    let _ = std::fs::remove_file(snap_path);
}

#[test]
fn test_snapshot_reload_keeps_lost_castling() {
    let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid");
    play_all(&mut game, &["e1d1", "e8d8", "d1e1", "d8e8"]);
    assert_eq!(game.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w - - 4 3");

    let text = game.to_snapshot();
    assert!(text.starts_with("W\n- - 4 3\n"));
    let mut reloaded = Game::from_snapshot(&text).expect("snapshot parses");
    assert_eq!(reloaded.to_fen(), game.to_fen());
    assert!(reloaded.play("e1g1").is_err());
    assert!(reloaded.play("e1c1").is_err());
    assert_eq!(reloaded.ply_count(), 0);
}

#[test]
fn test_record_replays_history() {
    let mut game = Game::new();
    play_all(
        &mut game,
        &[
            "e2e4", "d7d5", "e4d5", "g8f6", "f1b5", "c7c6", "d5c6", "b8c6", "g1f3", "e7e5", "e1g1",
        ],
    );
    assert_eq!(
        game.move_list(),
        "1. e2-e4 d7-d5 2. e4xd5 Ng8-f6 3. Bf1-b5+ c7-c6 4. d5xc6 Nb8xc6 5. Ng1-f3 e7-e5 6. O-O"
    );

    let path = temp_path("record.txt");
    game.save_record(&path).expect("writable temp dir");
    let mut loaded = Game::load(&path).expect("readable");
    let _ = std::fs::remove_file(path);

    assert_eq!(loaded.position(), game.position());
    assert_eq!(loaded.start_position(), &Position::startpos());
    assert_eq!(loaded.moves(), game.moves());
    assert_eq!(loaded.move_list(), game.move_list());
    assert_eq!(loaded.repetition_count(), game.repetition_count());

    // History survives the round trip, so the castle can be taken back.
    let castle = loaded.undo().expect("history was replayed");
    assert!(castle.is_castle());
    assert_eq!(loaded.side_to_move(), Color::White);
}

#[test]
fn test_move_list_files_and_trailing_moves() {
    let text = "# opening\n1.e2-e4 e7-e5\n2. Ng1-f3 Nb8-c6 *\n";
    let game = Game::from_move_list(text).expect("legal moves");
    assert_eq!(game.ply_count(), 4);
    assert_eq!(game.side_to_move(), Color::White);

    let path = temp_path("moves.txt");
    std::fs::write(&path, text).expect("writable temp dir");
    let loaded = Game::load(&path).expect("readable");
    assert_eq!(loaded.position(), game.position());

    // Moves after a FEN line are replayed from that position.
    std::fs::write(&path, "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1\n1. e2-e4 Ke8-d7\n").expect("writable");
    let loaded = Game::load(&path).expect("readable");
    assert_eq!(loaded.ply_count(), 2);
    assert_eq!(loaded.to_fen(), "8/3k4/8/8/4P3/8/8/4K3 w - - 1 2");
    let _ = std::fs::remove_file(path);

    assert!(matches!(
        Game::from_move_list("1. e2-e5"),
        Err(ChessError::UnknownMove { .. })
    ));
    assert!(matches!(
        Game::from_move_list("1. Ng1-e2"),
        Err(ChessError::UnknownMove { .. })
    ));
}

#[test]
fn test_clock_forfeits_the_side_to_move() {
    let mut game = Game::new().with_clock(Duration::from_millis(5));
    let recorder = Recorder::default();
    game.subscribe(Box::new(recorder.clone()));
    std::thread::sleep(Duration::from_millis(15));

    let forfeit = GameStatus::TimeForfeit { loser: Color::White };
    assert!(matches!(
        game.play("e2e4"),
        Err(ChessError::GameOver { status }) if status == forfeit
    ));
    assert_eq!(game.status(), forfeit);
    assert_eq!(forfeit.result(), "0-1");
    assert_eq!(game.ply_count(), 0);
    assert_eq!(game.time_remaining(Color::Black), Some(Duration::from_millis(5)));
    assert!(matches!(
        recorder.events().first(),
        Some(GameEvent::GameEnded { status }) if *status == forfeit
    ));
}

#[test]
fn test_clock_passes_with_the_move() {
    assert_eq!(Game::new().time_remaining(Color::White), None);

    let budget = Duration::from_secs(60);
    let mut game = Game::new().with_clock(budget);
    std::thread::sleep(Duration::from_millis(2));
    game.play("e2e4").expect("legal");
    let white = game.time_remaining(Color::White).expect("timed");
    assert!(white < budget);

    std::thread::sleep(Duration::from_millis(2));
    assert_eq!(game.time_remaining(Color::White), Some(white));
    assert!(game.time_remaining(Color::Black).expect("timed") < budget);
    assert_eq!(game.check_time(), GameStatus::InProgress);
}

#[test]
fn test_io_failures_surface_as_errors() {
    let missing = temp_path("missing/nowhere.fen");
    assert!(matches!(Game::load(&missing), Err(ChessError::Load { .. })));

    let game = Game::new();
    assert!(matches!(game.save_fen(&missing), Err(ChessError::Save { .. })));
    assert_eq!(game.status(), GameStatus::InProgress);
}
