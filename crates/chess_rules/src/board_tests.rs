use super::*;
use crate::position::Position;

fn sq(text: &str) -> Square {
    text.parse().expect("valid square")
}

fn board(fen: &str) -> Board {
    Position::from_fen(fen).expect("valid fen").board
}

/// The twelve sets must be disjoint and agree with the aggregates.
fn assert_consistent(board: &Board) {
    let mut seen = Bitboard::EMPTY;
    for color in Color::BOTH {
        let mut side = Bitboard::EMPTY;
        for kind in PieceKind::ALL {
            let set = board.pieces(color, kind);
            assert!((seen & set).is_empty(), "overlapping piece sets");
            seen |= set;
            side |= set;
        }
        assert_eq!(side, board.color(color));
        assert!(board.pieces(color, PieceKind::King).popcount() <= 1);
    }
    assert_eq!(seen, board.occupied());
}

#[test]
fn test_standard_board_layout() {
    let b = Board::standard();
    assert_consistent(&b);
    assert_eq!(b.occupied().popcount(), 32);
    assert_eq!(b.piece_at(sq("e1")), Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(b.piece_at(sq("d8")), Some(Piece::new(Color::Black, PieceKind::Queen)));
    assert_eq!(b.piece_at(sq("e4")), None);
    assert_eq!(b.squares_of(Color::White, PieceKind::Knight), vec![sq("b1"), sq("g1")]);
    assert_eq!(b.king_square(Color::Black), Some(sq("e8")));
}

#[test]
fn test_raw_mutators_keep_sets_disjoint() {
    let mut b = Board::standard();
    let captured = b.move_piece(sq("d1"), sq("d7"));
    assert_eq!(captured, Some(Piece::new(Color::Black, PieceKind::Pawn)));
    assert_consistent(&b);

    assert_eq!(b.delete_piece_at(sq("a2")), Some(Piece::new(Color::White, PieceKind::Pawn)));
    assert_eq!(b.delete_piece_at(sq("a2")), None);

    b.promote_pawn(sq("h2"), Color::White, PieceKind::Knight);
    assert_eq!(b.piece_at(sq("h2")), Some(Piece::new(Color::White, PieceKind::Knight)));
    assert_consistent(&b);

    // Moving from an empty square is a no-op.
    let before = b.clone();
    assert_eq!(b.move_piece(sq("e4"), sq("e5")), None);
    assert_eq!(b, before);
}

#[test]
fn test_clone_is_independent() {
    let original = Board::standard();
    let mut copy = original.clone();
    copy.move_piece(sq("e2"), sq("e4"));
    assert_eq!(original.piece_at(sq("e2")).map(|p| p.kind), Some(PieceKind::Pawn));
    assert_eq!(original.piece_at(sq("e4")), None);
    assert_ne!(original, copy);
}

#[test]
fn test_is_attacked_by_each_piece_kind() {
    let b = board("4k3/8/8/3p4/8/1n6/8/R3K2B w - - 0 1");
    // black pawn d5 attacks c4 and e4; nothing black reaches d3
    assert!(b.is_attacked(sq("c4"), Color::Black));
    assert!(b.is_attacked(sq("e4"), Color::Black));
    assert!(!b.is_attacked(sq("d3"), Color::Black));
    // black knight b3
    assert!(b.is_attacked(sq("a1"), Color::Black));
    assert!(b.is_attacked(sq("d2"), Color::Black));
    assert!(b.is_attacked(sq("d4"), Color::Black));
    // white rook a1 along the first rank up to the king
    assert!(b.is_attacked(sq("d1"), Color::White));
    assert!(b.is_attacked(sq("a8"), Color::White));
    // white bishop h1 blocked by nothing until d5
    assert!(b.is_attacked(sq("d5"), Color::White));
    assert!(!b.is_attacked(sq("c6"), Color::White));
    // kings
    assert!(b.is_attacked(sq("d7"), Color::Black));
    assert!(b.is_attacked(sq("f2"), Color::White));
}

#[test]
fn test_check_after_move_does_not_mutate() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").expect("valid fen");
    assert!(pos.board.is_check(Color::White));
    let king = Piece::new(Color::White, PieceKind::King);
    let stay_in_file = Move::new(sq("e1"), sq("f1"), king);
    let capture = Move::new(sq("e1"), sq("e2"), king).with_capture(PieceKind::Rook);
    assert!(!pos.board.is_check_after_move(Color::White, &stay_in_file));
    assert!(!pos.board.is_check_after_move(Color::White, &capture));
    assert_eq!(pos.board.piece_at(sq("e1")), Some(king));
}

#[test]
fn test_apply_move_composites() {
    // en passant removes the pawn beside the mover
    let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("valid fen");
    let ep = pos.parse_move("e5d6").expect("legal");
    assert_eq!(ep.kind, MoveKind::EnPassant);
    let mut b = pos.board.clone();
    b.apply_move(&ep);
    assert_eq!(b.piece_at(sq("d5")), None);
    assert_eq!(b.piece_at(sq("d6")).map(|p| p.kind), Some(PieceKind::Pawn));
    assert_consistent(&b);

    // castling relocates the rook
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").expect("valid fen");
    let castle = pos.parse_move("e8c8").expect("legal");
    assert_eq!(castle.kind, MoveKind::CastleQueenside);
    let mut b = pos.board.clone();
    b.apply_move(&castle);
    assert_eq!(b.piece_at(sq("d8")), Some(Piece::new(Color::Black, PieceKind::Rook)));
    assert_eq!(b.piece_at(sq("a8")), None);
    assert_eq!(b.piece_at(sq("c8")), Some(Piece::new(Color::Black, PieceKind::King)));
}

#[test]
fn test_insufficient_material_cases() {
    let drawn = [
        "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/2B1K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/1N2K3 w - - 0 1",
        "4kb2/8/8/8/8/8/8/4K3 w - - 0 1",
        // bishops on same-colored squares (c1 and f8 are both dark)
        "4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1",
    ];
    for fen in drawn {
        assert!(board(fen).is_draw_by_insufficient_material(), "{fen}");
    }

    let playable = [
        "4k3/8/8/8/8/8/8/R3K3 w - - 0 1",
        "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/3QK3 w - - 0 1",
        // opposite-colored bishops
        "4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1",
        "2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/1NB1K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/1N2K1N1 w - - 0 1",
        "4kn2/8/8/8/8/8/8/2B1K3 w - - 0 1",
    ];
    for fen in playable {
        assert!(!board(fen).is_draw_by_insufficient_material(), "{fen}");
    }
}

#[test]
fn test_checkmate_and_stalemate_are_exclusive() {
    let before = Position::from_fen("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1").expect("valid fen");
    let mate = before.after(&before.parse_move("d1d8").expect("legal"));
    assert!(mate.board.is_checkmate(Color::Black, &mate.header));
    assert!(!mate.board.is_stalemate(Color::Black, Color::Black, &mate.header));

    let stale = Position::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").expect("valid fen");
    assert!(stale.board.is_stalemate(Color::Black, Color::Black, &stale.header));
    assert!(!stale.board.is_checkmate(Color::Black, &stale.header));

    let start = Position::startpos();
    assert!(!start.board.is_checkmate(Color::White, &start.header));
    assert!(!start.board.is_stalemate(Color::White, Color::White, &start.header));
}
