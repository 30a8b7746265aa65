use super::*;
use crate::types::PieceKind;

#[test]
fn test_keys_are_distinct() {
    let mut all: Vec<u64> = ZOBRIST.pieces.iter().flatten().copied().collect();
    all.push(ZOBRIST.black_to_move);
    all.extend(ZOBRIST.castling);
    all.extend(ZOBRIST.en_passant_file);
    let total = all.len();
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), total, "zobrist keys must not collide");
    assert!(!all.contains(&0));
}

#[test]
fn test_piece_key_lookup() {
    let white_pawn = Piece::new(Color::White, PieceKind::Pawn);
    let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);
    assert_ne!(ZOBRIST.piece(white_pawn, 12), ZOBRIST.piece(black_pawn, 12));
    assert_ne!(ZOBRIST.piece(white_pawn, 12), ZOBRIST.piece(white_pawn, 13));
}

#[test]
fn test_transposition_gives_same_key() {
    let start = Position::startpos();
    let play = |pos: &Position, text: &str| {
        let mv = pos.parse_move(text).expect("legal move");
        pos.after(&mv)
    };

    let a = ["g1f3", "g8f6", "b1c3", "b8c6"]
        .iter()
        .fold(start.clone(), |pos, m| play(&pos, m));
    let b = ["b1c3", "b8c6", "g1f3", "g8f6"]
        .iter()
        .fold(start.clone(), |pos, m| play(&pos, m));

    assert_eq!(a.key(), b.key());
    assert_ne!(a.key(), start.key());
}

#[test]
fn test_side_and_castling_change_key() {
    let pos = Position::startpos();
    let mut flipped = pos.clone();
    flipped.header.side_to_move = Color::Black;
    assert_ne!(pos.key(), flipped.key());

    let mut no_castle = pos.clone();
    no_castle.header.castling.white_king_side = false;
    assert_ne!(pos.key(), no_castle.key());
}
