use chess_rules::attacks::pawn_attacks;
use chess_rules::{Bitboard, Color, PieceKind, Position, Square};

const DOUBLED: i32 = -20;
const ISOLATED: i32 = -15;
const PASSED_BASE: i32 = 10;
const PASSED_PER_RANK: i32 = 10;
const CHAIN: i32 = 5;

/// Rank counted from `color`'s own back rank (0..=7).
pub(crate) fn relative_rank(sq: Square, color: Color) -> u8 {
    match color {
        Color::White => sq.rank(),
        Color::Black => 7 - sq.rank(),
    }
}

fn adjacent_files(file: u8) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    if file > 0 {
        mask |= Bitboard::file(file - 1);
    }
    if file < 7 {
        mask |= Bitboard::file(file + 1);
    }
    mask
}

/// No enemy pawn ahead of `sq` on its own or an adjacent file.
pub(crate) fn is_passed(pos: &Position, sq: Square, color: Color) -> bool {
    let enemy = pos.board.pieces(color.other(), PieceKind::Pawn);
    let lanes = adjacent_files(sq.file()) | Bitboard::file(sq.file());
    (enemy & lanes)
        .find(|e| match color {
            Color::White => e.rank() > sq.rank(),
            Color::Black => e.rank() < sq.rank(),
        })
        .is_none()
}

pub(crate) fn passed_pawns(pos: &Position, color: Color) -> Vec<Square> {
    pos.board
        .pieces(color, PieceKind::Pawn)
        .filter(|&sq| is_passed(pos, sq, color))
        .collect()
}

fn side_structure(pos: &Position, color: Color) -> i32 {
    let pawns = pos.board.pieces(color, PieceKind::Pawn);
    let mut score = 0;

    for file in 0..8 {
        let count = (pawns & Bitboard::file(file)).popcount() as i32;
        if count > 1 {
            score += DOUBLED * (count - 1);
        }
    }

    for sq in pawns {
        if (pawns & adjacent_files(sq.file())).is_empty() {
            score += ISOLATED;
        }
        if is_passed(pos, sq, color) {
            let advance = i32::from(relative_rank(sq, color)) - 1;
            score += PASSED_BASE + PASSED_PER_RANK * advance.max(0);
        }
        // Defended by a friendly pawn: look along the enemy's capture
        // directions from this square.
        if (pawn_attacks(sq, color.other()) & pawns).any() {
            score += CHAIN;
        }
    }
    score
}

pub(super) fn structure(pos: &Position, side: Color) -> i32 {
    side_structure(pos, side) - side_structure(pos, side.other())
}

fn side_promotion(pos: &Position, color: Color) -> i32 {
    pos.board
        .pieces(color, PieceKind::Pawn)
        .map(|sq| match relative_rank(sq, color) {
            6 => 60,
            5 => 30,
            _ => 0,
        })
        .sum()
}

pub(super) fn promotion(pos: &Position, side: Color) -> i32 {
    side_promotion(pos, side) - side_promotion(pos, side.other())
}
