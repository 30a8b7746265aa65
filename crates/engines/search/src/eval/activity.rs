use chess_rules::attacks::piece_attacks;
use chess_rules::{Bitboard, Color, PieceKind, Position, Square};

use super::endgame_phase;

const MOBILITY_WEIGHT: i32 = 4;
const CHECK_BONUS: i32 = 50;
const DEVELOPED_MINOR: i32 = 15;
const CASTLED_KING: i32 = 25;
const BISHOP_PAIR: i32 = 30;
const ENDGAME_BISHOP: i32 = 15;

/// c3..f6 minus the four center squares.
const EXTENDED_CENTER: Bitboard = Bitboard(0x0000_3C24_243C_0000);

/// Every square `color` attacks, counted once.
fn controlled(pos: &Position, color: Color) -> Bitboard {
    let occupied = pos.board.occupied();
    let mut seen = Bitboard::EMPTY;
    for kind in PieceKind::ALL {
        for sq in pos.board.pieces(color, kind) {
            seen |= piece_attacks(kind, color, sq, occupied);
        }
    }
    seen
}

fn enemy_half(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard(0xFFFF_FFFF_0000_0000),
        Color::Black => Bitboard(0x0000_0000_FFFF_FFFF),
    }
}

fn side_space(pos: &Position, color: Color) -> i32 {
    let seen = controlled(pos, color);
    3 * (seen & Bitboard::CENTER).popcount() as i32
        + 2 * (seen & EXTENDED_CENTER).popcount() as i32
        + (seen & enemy_half(color)).popcount() as i32
}

pub(super) fn space_control(pos: &Position, side: Color) -> i32 {
    side_space(pos, side) - side_space(pos, side.other())
}

fn side_mobility(pos: &Position, color: Color) -> i32 {
    let occupied = pos.board.occupied();
    let own = pos.board.color(color);
    let mut count = 0;
    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        for sq in pos.board.pieces(color, kind) {
            count += (piece_attacks(kind, color, sq, occupied) & !own).popcount() as i32;
        }
    }
    MOBILITY_WEIGHT * count
}

pub(super) fn mobility(pos: &Position, side: Color) -> i32 {
    side_mobility(pos, side) - side_mobility(pos, side.other())
}

pub(super) fn check(pos: &Position, side: Color) -> i32 {
    let mut score = 0;
    if pos.board.is_check(side.other()) {
        score += CHECK_BONUS;
    }
    if pos.board.is_check(side) {
        score -= CHECK_BONUS;
    }
    score
}

fn side_development(pos: &Position, color: Color) -> i32 {
    let back_rank = Bitboard::rank(color.home_rank());
    let minors = pos.board.pieces(color, PieceKind::Knight) | pos.board.pieces(color, PieceKind::Bishop);
    let mut score = DEVELOPED_MINOR * (minors & !back_rank).popcount() as i32;

    let castled = match color {
        Color::White => [Square::G1, Square::C1, Square::B1],
        Color::Black => [Square::G8, Square::C8, Square::B8],
    };
    if let Some(king) = pos.board.king_square(color)
        && castled.contains(&king)
    {
        score += CASTLED_KING;
    }
    score
}

pub(super) fn development(pos: &Position, side: Color) -> i32 {
    side_development(pos, side) - side_development(pos, side.other())
}

fn side_bishops(pos: &Position, color: Color, phase: i32) -> i32 {
    let bishops = pos.board.pieces(color, PieceKind::Bishop);
    let mut score = 0;
    if (bishops & Bitboard::LIGHT_SQUARES).any() && (bishops & Bitboard::DARK_SQUARES).any() {
        score += BISHOP_PAIR;
    }
    score + ENDGAME_BISHOP * bishops.popcount() as i32 * phase / 256
}

pub(super) fn bishops(pos: &Position, side: Color) -> i32 {
    let phase = endgame_phase(pos);
    side_bishops(pos, side, phase) - side_bishops(pos, side.other(), phase)
}
