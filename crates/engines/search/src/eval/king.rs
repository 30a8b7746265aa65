use chess_rules::attacks::king_attacks;
use chess_rules::{Color, PieceKind, Position, Square};

use super::pawns::{passed_pawns, relative_rank};
use super::endgame_phase;

const SHIELD_PAWN: i32 = 12;
const ZONE_ATTACK: i32 = 10;
const CENTRAL_KING: i32 = 20;

fn side_safety(pos: &Position, color: Color) -> i32 {
    let Some(king) = pos.board.king_square(color) else {
        return 0;
    };
    let own_pawns = pos.board.pieces(color, PieceKind::Pawn);
    let forward = color.forward();

    let mut score = 0;
    for df in -1..=1 {
        for step in 1..=2 {
            if let Some(sq) = king.offset(df, forward * step)
                && own_pawns.test(sq)
            {
                score += SHIELD_PAWN;
            }
        }
    }

    let zone = king_attacks(king);
    let enemy = color.other();
    let attacked = zone.filter(|&sq| pos.board.is_attacked(sq, enemy)).count() as i32;
    score -= ZONE_ATTACK * attacked;

    let queens_on = pos.board.kind(PieceKind::Queen).any();
    if queens_on && (2..=5).contains(&king.file()) && relative_rank(king, color) == 0 {
        score -= CENTRAL_KING;
    }
    score
}

pub(super) fn safety(pos: &Position, side: Color) -> i32 {
    side_safety(pos, side) - side_safety(pos, side.other())
}

/// Manhattan-like distance from the four center squares (0 on d4..e5).
fn center_distance(sq: Square) -> i32 {
    let f = i32::from(sq.file());
    let r = i32::from(sq.rank());
    let df = (2 * f - 7).abs() / 2;
    let dr = (2 * r - 7).abs() / 2;
    df + dr
}

fn side_endgame(pos: &Position, color: Color, phase: i32) -> i32 {
    let activity = pos
        .board
        .king_square(color)
        .map(|k| 20 - 3 * center_distance(k))
        .unwrap_or(0);
    let passers: i32 = passed_pawns(pos, color)
        .into_iter()
        .map(|sq| 10 * i32::from(relative_rank(sq, color)))
        .sum();
    (activity + passers) * phase / 256
}

pub(super) fn endgame(pos: &Position, side: Color) -> i32 {
    let phase = endgame_phase(pos);
    side_endgame(pos, side, phase) - side_endgame(pos, side.other(), phase)
}

/// In king-and-pawn endings the side *not* to move holds the opposition
/// when the kings face each other with an odd number of squares between.
pub(super) fn opposition(pos: &Position, side: Color) -> i32 {
    let board = &pos.board;
    let only_pawns = [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen]
        .iter()
        .all(|&k| board.kind(k).is_empty());
    if !only_pawns {
        return 0;
    }
    let (Some(wk), Some(bk)) = (board.king_square(Color::White), board.king_square(Color::Black))
    else {
        return 0;
    };
    let df = wk.file().abs_diff(bk.file());
    let dr = wk.rank().abs_diff(bk.rank());
    let opposed = (df == 0 && dr % 2 == 0 && dr > 0) || (dr == 0 && df % 2 == 0 && df > 0);
    if !opposed {
        return 0;
    }
    let holder = pos.side_to_move().other();
    if holder == side { 30 } else { -30 }
}
