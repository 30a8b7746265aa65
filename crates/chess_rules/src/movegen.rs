//! Pseudo-legal generation per piece and the own-king safety filter.
//!
//! Legality is decided by simulation: each candidate is applied to a copy of
//! the board and dropped if it leaves the mover's king attacked.

use crate::attacks::{king_attacks, pawn_attacks, piece_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::header::GameHeader;
use crate::types::{Color, Move, MoveKind, Piece, PieceKind, Square};

/// Append the pseudo-legal moves of the piece on `from` to `out`.
pub fn pseudo_legal_moves_into(board: &Board, from: Square, header: &GameHeader, out: &mut Vec<Move>) {
    let Some(piece) = board.piece_at(from) else {
        return;
    };
    match piece.kind {
        PieceKind::Pawn => gen_pawn(board, from, piece, header, out),
        PieceKind::King => {
            push_targets(board, from, piece, king_attacks(from), out);
            gen_castles(board, from, piece, header, out);
        }
        kind => {
            let targets = piece_attacks(kind, piece.color, from, board.occupied());
            push_targets(board, from, piece, targets, out);
        }
    }
}

/// Replace the contents of `out` with every legal move of `color`.
pub fn legal_moves_into(board: &Board, color: Color, header: &GameHeader, out: &mut Vec<Move>) {
    out.clear();
    for from in board.color(color) {
        pseudo_legal_moves_into(board, from, header, out);
    }
    out.retain(|mv| !board.is_check_after_move(color, mv));
}

/// Short-circuiting variant of [`legal_moves_into`] for terminal checks.
pub fn has_legal_move(board: &Board, color: Color, header: &GameHeader) -> bool {
    let mut buf = Vec::with_capacity(28);
    for from in board.color(color) {
        buf.clear();
        pseudo_legal_moves_into(board, from, header, &mut buf);
        if buf.iter().any(|mv| !board.is_check_after_move(color, mv)) {
            return true;
        }
    }
    false
}

/// Moves to every square in `targets` not occupied by the mover's own side.
fn push_targets(board: &Board, from: Square, piece: Piece, targets: Bitboard, out: &mut Vec<Move>) {
    for to in targets & !board.color(piece.color) {
        let mv = Move::new(from, to, piece);
        out.push(match board.piece_at(to) {
            Some(victim) => mv.with_capture(victim.kind),
            None => mv,
        });
    }
}

fn push_pawn_move(mv: Move, promo_rank: u8, out: &mut Vec<Move>) {
    if mv.to.rank() == promo_rank {
        out.extend(PieceKind::PROMOTIONS.iter().map(|&kind| mv.with_promotion(kind)));
    } else {
        out.push(mv);
    }
}

fn gen_pawn(board: &Board, from: Square, pawn: Piece, header: &GameHeader, out: &mut Vec<Move>) {
    let color = pawn.color;
    let dir = color.forward();
    let start_rank = match color {
        Color::White => 1,
        Color::Black => 6,
    };
    let promo_rank = color.other().home_rank();

    // Pushes
    if let Some(one) = from.offset(0, dir)
        && board.piece_at(one).is_none()
    {
        push_pawn_move(Move::new(from, one, pawn), promo_rank, out);

        if from.rank() == start_rank
            && let Some(two) = from.offset(0, 2 * dir)
            && board.piece_at(two).is_none()
        {
            out.push(Move::new(from, two, pawn).with_kind(MoveKind::DoublePush));
        }
    }

    // Captures, including en passant onto the header's target square
    for to in pawn_attacks(from, color) {
        match board.piece_at(to) {
            Some(victim) if victim.color != color => {
                push_pawn_move(Move::new(from, to, pawn).with_capture(victim.kind), promo_rank, out);
            }
            None if header.en_passant == Some(to) && header.side_to_move == color => {
                let beside = Square::at(from.rank() * 8 + to.file());
                if board.piece_at(beside) == Some(Piece::new(color.other(), PieceKind::Pawn)) {
                    out.push(
                        Move::new(from, to, pawn)
                            .with_capture(PieceKind::Pawn)
                            .with_kind(MoveKind::EnPassant),
                    );
                }
            }
            _ => {}
        }
    }
}

/// Castling needs the right, the rook on its corner, empty squares between,
/// and a king that is neither in check nor crossing an attacked square. The
/// landing square is left to the legality filter.
fn gen_castles(board: &Board, from: Square, king: Piece, header: &GameHeader, out: &mut Vec<Move>) {
    let color = king.color;
    let base = color.home_rank() * 8;
    if from.index() != base + 4 {
        return;
    }
    let enemy = color.other();
    if board.is_attacked(from, enemy) {
        return;
    }

    let rook = Some(Piece::new(color, PieceKind::Rook));
    let empty = |offset: u8| board.piece_at(Square::at(base + offset)).is_none();
    let safe = |offset: u8| !board.is_attacked(Square::at(base + offset), enemy);

    if header.castling.king_side(color)
        && board.piece_at(Square::at(base + 7)) == rook
        && empty(5)
        && empty(6)
        && safe(5)
    {
        out.push(Move::new(from, Square::at(base + 6), king).with_kind(MoveKind::CastleKingside));
    }

    if header.castling.queen_side(color)
        && board.piece_at(Square::at(base)) == rook
        && empty(1)
        && empty(2)
        && empty(3)
        && safe(3)
    {
        out.push(Move::new(from, Square::at(base + 2), king).with_kind(MoveKind::CastleQueenside));
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
