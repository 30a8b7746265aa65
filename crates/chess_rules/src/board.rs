//! Bitboard-backed piece placement.
//!
//! One [`Bitboard`] per (color, kind) plus cached per-color and total
//! occupancy. The twelve piece sets are kept pairwise disjoint: every
//! placement goes through `put` and `remove`, which also maintain the
//! aggregates.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::header::GameHeader;
use crate::movegen;
use crate::types::{Color, Move, MoveKind, Piece, PieceKind, Square};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    pieces: [[Bitboard; 6]; 2],
    by_color: [Bitboard; 2],
    occupied: Bitboard,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard initial placement.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            board.put(Square::at(file), Piece::new(Color::White, kind));
            board.put(Square::at(8 + file), Piece::new(Color::White, PieceKind::Pawn));
            board.put(Square::at(48 + file), Piece::new(Color::Black, PieceKind::Pawn));
            board.put(Square::at(56 + file), Piece::new(Color::Black, kind));
        }
        board
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[inline(always)]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.idx()][kind.idx()]
    }

    /// Both colors' pieces of one kind.
    #[inline(always)]
    pub fn kind(&self, kind: PieceKind) -> Bitboard {
        self.pieces[0][kind.idx()] | self.pieces[1][kind.idx()]
    }

    #[inline(always)]
    pub fn color(&self, color: Color) -> Bitboard {
        self.by_color[color.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Occupied squares for one (color, kind) pair, lowest square first.
    pub fn squares_of(&self, color: Color, kind: PieceKind) -> Vec<Square> {
        self.pieces(color, kind).squares()
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceKind::King).lsb()
    }

    /// The piece on `sq`, or `None` when the square is empty.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if !self.occupied.test(sq) {
            return None;
        }
        let color = if self.by_color[0].test(sq) {
            Color::White
        } else {
            Color::Black
        };
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces(color, kind).test(sq))
            .map(|kind| Piece::new(color, kind))
    }

    /// Iterate over every occupied square with its piece.
    pub fn occupants(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    // =========================================================================
    // Raw mutators (no legality checking)
    // =========================================================================

    /// Place `piece` on `sq`, replacing whatever was there.
    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.remove(sq);
        self.pieces[piece.color.idx()][piece.kind.idx()].set(sq);
        self.by_color[piece.color.idx()].set(sq);
        self.occupied.set(sq);
    }

    /// Empty `sq`, returning the piece that stood there.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        self.pieces[piece.color.idx()][piece.kind.idx()].clear(sq);
        self.by_color[piece.color.idx()].clear(sq);
        self.occupied.clear(sq);
        Some(piece)
    }

    /// Alias of [`Board::remove`] under the name callers of the rules layer use.
    pub fn delete_piece_at(&mut self, sq: Square) -> Option<Piece> {
        self.remove(sq)
    }

    /// Move whatever stands on `from` to `to`, returning any piece captured on
    /// `to`. Does nothing if `from` is empty.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.remove(from)?;
        let captured = self.remove(to);
        self.put(to, piece);
        captured
    }

    /// Replace the piece on `sq` with a `kind` of `color`.
    pub fn promote_pawn(&mut self, sq: Square, color: Color, kind: PieceKind) {
        self.put(sq, Piece::new(color, kind));
    }

    /// Apply a generated move, including its composite side effects: removing
    /// the pawn captured en passant, relocating the castling rook and
    /// swapping in the promotion piece.
    pub fn apply_move(&mut self, mv: &Move) {
        match mv.kind {
            MoveKind::EnPassant => {
                // The captured pawn sits beside the mover, on the destination file.
                let victim = Square::at(mv.from.rank() * 8 + mv.to.file());
                self.remove(victim);
            }
            MoveKind::CastleKingside | MoveKind::CastleQueenside => {
                let (rook_from, rook_to) = castle_rook_squares(mv.piece.color, mv.kind);
                self.move_piece(rook_from, rook_to);
            }
            MoveKind::Normal | MoveKind::DoublePush => {}
        }
        self.move_piece(mv.from, mv.to);
        if let Some(kind) = mv.promotion {
            self.promote_pawn(mv.to, mv.piece.color, kind);
        }
    }

    // =========================================================================
    // Attack and check detection
    // =========================================================================

    /// True iff some piece of `by` attacks `sq`. Pawn pushes are not attacks.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        let occ = self.occupied;
        let queens = self.pieces(by, PieceKind::Queen);

        // A pawn of `by` attacks `sq` iff a pawn of the other color on `sq`
        // would attack that pawn's square.
        (pawn_attacks(sq, by.other()) & self.pieces(by, PieceKind::Pawn)).any()
            || (knight_attacks(sq) & self.pieces(by, PieceKind::Knight)).any()
            || (king_attacks(sq) & self.pieces(by, PieceKind::King)).any()
            || (bishop_attacks(sq, occ) & (self.pieces(by, PieceKind::Bishop) | queens)).any()
            || (rook_attacks(sq, occ) & (self.pieces(by, PieceKind::Rook) | queens)).any()
    }

    /// A side without a king is never in check.
    pub fn is_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_attacked(king, color.other()))
    }

    /// Would `color` be in check after `mv`? Simulated on a copy.
    pub fn is_check_after_move(&self, color: Color, mv: &Move) -> bool {
        let mut next = self.clone();
        next.apply_move(mv);
        next.is_check(color)
    }

    // =========================================================================
    // Move generation and terminal detection
    // =========================================================================

    /// Moves obeying the movement rules of the piece on `sq`, without the
    /// own-king safety filter. Empty for an empty square.
    pub fn pseudo_legal_moves(&self, sq: Square, header: &GameHeader) -> Vec<Move> {
        let mut out = Vec::with_capacity(28);
        movegen::pseudo_legal_moves_into(self, sq, header, &mut out);
        out
    }

    /// Legal moves of the piece on `sq`: pseudo-legal moves that leave the
    /// mover's own king safe.
    pub fn legal_moves(&self, sq: Square, header: &GameHeader) -> Vec<Move> {
        let mut out = self.pseudo_legal_moves(sq, header);
        out.retain(|mv| !self.is_check_after_move(mv.piece.color, mv));
        out
    }

    /// Legal moves of every piece of `color`.
    pub fn all_legal_moves(&self, color: Color, header: &GameHeader) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        movegen::legal_moves_into(self, color, header, &mut out);
        out
    }

    pub fn has_legal_move(&self, color: Color, header: &GameHeader) -> bool {
        movegen::has_legal_move(self, color, header)
    }

    /// In check with no legal reply.
    pub fn is_checkmate(&self, color: Color, header: &GameHeader) -> bool {
        self.is_check(color) && !self.has_legal_move(color, header)
    }

    /// `color` is not in check and `side_to_move` has no legal move.
    pub fn is_stalemate(&self, color: Color, side_to_move: Color, header: &GameHeader) -> bool {
        !self.is_check(color) && !self.has_legal_move(side_to_move, header)
    }

    /// True when neither side can possibly deliver mate.
    ///
    /// Drawn: bare kings; a single minor piece; or bishops only, all
    /// standing on squares of one color (covers K+B v K+B same-colored).
    /// Anything with a pawn, rook or queen, any knight alongside other minor
    /// material, or bishops on both colors is not drawn.
    pub fn is_draw_by_insufficient_material(&self) -> bool {
        let heavy =
            self.kind(PieceKind::Pawn) | self.kind(PieceKind::Rook) | self.kind(PieceKind::Queen);
        if heavy.any() {
            return false;
        }

        let knights = self.kind(PieceKind::Knight);
        let bishops = self.kind(PieceKind::Bishop);
        if knights.popcount() + bishops.popcount() <= 1 {
            return true;
        }
        if knights.any() {
            return false;
        }
        (bishops & Bitboard::LIGHT_SQUARES).is_empty() || (bishops & Bitboard::DARK_SQUARES).is_empty()
    }
}

/// Rook origin and destination for a castling move of `color`.
pub(crate) fn castle_rook_squares(color: Color, kind: MoveKind) -> (Square, Square) {
    match (color, kind) {
        (Color::White, MoveKind::CastleQueenside) => (Square::A1, Square::D1),
        (Color::White, _) => (Square::H1, Square::F1),
        (Color::Black, MoveKind::CastleQueenside) => (Square::A8, Square::D8),
        (Color::Black, _) => (Square::H8, Square::F8),
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
