//! A board together with its header: the unit that search clones and that the
//! game controller advances.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::error::{ChessError, ChessResult};
use crate::game::{DrawReason, GameStatus};
use crate::header::GameHeader;
use crate::types::{Color, Move, PieceKind};
use crate::zobrist;

/// Half-move clock value at which the fifty-move rule ends the game.
pub const FIFTY_MOVE_PLIES: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    pub header: GameHeader,
}

impl Position {
    pub fn new(board: Board, header: GameHeader) -> Self {
        Self { board, header }
    }

    pub fn startpos() -> Self {
        Self::new(Board::standard(), GameHeader::standard())
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.header.side_to_move
    }

    /// Legal moves of the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.all_legal_moves(self.side_to_move(), &self.header)
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        mv.piece.color == self.side_to_move()
            && self
                .board
                .legal_moves(mv.from, &self.header)
                .contains(mv)
    }

    /// Is the side to move in check?
    pub fn is_check(&self) -> bool {
        self.board.is_check(self.side_to_move())
    }

    /// Apply `mv` without validating it and advance the header.
    pub fn play(&mut self, mv: &Move) {
        self.board.apply_move(mv);
        self.header.advance(mv);
    }

    /// The position after `mv`, leaving `self` untouched.
    pub fn after(&self, mv: &Move) -> Position {
        let mut next = self.clone();
        next.play(mv);
        next
    }

    /// Zobrist key over placement, side to move, castling rights and the
    /// en-passant file.
    pub fn key(&self) -> u64 {
        zobrist::position_key(self)
    }

    /// Terminal status decidable from this position alone, checked in the
    /// order checkmate, stalemate, insufficient material, fifty-move rule.
    /// Repetition needs history and is left to the game controller.
    pub fn status(&self) -> GameStatus {
        let side = self.side_to_move();
        if !self.board.has_legal_move(side, &self.header) {
            return if self.board.is_check(side) {
                GameStatus::Checkmate { loser: side }
            } else {
                GameStatus::Stalemate
            };
        }
        if self.board.is_draw_by_insufficient_material() {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }
        if self.header.halfmove_clock >= FIFTY_MOVE_PLIES {
            return GameStatus::Draw(DrawReason::FiftyMoveRule);
        }
        GameStatus::InProgress
    }

    /// Reject placements no game can reach: each side needs exactly one
    /// king, no pawns may stand on a back rank, and the side that just
    /// moved cannot be in check.
    pub fn validate(&self) -> ChessResult<()> {
        for color in Color::BOTH {
            let kings = self.board.pieces(color, PieceKind::King).popcount();
            if kings != 1 {
                return Err(ChessError::InvalidPosition {
                    reason: format!("{color} has {kings} kings"),
                });
            }
        }
        let back_ranks = Bitboard::RANK_1 | Bitboard::RANK_8;
        if (self.board.kind(PieceKind::Pawn) & back_ranks).any() {
            return Err(ChessError::InvalidPosition {
                reason: "pawn on a back rank".to_string(),
            });
        }
        let waiting = self.side_to_move().other();
        if self.board.is_check(waiting) {
            return Err(ChessError::InvalidPosition {
                reason: format!("{waiting} is in check but it is not their move"),
            });
        }
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
