//! Game metadata that is not visible in piece placement.

use serde::{Deserialize, Serialize};

use crate::types::{Color, Move, MoveKind, PieceKind, Square};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_king_side: true,
        white_queen_side: true,
        black_king_side: true,
        black_queen_side: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        white_king_side: false,
        white_queen_side: false,
        black_king_side: false,
        black_queen_side: false,
    };

    pub fn king_side(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_side,
            Color::Black => self.black_king_side,
        }
    }

    pub fn queen_side(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queen_side,
            Color::Black => self.black_queen_side,
        }
    }

    /// Flags in `K Q k q` order, as used by FEN and hashing.
    pub fn flags(&self) -> [bool; 4] {
        [
            self.white_king_side,
            self.white_queen_side,
            self.black_king_side,
            self.black_queen_side,
        ]
    }

    pub fn any(&self) -> bool {
        self.flags().iter().any(|&f| f)
    }

    /// Drops every right that `mv` destroys: a king move loses both sides,
    /// and any move from or onto a rook's home corner loses that side.
    pub fn revoke_for_move(&mut self, mv: &Move) {
        if mv.piece.kind == PieceKind::King {
            match mv.piece.color {
                Color::White => {
                    self.white_king_side = false;
                    self.white_queen_side = false;
                }
                Color::Black => {
                    self.black_king_side = false;
                    self.black_queen_side = false;
                }
            }
        }
        for sq in [mv.from, mv.to] {
            match sq {
                Square::H1 => self.white_king_side = false,
                Square::A1 => self.white_queen_side = false,
                Square::H8 => self.black_king_side = false,
                Square::A8 => self.black_queen_side = false,
                _ => {}
            }
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::ALL
    }
}

/// Side to move, castling rights, en-passant target and move clocks.
///
/// Board State never touches the header; it is advanced by
/// [`Position::play`](crate::Position::play) once per applied move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameHeader {
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// Square behind a pawn that just advanced two ranks.
    pub en_passant: Option<Square>,
    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl GameHeader {
    /// Header for the standard initial position.
    pub fn standard() -> Self {
        Self {
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Header used when only placement and side to move are known.
    pub fn bare(side_to_move: Color) -> Self {
        Self {
            side_to_move,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Advance the header past `mv`, which must be a move of `side_to_move`.
    pub fn advance(&mut self, mv: &Move) {
        self.en_passant = match mv.kind {
            MoveKind::DoublePush => {
                let mid = (mv.from.index() + mv.to.index()) / 2;
                Some(Square::at(mid))
            }
            _ => None,
        };

        self.castling.revoke_for_move(mv);

        if mv.piece.kind == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other();
    }
}

impl Default for GameHeader {
    fn default() -> Self {
        Self::standard()
    }
}
