//! Value types shared by every layer: colors, pieces, squares and moves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline(always)]
    pub const fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline(always)]
    pub const fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Rank direction pawns of this color advance in.
    #[inline(always)]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Back rank index (0 for white, 7 for black).
    #[inline(always)]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion targets, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self as usize
    }

    /// Upper-case letter used by FEN, snapshots and move lists.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Inverse of [`PieceKind::letter`], case-insensitive.
    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A colored piece. An unoccupied square is `Option::<Piece>::None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Upper-case for white, lower-case for black.
    pub fn to_char(self) -> char {
        let c = self.kind.letter();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_letter(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { color, kind })
    }
}

/// A board square, 0 = a1 through 63 = h8.
///
/// Construction from untrusted input is bounds-checked, so every `Square`
/// in circulation addresses a real square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    /// Bounds-checked constructor from a raw index.
    pub fn new(index: u8) -> ChessResult<Square> {
        if index < 64 {
            Ok(Square(index))
        } else {
            Err(ChessError::OutOfBounds {
                index: i32::from(index),
            })
        }
    }

    /// Bounds-checked constructor from file (0 = a) and rank (0 = rank 1).
    pub fn from_coords(file: i8, rank: i8) -> ChessResult<Square> {
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Ok(Square((rank * 8 + file) as u8))
        } else {
            Err(ChessError::OutOfBounds {
                index: i32::from(rank) * 8 + i32::from(file),
            })
        }
    }

    /// Internal constructor for indices already known to be in range.
    #[inline(always)]
    pub(crate) const fn at(index: u8) -> Square {
        debug_assert!(index < 64);
        Square(index & 63)
    }

    #[inline(always)]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    #[inline(always)]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// The square `df` files and `dr` ranks away, if it is on the board.
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let f = self.file() as i8 + df;
        let r = self.rank() as i8 + dr;
        Square::from_coords(f, r).ok()
    }

    /// Same file, mirrored rank (a1 <-> a8).
    #[inline(always)]
    pub const fn flip_rank(self) -> Square {
        Square(self.0 ^ 56)
    }

    /// a1 is dark, so light squares have odd file + rank.
    #[inline(always)]
    pub const fn is_light(self) -> bool {
        (self.file() + self.rank()) % 2 == 1
    }

    /// Chebyshev (king-move) distance.
    pub fn distance(self, other: Square) -> u8 {
        let df = self.file().abs_diff(other.file());
        let dr = self.rank().abs_diff(other.rank());
        df.max(dr)
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }
}

impl TryFrom<u8> for Square {
    type Error = ChessError;

    fn try_from(index: u8) -> ChessResult<Square> {
        Square::new(index)
    }
}

impl From<Square> for u8 {
    fn from(sq: Square) -> u8 {
        sq.0
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> ChessResult<Square> {
        let bytes = s.as_bytes();
        let invalid = || ChessError::InvalidSquare {
            text: s.to_string(),
        };
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file >= 8 || rank >= 8 {
            return Err(invalid());
        }
        Ok(Square(rank * 8 + file))
    }
}

/// How a move changes the board beyond lifting and dropping one piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Normal,
    DoublePush,
    EnPassant,
    CastleKingside,
    CastleQueenside,
}

/// A fully described move. Equality is structural.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// The piece that moves (a pawn for promotions).
    pub piece: Piece,
    /// Kind of the captured piece, if any.
    pub capture: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub kind: MoveKind,
}

impl Move {
    pub const fn new(from: Square, to: Square, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            capture: None,
            promotion: None,
            kind: MoveKind::Normal,
        }
    }

    pub const fn with_capture(mut self, captured: PieceKind) -> Self {
        self.capture = Some(captured);
        self
    }

    pub const fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    pub const fn with_kind(mut self, kind: MoveKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.capture.is_some()
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::CastleKingside | MoveKind::CastleQueenside
        )
    }

    /// Readable long-algebraic form used in move lists: `Ng1-f3`, `e5xd6`,
    /// `e7-e8=Q`, `O-O`.
    pub fn long_algebraic(&self) -> String {
        match self.kind {
            MoveKind::CastleKingside => return "O-O".to_string(),
            MoveKind::CastleQueenside => return "O-O-O".to_string(),
            _ => {}
        }
        let mut out = String::with_capacity(8);
        if self.piece.kind != PieceKind::Pawn {
            out.push(self.piece.kind.letter());
        }
        out.push_str(&self.from.to_string());
        out.push(if self.is_capture() { 'x' } else { '-' });
        out.push_str(&self.to.to_string());
        if let Some(promo) = self.promotion {
            out.push('=');
            out.push(promo.letter());
        }
        out
    }
}

/// Coordinate notation: `e2e4`, `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_bounds_are_checked() {
        assert!(Square::new(63).is_ok());
        assert!(matches!(
            Square::new(64),
            Err(ChessError::OutOfBounds { index: 64 })
        ));
        assert!(Square::from_coords(8, 0).is_err());
        assert!(Square::from_coords(0, -1).is_err());
        assert_eq!(Square::from_coords(4, 3).map(|s| s.index()).ok(), Some(28));
    }

    #[test]
    fn square_text_round_trip() {
        let sq: Square = "e4".parse().expect("valid square");
        assert_eq!(sq.file(), 4);
        assert_eq!(sq.rank(), 3);
        assert_eq!(sq.to_string(), "e4");
        assert!("i1".parse::<Square>().is_err());
        assert!("e9".parse::<Square>().is_err());
        assert!("e".parse::<Square>().is_err());
    }

    #[test]
    fn square_colors() {
        assert!(!Square::A1.is_light());
        assert!(Square::B1.is_light());
        assert!(Square::H1.is_light());
        assert!(!Square::H8.is_light());
    }

    #[test]
    fn piece_letters_map_both_ways() {
        for kind in PieceKind::ALL {
            for color in Color::BOTH {
                let piece = Piece::new(color, kind);
                assert_eq!(Piece::from_char(piece.to_char()), Some(piece));
            }
        }
        assert_eq!(Piece::from_char('_'), None);
        assert_eq!(Piece::new(Color::Black, PieceKind::Knight).to_char(), 'n');
    }

    #[test]
    fn move_text_forms() {
        let pawn = Piece::new(Color::White, PieceKind::Pawn);
        let mv = Move::new(Square::at(52), Square::at(60), pawn).with_promotion(PieceKind::Queen);
        assert_eq!(mv.to_string(), "e7e8q");
        assert_eq!(mv.long_algebraic(), "e7-e8=Q");

        let king = Piece::new(Color::White, PieceKind::King);
        let castle = Move::new(Square::E1, Square::G1, king).with_kind(MoveKind::CastleKingside);
        assert_eq!(castle.long_algebraic(), "O-O");
        assert!(castle.is_castle());
    }
}
