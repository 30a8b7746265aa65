//! Text formats: FEN, the board snapshot format and coordinate moves.
//!
//! Snapshot layout: line 1 is `W` or `B`; an optional header line follows
//! with the last four FEN fields (`KQkq - 0 1`); the next eight lines are
//! ranks 8 down to 1, each eight space-separated characters (`PRBNQK` white,
//! `prbnqk` black, `_` empty), files a to h. A numbered move list may trail
//! the board. Lines starting with `#` are comments.

use std::fmt::Write as _;

use crate::board::Board;
use crate::error::{ChessError, ChessResult};
use crate::header::{CastlingRights, GameHeader};
use crate::position::Position;
use crate::types::{Color, Move, MoveKind, Piece, PieceKind, Square};

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Tail emitted after placement and side when no header is known.
const BARE_FEN_TAIL: &str = "- - 0 1";

const EMPTY_CELL: char = '_';

// =============================================================================
// FEN
// =============================================================================

fn fen_err(reason: impl Into<String>) -> ChessError {
    ChessError::MalformedFen {
        reason: reason.into(),
    }
}

fn parse_placement(field: &str) -> ChessResult<Board> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(fen_err(format!("expected 8 ranks, found {}", ranks.len())));
    }

    let mut board = Board::empty();
    for (row, text) in ranks.iter().enumerate() {
        let rank = 7 - row as i8;
        let mut file: i8 = 0;
        for ch in text.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if skip == 0 || skip > 8 {
                    return Err(fen_err(format!("bad empty-run digit '{ch}'")));
                }
                file += skip as i8;
            } else {
                let piece =
                    Piece::from_char(ch).ok_or_else(|| fen_err(format!("bad piece letter '{ch}'")))?;
                let sq = Square::from_coords(file, rank)
                    .map_err(|_| fen_err(format!("rank {} overflows", rank + 1)))?;
                board.put(sq, piece);
                file += 1;
            }
            if file > 8 {
                return Err(fen_err(format!("rank {} overflows", rank + 1)));
            }
        }
        if file != 8 {
            return Err(fen_err(format!("rank {} has {file} files", rank + 1)));
        }
    }
    Ok(board)
}

fn parse_side(field: &str) -> ChessResult<Color> {
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        other => Err(fen_err(format!("bad side to move '{other}'"))),
    }
}

fn parse_castling(field: &str) -> ChessResult<CastlingRights> {
    let mut rights = CastlingRights::NONE;
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        match c {
            'K' => rights.white_king_side = true,
            'Q' => rights.white_queen_side = true,
            'k' => rights.black_king_side = true,
            'q' => rights.black_queen_side = true,
            other => return Err(fen_err(format!("bad castling flag '{other}'"))),
        }
    }
    Ok(rights)
}

impl Position {
    /// Parse a FEN record. The two clock fields may be omitted and default
    /// to `0 1`. Nothing is returned unless the whole record parses.
    pub fn from_fen(fen: &str) -> ChessResult<Position> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 || fields.len() > 6 {
            return Err(fen_err(format!("expected 4 to 6 fields, found {}", fields.len())));
        }

        let board = parse_placement(fields[0])?;
        let side_to_move = parse_side(fields[1])?;
        let header = parse_header_fields(side_to_move, &fields[2..])?;
        Ok(Position::new(board, header))
    }

    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {}",
            placement_fen(&self.board),
            side_letter(self.side_to_move()),
            header_fields(&self.header)
        )
    }
}

/// Castling, en-passant and the optional clock fields of a FEN record.
fn parse_header_fields(side_to_move: Color, fields: &[&str]) -> ChessResult<GameHeader> {
    let (castling, en_passant) = match fields {
        [castling, en_passant, ..] => (*castling, *en_passant),
        _ => return Err(fen_err("missing castling or en-passant field")),
    };
    let castling = parse_castling(castling)?;
    let en_passant = match en_passant {
        "-" => None,
        text => Some(
            text.parse::<Square>()
                .map_err(|_| fen_err(format!("bad en-passant square '{text}'")))?,
        ),
    };
    let halfmove_clock = match fields.get(2) {
        Some(text) => text
            .parse()
            .map_err(|_| fen_err(format!("bad half-move clock '{text}'")))?,
        None => 0,
    };
    let fullmove_number = match fields.get(3) {
        Some(text) => text
            .parse()
            .map_err(|_| fen_err(format!("bad full-move number '{text}'")))?,
        None => 1,
    };
    Ok(GameHeader {
        side_to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmove_number,
    })
}

/// `KQkq e3 0 1`: everything in a header except the side to move.
fn header_fields(h: &GameHeader) -> String {
    let mut castling = String::new();
    for (held, flag) in h.castling.flags().iter().zip(['K', 'Q', 'k', 'q']) {
        if *held {
            castling.push(flag);
        }
    }
    if castling.is_empty() {
        castling.push('-');
    }
    let ep = h.en_passant.map_or_else(|| "-".to_string(), |sq| sq.to_string());
    format!("{castling} {ep} {} {}", h.halfmove_clock, h.fullmove_number)
}

fn side_letter(color: Color) -> char {
    match color {
        Color::White => 'w',
        Color::Black => 'b',
    }
}

fn placement_fen(board: &Board) -> String {
    let mut out = String::with_capacity(64);
    for rank in (0..8u8).rev() {
        let mut run = 0;
        for file in 0..8u8 {
            match board.piece_at(Square::at(rank * 8 + file)) {
                Some(piece) => {
                    if run > 0 {
                        let _ = write!(out, "{run}");
                        run = 0;
                    }
                    out.push(piece.to_char());
                }
                None => run += 1,
            }
        }
        if run > 0 {
            let _ = write!(out, "{run}");
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out
}

/// FEN for a bare board when no header metadata exists: placement and side
/// followed by `- - 0 1`.
pub fn bare_fen(board: &Board, side_to_move: Color) -> String {
    format!(
        "{} {} {}",
        placement_fen(board),
        side_letter(side_to_move),
        BARE_FEN_TAIL
    )
}

// =============================================================================
// Board snapshot
// =============================================================================

fn snapshot_err(reason: impl Into<String>) -> ChessError {
    ChessError::MalformedSnapshot {
        reason: reason.into(),
    }
}

/// A parsed snapshot file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub side_to_move: Color,
    /// Present when the file carries a header line.
    pub header: Option<GameHeader>,
    /// Move list trailing the board, if any.
    pub history: Option<String>,
}

impl Snapshot {
    pub fn parse(text: &str) -> ChessResult<Snapshot> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .peekable();

        let side_to_move = match lines.next() {
            Some("W") => Color::White,
            Some("B") => Color::Black,
            Some(other) => return Err(snapshot_err(format!("bad side line '{other}'"))),
            None => return Err(snapshot_err("empty snapshot")),
        };

        // Rank rows have eight cells, a header line has four fields.
        let header = match lines.next_if(|l| l.split_whitespace().count() == 4) {
            Some(line) => {
                let fields: Vec<&str> = line.split_whitespace().collect();
                Some(
                    parse_header_fields(side_to_move, &fields).map_err(|err| match err {
                        ChessError::MalformedFen { reason } => snapshot_err(reason),
                        other => other,
                    })?,
                )
            }
            None => None,
        };

        let mut board = Board::empty();
        for rank in (0..8u8).rev() {
            let line = lines
                .next()
                .ok_or_else(|| snapshot_err(format!("missing row for rank {}", rank + 1)))?;
            let cells: Vec<&str> = line.split_whitespace().collect();
            if cells.len() != 8 {
                return Err(snapshot_err(format!(
                    "rank {} has {} cells, expected 8",
                    rank + 1,
                    cells.len()
                )));
            }
            for (file, cell) in cells.iter().enumerate() {
                let mut chars = cell.chars();
                let (Some(ch), None) = (chars.next(), chars.next()) else {
                    return Err(snapshot_err(format!("bad cell '{cell}'")));
                };
                if ch == EMPTY_CELL {
                    continue;
                }
                let piece =
                    Piece::from_char(ch).ok_or_else(|| snapshot_err(format!("bad cell '{cell}'")))?;
                board.put(Square::at(rank * 8 + file as u8), piece);
            }
        }

        let rest: Vec<&str> = lines.collect();
        let history = match rest.first() {
            None => None,
            Some(first) if first.starts_with(|c: char| c.is_ascii_digit()) => Some(rest.join(" ")),
            Some(extra) => return Err(snapshot_err(format!("unexpected trailing line '{extra}'"))),
        };

        Ok(Snapshot {
            board,
            side_to_move,
            header,
            history,
        })
    }

    /// The position the snapshot describes. Without a header line, castling
    /// rights are granted where king and rook still stand on their home
    /// squares, there is no en-passant target and the clocks start at `0 1`.
    pub fn position(&self) -> Position {
        let header = self.header.unwrap_or_else(|| {
            let mut header = GameHeader::bare(self.side_to_move);
            header.castling = infer_castling(&self.board);
            header
        });
        Position::new(self.board.clone(), header)
    }
}

fn write_snapshot(board: &Board, side_to_move: Color, header: Option<&GameHeader>) -> String {
    let mut out = String::with_capacity(8 * 16 + 16);
    out.push(match side_to_move {
        Color::White => 'W',
        Color::Black => 'B',
    });
    out.push('\n');
    if let Some(header) = header {
        out.push_str(&header_fields(header));
        out.push('\n');
    }
    for rank in (0..8u8).rev() {
        let row: Vec<String> = (0..8u8)
            .map(|file| {
                board
                    .piece_at(Square::at(rank * 8 + file))
                    .map_or(EMPTY_CELL, Piece::to_char)
                    .to_string()
            })
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

/// Render a bare board in the snapshot format, without a header line.
pub fn to_snapshot(board: &Board, side_to_move: Color) -> String {
    write_snapshot(board, side_to_move, None)
}

/// Parse a snapshot into a board and the side to move.
pub fn parse_snapshot(text: &str) -> ChessResult<(Board, Color)> {
    Snapshot::parse(text).map(|snap| (snap.board, snap.side_to_move))
}

impl Position {
    /// Build a position from a snapshot, ignoring any trailing move list.
    pub fn from_snapshot(text: &str) -> ChessResult<Position> {
        Ok(Snapshot::parse(text)?.position())
    }

    /// Snapshot with a header line, so reloading keeps castling rights,
    /// the en-passant target and both clocks.
    pub fn to_snapshot(&self) -> String {
        write_snapshot(&self.board, self.side_to_move(), Some(&self.header))
    }
}

fn infer_castling(board: &Board) -> CastlingRights {
    let at_home = |sq: Square, color: Color, kind: PieceKind| {
        board.piece_at(sq) == Some(Piece::new(color, kind))
    };
    let white_king = at_home(Square::E1, Color::White, PieceKind::King);
    let black_king = at_home(Square::E8, Color::Black, PieceKind::King);
    CastlingRights {
        white_king_side: white_king && at_home(Square::H1, Color::White, PieceKind::Rook),
        white_queen_side: white_king && at_home(Square::A1, Color::White, PieceKind::Rook),
        black_king_side: black_king && at_home(Square::H8, Color::Black, PieceKind::Rook),
        black_queen_side: black_king && at_home(Square::A8, Color::Black, PieceKind::Rook),
    }
}

// =============================================================================
// Coordinate moves
// =============================================================================

impl Position {
    /// Resolve coordinate text (`e2e4`, `e7e8q`) against the legal moves of
    /// the side to move. A pawn reaching the last rank without a suffix
    /// promotes to a queen.
    pub fn parse_move(&self, text: &str) -> ChessResult<Move> {
        let unknown = || ChessError::UnknownMove {
            text: text.to_string(),
        };
        let text = text.trim();
        if text.len() < 4 || text.len() > 5 || !text.is_ascii() {
            return Err(unknown());
        }
        let from: Square = text[0..2].parse().map_err(|_| unknown())?;
        let to: Square = text[2..4].parse().map_err(|_| unknown())?;
        let promotion = match text[4..].chars().next() {
            Some(c) => Some(
                PieceKind::from_letter(c)
                    .filter(|k| PieceKind::PROMOTIONS.contains(k))
                    .ok_or_else(unknown)?,
            ),
            None => None,
        };
        self.find_move(from, to, promotion).ok_or_else(unknown)
    }

    /// The legal move from `from` to `to`, defaulting promotions to a queen.
    pub fn find_move(&self, from: Square, to: Square, promotion: Option<PieceKind>) -> Option<Move> {
        let piece = self.board.piece_at(from)?;
        if piece.color != self.side_to_move() {
            return None;
        }
        self.board
            .legal_moves(from, &self.header)
            .into_iter()
            .filter(|mv| mv.to == to)
            .find(|mv| match mv.promotion {
                None => true,
                Some(kind) => kind == promotion.unwrap_or(PieceKind::Queen),
            })
    }
}

// =============================================================================
// Move lists
// =============================================================================

/// Move tokens of a numbered move list (`1. e2-e4 e7-e5 2. Ng1-f3`), with
/// move numbers, result markers and `#` comment lines dropped.
pub fn move_tokens(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(|token| token.rsplit_once('.').map_or(token, |(_, mv)| mv))
        .filter(|token| !token.is_empty() && !matches!(*token, "1-0" | "0-1" | "1/2-1/2" | "*"))
        .collect()
}

impl Position {
    /// Resolve a long-algebraic move (`e2-e4`, `Ng1xf3`, `e7-e8=Q+`,
    /// `O-O-O`) against the legal moves of the side to move. The piece
    /// letter is optional; plain coordinates are accepted too.
    pub fn parse_long_algebraic(&self, text: &str) -> ChessResult<Move> {
        let unknown = || ChessError::UnknownMove {
            text: text.to_string(),
        };
        let body = text.trim().trim_end_matches(['+', '#']);

        let castle = match body {
            "O-O" | "0-0" => Some(MoveKind::CastleKingside),
            "O-O-O" | "0-0-0" => Some(MoveKind::CastleQueenside),
            _ => None,
        };
        if let Some(kind) = castle {
            return self
                .legal_moves()
                .into_iter()
                .find(|mv| mv.kind == kind)
                .ok_or_else(unknown);
        }

        let (piece, rest) = match body.chars().next() {
            Some(c) if c.is_ascii_uppercase() => {
                (Some(PieceKind::from_letter(c).ok_or_else(unknown)?), &body[1..])
            }
            _ => (None, body),
        };
        if piece.is_none() && !body.contains(['-', 'x']) {
            return self.parse_move(body);
        }
        if rest.len() < 5 || !rest.is_ascii() || !matches!(&rest[2..3], "-" | "x") {
            return Err(unknown());
        }
        let from: Square = rest[0..2].parse().map_err(|_| unknown())?;
        let to: Square = rest[3..5].parse().map_err(|_| unknown())?;
        let promotion = match &rest[5..] {
            "" => None,
            suffix => {
                let letter = suffix
                    .strip_prefix('=')
                    .filter(|l| l.len() == 1)
                    .and_then(|l| l.chars().next())
                    .ok_or_else(unknown)?;
                Some(
                    PieceKind::from_letter(letter)
                        .filter(|k| PieceKind::PROMOTIONS.contains(k))
                        .ok_or_else(unknown)?,
                )
            }
        };

        let mv = self.find_move(from, to, promotion).ok_or_else(unknown)?;
        if piece.is_some_and(|kind| kind != mv.piece.kind) {
            return Err(unknown());
        }
        Ok(mv)
    }
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
