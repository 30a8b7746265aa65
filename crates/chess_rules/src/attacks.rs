//! Attack sets for every piece, used by move generation and by
//! `Board::is_attacked`.
//!
//! Leapers (knight, king, pawn captures) come from tables built at compile
//! time. Sliders walk precomputed rays and cut each ray at its first blocker.

use crate::bitboard::Bitboard;
use crate::types::{Color, PieceKind, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Builds a per-square table of the on-board targets reachable by `deltas`.
const fn leaper_table<const N: usize>(deltas: [(i8, i8); N]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < N {
            let f = file + deltas[i].0;
            let r = rank + deltas[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

pub static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(KNIGHT_DELTAS);
pub static KING_ATTACKS: [Bitboard; 64] = leaper_table(KING_DELTAS);

/// Capture targets of a pawn, indexed by `[color][square]`.
pub static PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table([(-1, 1), (1, 1)]),
    leaper_table([(-1, -1), (1, -1)]),
];

/// Ray directions. Indices 0..4 run toward higher squares, 4..8 toward lower.
const RAY_DELTAS: [(i8, i8); 8] = [
    (0, 1),   // N
    (1, 1),   // NE
    (1, 0),   // E
    (-1, 1),  // NW
    (0, -1),  // S
    (-1, -1), // SW
    (-1, 0),  // W
    (1, -1),  // SE
];

const fn ray_tables() -> [[Bitboard; 64]; 8] {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = RAY_DELTAS[dir];
        let mut sq = 0;
        while sq < 64 {
            let mut f = (sq % 8) as i8 + df;
            let mut r = (sq / 8) as i8 + dr;
            let mut bits = 0u64;
            while f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << (r * 8 + f);
                f += df;
                r += dr;
            }
            rays[dir][sq] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    rays
}

/// `RAYS[dir][sq]`: every square from `sq` (exclusive) to the edge.
pub static RAYS: [[Bitboard; 64]; 8] = ray_tables();

const ROOK_DIRS: [usize; 4] = [0, 2, 4, 6];
const BISHOP_DIRS: [usize; 4] = [1, 3, 5, 7];

#[inline]
fn ray_attacks(sq: Square, occupied: Bitboard, dirs: [usize; 4]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for dir in dirs {
        let ray = RAYS[dir][sq.idx()];
        let blockers = ray & occupied;
        // The nearest blocker is the lowest bit on upward rays, the highest
        // on downward ones. It stays attacked; everything behind it does not.
        let nearest = if dir < 4 {
            blockers.lsb()
        } else {
            blockers.msb()
        };
        attacks |= match nearest {
            Some(block) => ray & !RAYS[dir][block.idx()],
            None => ray,
        };
    }
    attacks
}

#[inline(always)]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.idx()]
}

#[inline(always)]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.idx()]
}

#[inline(always)]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.idx()][sq.idx()]
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, BISHOP_DIRS)
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, ROOK_DIRS)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Squares a piece standing on `sq` attacks, given the board occupancy.
pub fn piece_attacks(kind: PieceKind, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn_attacks(sq, color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
    }
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
