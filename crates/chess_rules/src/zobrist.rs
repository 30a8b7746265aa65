//! Zobrist keys for repetition tracking and evaluation caching.
//!
//! A position key is the XOR of one random value per (piece, square), one
//! for black to move, one per castling right still held and one for the
//! en-passant file. Keys are generated at compile time from a fixed seed so
//! they are identical across runs and threads.

use crate::position::Position;
use crate::types::{Color, Piece};

pub struct ZobristKeys {
    /// Indexed by `[color * 6 + kind][square]`.
    pieces: [[u64; 64]; 12],
    black_to_move: u64,
    /// `K Q k q` order.
    castling: [u64; 4],
    en_passant_file: [u64; 8],
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl ZobristKeys {
    const fn generate(seed: u64) -> Self {
        let mut state = seed;

        let mut pieces = [[0u64; 64]; 12];
        let mut p = 0;
        while p < 12 {
            let mut sq = 0;
            while sq < 64 {
                pieces[p][sq] = splitmix64(&mut state);
                sq += 1;
            }
            p += 1;
        }

        let black_to_move = splitmix64(&mut state);

        let mut castling = [0u64; 4];
        let mut i = 0;
        while i < 4 {
            castling[i] = splitmix64(&mut state);
            i += 1;
        }

        let mut en_passant_file = [0u64; 8];
        let mut i = 0;
        while i < 8 {
            en_passant_file[i] = splitmix64(&mut state);
            i += 1;
        }

        Self {
            pieces,
            black_to_move,
            castling,
            en_passant_file,
        }
    }

    #[inline(always)]
    pub fn piece(&self, piece: Piece, sq: usize) -> u64 {
        self.pieces[piece.color.idx() * 6 + piece.kind.idx()][sq]
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::generate(0x5EED_C0DE_2024_0001);

/// Full (non-incremental) key of `pos`.
pub fn position_key(pos: &Position) -> u64 {
    let mut key = pos
        .board
        .occupants()
        .fold(0u64, |acc, (sq, piece)| acc ^ ZOBRIST.piece(piece, sq.idx()));

    if pos.header.side_to_move == Color::Black {
        key ^= ZOBRIST.black_to_move;
    }
    for (held, k) in pos.header.castling.flags().iter().zip(ZOBRIST.castling) {
        if *held {
            key ^= k;
        }
    }
    if let Some(ep) = pos.header.en_passant {
        key ^= ZOBRIST.en_passant_file[ep.file() as usize];
    }
    key
}

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
