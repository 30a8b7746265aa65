//! Move-path enumeration for validating move generation.

use crate::position::Position;

/// Number of leaf nodes reachable from `pos` in exactly `depth` plies.
pub fn perft(pos: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = pos.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|mv| perft(&pos.after(mv), depth - 1))
        .sum()
}

/// Per-root-move breakdown, sorted by coordinate text.
pub fn divide(pos: &Position, depth: u8) -> Vec<(String, u64)> {
    let mut out: Vec<(String, u64)> = pos
        .legal_moves()
        .iter()
        .map(|mv| (mv.to_string(), perft(&pos.after(mv), depth.saturating_sub(1))))
        .collect();
    out.sort();
    out
}
