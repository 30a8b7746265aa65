//! Perft node counts against published reference values.
//!
//! Cases above `NODE_LIMIT` are skipped unless `FULL_PERFT` is set.

use std::time::Instant;

use rayon::prelude::*;

use chess_rules::{Position, divide, perft};

const FULL_PERFT_ENV: &str = "FULL_PERFT";
const NODE_LIMIT: u64 = 100_000;

/// (name, fen, [(depth, nodes)])
const CASES: &[(&str, &str, &[(u8, u64)])] = &[
    (
        "startpos",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[(1, 20), (2, 400), (3, 8_902), (4, 197_281)],
    ),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[(1, 48), (2, 2_039), (3, 97_862)],
    ),
    (
        "endgame rook and pawns",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        &[(1, 14), (2, 191), (3, 2_812), (4, 43_238)],
    ),
    (
        "promotions and pins",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[(1, 6), (2, 264), (3, 9_467)],
    ),
    (
        "underpromotion race",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[(1, 44), (2, 1_486), (3, 62_379)],
    ),
    (
        "mirrored middlegame",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        &[(1, 46), (2, 2_079), (3, 89_890)],
    ),
];

#[test]
fn perft_reference_positions() {
    let full = std::env::var(FULL_PERFT_ENV).is_ok();

    CASES.par_iter().for_each(|(name, fen, depths)| {
        let pos = Position::from_fen(fen).expect("reference FEN parses");
        let start = Instant::now();
        let mut total = 0u64;

        for &(depth, expected) in depths.iter() {
            if !full && expected > NODE_LIMIT {
                eprintln!("Skipping {name} depth {depth} ({expected} nodes); set {FULL_PERFT_ENV}=1");
                continue;
            }
            let got = perft(&pos, depth);
            assert_eq!(got, expected, "perft mismatch for {name} ({fen}) at depth {depth}");
            total += got;
        }

        println!("{name}: {total} nodes in {:.3?}", start.elapsed());
    });
}

#[test]
fn divide_sums_to_perft() {
    let pos = Position::startpos();
    let split = divide(&pos, 2);
    assert_eq!(split.len(), 20);
    assert!(split.iter().all(|(_, n)| *n == 20));
    assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), perft(&pos, 2));
}
