use super::*;

fn sq(text: &str) -> Square {
    text.parse().expect("valid square")
}

#[test]
fn test_set_clear_toggle_test() {
    let mut bb = Bitboard::EMPTY;
    bb.set(sq("e4"));
    assert!(bb.test(sq("e4")));
    assert_eq!(bb.raw(), 1u64 << 28);

    bb.toggle(sq("a1"));
    assert!(bb.test(sq("a1")));
    bb.toggle(sq("a1"));
    assert!(!bb.test(sq("a1")));

    bb.clear(sq("e4"));
    assert!(bb.is_empty());
}

#[test]
fn test_iteration_is_lowest_first() {
    let bb = Bitboard::from_square(sq("h8")) | Bitboard::from_square(sq("a1"));
    assert_eq!(bb.popcount(), 2);
    assert_eq!(bb.squares(), vec![sq("a1"), sq("h8")]);
    assert_eq!(bb.lsb(), Some(sq("a1")));
    assert_eq!(bb.msb(), Some(sq("h8")));
}

#[test]
fn test_square_color_masks_partition_board() {
    assert_eq!(Bitboard::LIGHT_SQUARES | Bitboard::DARK_SQUARES, Bitboard::ALL);
    assert!((Bitboard::LIGHT_SQUARES & Bitboard::DARK_SQUARES).is_empty());
    for square in Square::all() {
        assert_eq!(Bitboard::LIGHT_SQUARES.test(square), square.is_light());
    }
}

#[test]
fn test_file_and_rank_masks() {
    assert_eq!(Bitboard::file(0), Bitboard::FILE_A);
    assert_eq!(Bitboard::file(7), Bitboard::FILE_H);
    assert_eq!(Bitboard::rank(7), Bitboard::RANK_8);
    assert_eq!(Bitboard::CENTER.squares(), vec![sq("d4"), sq("e4"), sq("d5"), sq("e5")]);
}
