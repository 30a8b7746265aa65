use std::thread;

use super::*;

#[test]
fn test_only_the_running_side_is_charged() {
    let mut clock = ChessClock::new(Duration::from_secs(60));
    assert_eq!(clock.running(), None);
    clock.start(Color::White);
    thread::sleep(Duration::from_millis(20));
    clock.start(Color::Black);

    let white = clock.remaining(Color::White);
    assert!(white <= Duration::from_millis(59_980));
    assert_eq!(clock.running(), Some(Color::Black));

    clock.stop();
    assert_eq!(clock.running(), None);
    let black = clock.remaining(Color::Black);
    thread::sleep(Duration::from_millis(5));
    assert_eq!(clock.remaining(Color::Black), black);
    assert_eq!(clock.remaining(Color::White), white);
}

#[test]
fn test_flag_falls_at_zero() {
    let mut clock = ChessClock::new(Duration::from_millis(5));
    assert_eq!(clock.flagged(), None);
    clock.start(Color::Black);
    thread::sleep(Duration::from_millis(15));
    assert_eq!(clock.flagged(), Some(Color::Black));
    assert_eq!(clock.remaining(Color::Black), Duration::ZERO);
    assert_eq!(clock.remaining(Color::White), Duration::from_millis(5));
}
