//! Per-side game clock for timed (blitz) games.
//!
//! Only the side to move is running. Time is charged when the turn passes,
//! and a side whose remaining time reaches zero has lost on time.

use std::time::{Duration, Instant};

use crate::types::Color;

#[derive(Clone, Debug)]
pub struct ChessClock {
    remaining: [Duration; 2],
    running: Option<(Color, Instant)>,
}

impl ChessClock {
    /// A stopped clock giving each side `per_side`.
    pub fn new(per_side: Duration) -> Self {
        Self {
            remaining: [per_side; 2],
            running: None,
        }
    }

    /// Charge whoever is running and start `color`'s time.
    pub fn start(&mut self, color: Color) {
        self.stop();
        self.running = Some((color, Instant::now()));
    }

    /// Charge the running side and stop the clock.
    pub fn stop(&mut self) {
        if let Some((color, since)) = self.running.take() {
            let left = &mut self.remaining[color.idx()];
            *left = left.saturating_sub(since.elapsed());
        }
    }

    pub fn running(&self) -> Option<Color> {
        self.running.map(|(color, _)| color)
    }

    /// Time left for `color`, counting the turn in progress.
    pub fn remaining(&self, color: Color) -> Duration {
        let left = self.remaining[color.idx()];
        match self.running {
            Some((running, since)) if running == color => left.saturating_sub(since.elapsed()),
            _ => left,
        }
    }

    /// The side that has run out of time, if any.
    pub fn flagged(&self) -> Option<Color> {
        Color::BOTH
            .into_iter()
            .find(|&color| self.remaining(color).is_zero())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod clock_tests;
