//! Depth and time limits for a single search invocation.
//!
//! Cancellation is cooperative: a search starts a [`TimeControl`] from its
//! [`SearchLimits`], polls it at node boundaries and unwinds once it expires.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Nodes visited between two clock reads.
const POLL_INTERVAL: u64 = 256;

/// What the caller allows one search to spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum search depth in plies. Zero is searched as one.
    pub depth: u8,
    /// Wall-clock budget for this move (None = unbounded).
    pub time_budget: Option<Duration>,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        Self::new(depth, None)
    }

    pub fn depth_and_time(depth: u8, budget: Duration) -> Self {
        Self::new(depth, Some(budget))
    }

    pub const fn new(depth: u8, time_budget: Option<Duration>) -> Self {
        Self { depth, time_budget }
    }

    /// Start the clock for a search honouring these limits.
    pub fn start_clock(&self) -> TimeControl {
        TimeControl::start(self.time_budget)
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(3)
    }
}

/// A running clock with a stop flag shared by all of its clones, so rayon
/// workers see a deadline latched by any one of them.
#[derive(Debug, Clone)]
pub struct TimeControl {
    started: Instant,
    deadline: Option<Instant>,
    expired: Arc<AtomicBool>,
}

impl TimeControl {
    pub fn start(budget: Option<Duration>) -> Self {
        let started = Instant::now();
        Self {
            started,
            deadline: budget.map(|b| started + b),
            expired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A clock that never runs out.
    pub fn unbounded() -> Self {
        Self::start(None)
    }

    pub fn is_timed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Latch the stop flag by hand.
    pub fn stop(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }

    /// Whether the flag has been latched, without reading the clock.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.expired.load(Ordering::Relaxed)
    }

    /// Read the clock, latching the flag once the deadline has passed.
    pub fn expired(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.stop();
                true
            }
            _ => false,
        }
    }

    /// True when a search that has visited `nodes` nodes should read the clock.
    #[inline]
    pub fn poll_due(nodes: u64) -> bool {
        nodes.is_multiple_of(POLL_INTERVAL)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Budget left (None if unbounded).
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
