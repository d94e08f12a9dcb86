//! Fixed-rate tick scheduling
//!
//! Peers are driven by a frame-equivalent tick. The clock never reads the
//! system time itself; callers pass `now` in, which keeps every state
//! machine built on it deterministic under test.

use std::time::{Duration, Instant};

/// A discrete tick identifier (logical time unit)
pub type Tick = u64;

/// Clock that reports how many fixed ticks have elapsed
#[derive(Debug, Clone)]
pub struct TickClock {
    /// Ticks completed so far
    tick: Tick,
    /// Length of one tick
    interval: Duration,
    /// When the next tick becomes due; `None` until the first advance
    next_at: Option<Instant>,
}

impl TickClock {
    /// Create a clock ticking every `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            tick: 0,
            interval,
            next_at: None,
        }
    }

    /// Create a clock from a rate in Hz (clamped to at least 1)
    pub fn from_hz(hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1))
    }

    /// Advance to `now`, returning how many ticks became due
    ///
    /// The first call always yields one tick and anchors the schedule.
    /// Ticks are capped at one per call; a stalled loop does not burst.
    pub fn advance(&mut self, now: Instant) -> u32 {
        match self.next_at {
            None => {
                self.next_at = Some(now + self.interval);
                self.tick += 1;
                1
            }
            Some(next) if now >= next => {
                let mut next = next + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_at = Some(next);
                self.tick += 1;
                1
            }
            Some(_) => 0,
        }
    }

    /// Current tick number
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Length of one tick
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
