//! Frame-driven elapsed-time clock.
//!
//! # Design
//!
//! Time is a monotonically increasing `f64` count of elapsed seconds,
//! advanced once per frame by the host driver with that frame's delta.
//! Every clock reader (node timers, wait tasks, wander deadlines) observes
//! the same value for the whole frame, so "now" is consistent across an
//! entire tree during one tick.
//!
//! There is deliberately no global clock: each tree (or manager) owns a
//! `BotClock` and passes its value down.  Two trees ticked at different
//! rates never interfere.

use std::fmt;

/// A monotonic elapsed-seconds clock, advanced externally once per frame.
///
/// `BotClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BotClock {
    elapsed: f64,
}

impl BotClock {
    /// A clock at zero elapsed seconds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed since the clock was created (or last overridden).
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advance the clock by `delta` seconds.
    ///
    /// Negative deltas are ignored — the clock never runs backwards.
    #[inline]
    pub fn advance(&mut self, delta: f64) {
        if delta > 0.0 {
            self.elapsed += delta;
        }
    }

    /// Set the elapsed time directly.
    ///
    /// Intended for tests and for replaying recorded sessions; normal
    /// drivers should only ever call [`advance`][Self::advance].
    #[inline]
    pub fn override_elapsed(&mut self, elapsed: f64) {
        self.elapsed = elapsed;
    }
}

impl fmt::Display for BotClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.elapsed)
    }
}
