//! Per-node countdown timers.
//!
//! # Design
//!
//! Timers are the only deferred-execution mechanism in the tree.  Each node
//! owns a list of [`NodeTimer`]s; every `update_recursively` pass advances
//! every node's timers against the tree clock *regardless of node state*,
//! prunes exhausted auto-remove timers, and executes the [`TimerCommand`]
//! of each timer that fired.
//!
//! A timer's command is data, not a closure: commands mutate the very arena
//! the timers live in, so they are described as values and executed by the
//! tree after the timer scan.  Tasks add timers through
//! [`TaskContext`][crate::TaskContext].

use bot_core::BotRng;

use crate::NodeId;

// ── Repeat ────────────────────────────────────────────────────────────────────

/// How many times a timer fires before it is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Repeat {
    /// Fire exactly `n` times, then finish.  `Times(1)` is a one-shot.
    Times(u32),

    /// Reschedule forever.
    Forever,
}

// ── TimerCommand ──────────────────────────────────────────────────────────────

/// The tree mutation performed when a timer fires.
///
/// Commands on nodes in the wrong lifecycle state are silently ignored,
/// exactly like direct calls to the corresponding tree operations — a timer
/// racing a normal stop is an expected transient, not a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start `node` (used to re-enter a child after a delay).
    StartNode(NodeId),

    /// Request a cooperative stop of `node`.
    RequestStop(NodeId),

    /// Complete `node` with the given result.  The usual way a timed task
    /// finishes itself.
    StopNode { node: NodeId, success: bool },
}

// ── NodeTimer ─────────────────────────────────────────────────────────────────

/// A repeatable countdown keyed off the tree's elapsed-time clock.
///
/// The effective interval is resolved *once* at construction: `interval`
/// perturbed by `± jitter / 2` through the tree RNG.  Every reschedule
/// after a fire reuses that resolved value, so a jittered repeating timer
/// has a fixed (but randomly chosen) period.
#[derive(Debug)]
pub struct NodeTimer {
    /// Resolved countdown interval in seconds (jitter already applied).
    timeout_in: f64,
    /// Clock value at which the timer next fires.  Always ≥ creation time.
    next_fire_at: f64,
    repeat: Repeat,
    fire_count: u32,
    /// Prune this timer from its node once finished.
    auto_remove: bool,
    command: TimerCommand,
}

impl NodeTimer {
    /// Create a timer that first fires `interval ± jitter/2` seconds after
    /// `now`.
    pub fn new(
        interval:    f64,
        jitter:      f64,
        repeat:      Repeat,
        command:     TimerCommand,
        auto_remove: bool,
        now:         f64,
        rng:         &mut BotRng,
    ) -> Self {
        let timeout_in = rng.jitter(interval, jitter).max(0.0);
        Self {
            timeout_in,
            next_fire_at: now + timeout_in,
            repeat,
            fire_count: 0,
            auto_remove,
            command,
        }
    }

    /// A zero-delay one-shot: fires on the next update pass.  The prescribed
    /// way to defer work by exactly one tick without re-entrant recursion.
    pub fn next_tick(command: TimerCommand, now: f64) -> Self {
        Self {
            timeout_in: 0.0,
            next_fire_at: now,
            repeat: Repeat::Times(1),
            fire_count: 0,
            auto_remove: true,
            command,
        }
    }

    /// Times fired so far.
    #[inline]
    pub fn fire_count(&self) -> u32 {
        self.fire_count
    }

    /// The clock value of the next (pending) fire.
    #[inline]
    pub fn next_fire_at(&self) -> f64 {
        self.next_fire_at
    }

    #[inline]
    pub fn command(&self) -> TimerCommand {
        self.command
    }

    #[inline]
    pub fn auto_remove(&self) -> bool {
        self.auto_remove
    }

    /// `true` once the timer has fired all the times it ever will.
    #[inline]
    pub fn is_finished(&self) -> bool {
        match self.repeat {
            Repeat::Forever  => false,
            Repeat::Times(n) => self.fire_count >= n,
        }
    }

    /// Advance the timer against the clock.
    ///
    /// Returns `true` if the timer fired this pass (at most once per pass —
    /// a driver stalling for several intervals does not produce a burst of
    /// catch-up fires).  The caller is responsible for executing
    /// [`command`][Self::command] on `true`.
    pub fn update(&mut self, now: f64) -> bool {
        if self.is_finished() || now < self.next_fire_at {
            return false;
        }
        self.fire_count += 1;
        self.next_fire_at = now + self.timeout_in;
        true
    }
}
