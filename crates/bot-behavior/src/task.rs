//! Leaf tasks and conditions — the nodes that do the actual work.

use bot_core::BotRng;

use crate::timer::{NodeTimer, Repeat, TimerCommand};
use crate::{NodeId, Status};

// ── TaskContext ───────────────────────────────────────────────────────────────

/// Per-call view handed to a task's hooks.
///
/// Borrows the tree's RNG and the node's own timer list for the duration of
/// one hook call; tasks never see the rest of the arena.  Perception and
/// locomotion providers are expected to be captured by the task itself at
/// construction time — the tree treats them as opaque, non-blocking oracles.
pub struct TaskContext<'a> {
    /// The node this task is attached to.
    pub node: NodeId,

    /// The tree clock's elapsed seconds — one consistent value per frame.
    pub now: f64,

    /// `true` once a cooperative stop has been requested.  The task must
    /// resolve to `Success` or `Failure` promptly (it will keep being
    /// ticked until it does).
    pub cancel_requested: bool,

    /// The tree's deterministic RNG.
    pub rng: &'a mut BotRng,

    pub(crate) timers: &'a mut Vec<NodeTimer>,
}

impl TaskContext<'_> {
    /// Add a countdown timer to this node, firing `command` on expiry.
    ///
    /// The timer is advanced by the tree's per-frame timer pass; a finished
    /// `auto_remove` timer is pruned automatically.
    pub fn add_timer(
        &mut self,
        interval:    f64,
        jitter:      f64,
        repeat:      Repeat,
        command:     TimerCommand,
        auto_remove: bool,
    ) {
        let timer =
            NodeTimer::new(interval, jitter, repeat, command, auto_remove, self.now, self.rng);
        self.timers.push(timer);
    }

    /// Run `command` on the next update pass — a zero-delay one-shot timer.
    pub fn defer(&mut self, command: TimerCommand) {
        self.timers.push(NodeTimer::next_tick(command, self.now));
    }

    /// Drop all of this node's timers.
    pub fn clear_timers(&mut self) {
        self.timers.clear();
    }
}

// ── Task trait ────────────────────────────────────────────────────────────────

/// A leaf behavior, polled once per frame while its node is active.
///
/// # Contract
///
/// - [`tick`][Self::tick] must be side-effect-safe to call every frame and
///   must not block; multi-frame work is modeled by returning
///   [`Status::Running`] until done.
/// - Once `ctx.cancel_requested` is `true`, the task must eventually
///   resolve to `Success` or `Failure`.
/// - Returning `Success`/`Failure` stops the node, which synchronously
///   notifies the parent — control flows back up the tree within the same
///   frame.
///
/// Only `tick` is required; the start/stop hooks have no-op defaults.
pub trait Task: 'static {
    /// Called when the node becomes active, before the first tick.
    fn on_start(&mut self, _ctx: &mut TaskContext<'_>) {}

    /// Called every frame while the node is active.
    fn tick(&mut self, ctx: &mut TaskContext<'_>) -> Status;

    /// Called after the node has stopped with its final result.
    fn on_stop(&mut self, _success: bool) {}
}

// ── Provided leaves ───────────────────────────────────────────────────────────

/// Adapter for closures implementing the full task contract:
/// `|ctx| -> Status`, with cancellation observed via `ctx.cancel_requested`.
pub struct FnTask<F: FnMut(&mut TaskContext<'_>) -> Status + 'static>(pub F);

impl<F: FnMut(&mut TaskContext<'_>) -> Status + 'static> Task for FnTask<F> {
    fn tick(&mut self, ctx: &mut TaskContext<'_>) -> Status {
        (self.0)(ctx)
    }
}

/// A boolean check that resolves on its first tick.
///
/// `true` maps to `Success`, `false` to `Failure` — a failing condition is
/// ordinary control flow (it is what makes selectors fall through), never
/// an error.
pub struct Condition<F: FnMut() -> bool + 'static>(F);

impl<F: FnMut() -> bool + 'static> Condition<F> {
    pub fn new(check: F) -> Self {
        Self(check)
    }
}

impl<F: FnMut() -> bool + 'static> Task for Condition<F> {
    fn tick(&mut self, _ctx: &mut TaskContext<'_>) -> Status {
        Status::from_bool((self.0)())
    }
}

/// Succeeds after a fixed (optionally jittered) delay.
///
/// Implemented with a node timer rather than a deadline comparison so the
/// whole timer path — creation, per-frame advance, auto-removal — is
/// exercised by the most common leaf.
pub struct Wait {
    interval: f64,
    jitter: f64,
}

impl Wait {
    pub fn new(interval: f64) -> Self {
        Self { interval, jitter: 0.0 }
    }

    /// A wait of `interval ± jitter/2` seconds, resolved per activation.
    pub fn with_jitter(interval: f64, jitter: f64) -> Self {
        Self { interval, jitter }
    }
}

impl Task for Wait {
    fn on_start(&mut self, ctx: &mut TaskContext<'_>) {
        // A force-stop mid-wait can leave a stale timer behind; restart clean.
        ctx.clear_timers();
        let node = ctx.node;
        ctx.add_timer(
            self.interval,
            self.jitter,
            Repeat::Times(1),
            TimerCommand::StopNode { node, success: true },
            true,
        );
    }

    fn tick(&mut self, ctx: &mut TaskContext<'_>) -> Status {
        if ctx.cancel_requested {
            return Status::Failure;
        }
        Status::Running
    }
}
