//! The `BehaviorTree` arena and its lifecycle engine.

use std::collections::VecDeque;

use bot_core::{BotClock, BotRng};

use crate::node::{Node, NodeLogic, NodeState, Order};
use crate::observer::TreeObserver;
use crate::task::TaskContext;
use crate::timer::{NodeTimer, Repeat, TimerCommand};
use crate::{NodeId, NodeKind, Status};

// ── Deferred actions ──────────────────────────────────────────────────────────

/// Work postponed to the start of the next update pass.
///
/// The root restarts its child through this queue instead of re-entering it
/// synchronously — a child that completed instantly and restarted in place
/// would otherwise recurse without bound within one frame.  Actions enqueued
/// during an update pass never run within that pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredAction {
    StartNode(NodeId),
}

/// Reaction chosen while the arena is borrowed, executed afterwards.
enum Reaction {
    StartChild(NodeId),
    Finalize(bool),
    Defer(NodeId),
    Nothing,
}

// ── BehaviorTree ──────────────────────────────────────────────────────────────

/// A behavior tree: flat node arena, clock, RNG, and deferred-action queue.
///
/// Built once by [`TreeBuilder`][crate::TreeBuilder]; composition is fixed
/// from then on and only node state mutates.  The host engine drives it with
/// [`update_time`][Self::update_time] +
/// [`update_recursively`][Self::update_recursively] once per frame.
///
/// All per-node operations take a [`NodeId`] issued by this tree's builder;
/// indexing with a foreign id panics, like indexing a `Vec` out of bounds.
pub struct BehaviorTree {
    /// Node arena; `nodes[0]` is the root.
    nodes: Vec<Node>,

    /// This tree's elapsed-time clock — the single notion of "now" shared
    /// by every timer during one frame.
    clock: BotClock,

    /// Deterministic RNG for child shuffling and timer jitter, seeded at
    /// build time.
    rng: BotRng,

    deferred: VecDeque<DeferredAction>,
    observers: Vec<Box<dyn TreeObserver>>,
}

impl std::fmt::Debug for BehaviorTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl BehaviorTree {
    pub(crate) fn new(nodes: Vec<Node>, seed: u64) -> Self {
        Self {
            nodes,
            clock: BotClock::new(),
            rng: BotRng::new(seed),
            deferred: VecDeque::new(),
            observers: Vec::new(),
        }
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// The root node (always `NodeId(0)`).
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Total number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].name
    }

    pub fn state(&self, id: NodeId) -> NodeState {
        self.nodes[id.index()].state
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind()
    }

    /// Final result of the node's last completed run.
    pub fn result(&self, id: NodeId) -> Option<bool> {
        self.nodes[id.index()].result
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Walk parent links up to the tree's root.
    pub fn root_of(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.nodes[id.index()].parent {
            id = parent;
        }
        id
    }

    pub fn timer_count(&self, id: NodeId) -> usize {
        self.nodes[id.index()].timers.len()
    }

    /// Deferred actions waiting for the next update pass (e.g. a pending
    /// root-child restart).
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Elapsed seconds on this tree's clock.
    #[inline]
    pub fn now(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn clock(&self) -> &BotClock {
        &self.clock
    }

    pub fn add_observer(&mut self, observer: Box<dyn TreeObserver>) {
        self.observers.push(observer);
    }

    // ── Sleep / wake ──────────────────────────────────────────────────────

    /// `true` while recursive updates are suspended.
    pub fn is_asleep(&self) -> bool {
        matches!(self.nodes[0].logic, NodeLogic::Root { asleep: true })
    }

    /// Suspend recursive updates without tearing down any node state.
    pub fn sleep(&mut self) {
        if let NodeLogic::Root { asleep } = &mut self.nodes[0].logic {
            *asleep = true;
        }
    }

    /// Resume recursive updates; the next pass picks up where the tree left off.
    pub fn wake(&mut self) {
        if let NodeLogic::Root { asleep } = &mut self.nodes[0].logic {
            *asleep = false;
        }
    }

    // ── Driver surface ────────────────────────────────────────────────────

    /// Advance the tree clock by `delta` seconds.  Call once per frame,
    /// before [`update_recursively`][Self::update_recursively].
    pub fn update_time(&mut self, delta: f64) {
        self.clock.advance(delta);
    }

    /// Run one cooperative update pass.
    ///
    /// Returns `false` without doing anything while the tree is asleep.
    /// Otherwise: ① drain deferred actions enqueued on previous frames,
    /// ② advance every node's timers (pruning exhausted auto-remove timers
    /// and executing fired commands), ③ tick the active path depth-first.
    /// Transitions cascade synchronously within this call, bounded by tree
    /// depth.
    pub fn update_recursively(&mut self) -> bool {
        if self.is_asleep() {
            return false;
        }

        // ① Deferred actions.  Drain first so anything enqueued during this
        //   pass waits for the next one.
        let pending: Vec<DeferredAction> = self.deferred.drain(..).collect();
        for action in pending {
            match action {
                DeferredAction::StartNode(id) => {
                    self.start_node(id, false);
                }
            }
        }

        // ② Timers — every node, regardless of lifecycle state.
        self.update_timers();

        // ③ Depth-first tick of the active path.
        self.tick_node(NodeId::ROOT);
        true
    }

    /// Convenience: [`update_time`][Self::update_time] followed by
    /// [`update_recursively`][Self::update_recursively].
    pub fn tick(&mut self, delta: f64) -> bool {
        self.update_time(delta);
        self.update_recursively()
    }

    /// Start the whole tree.
    pub fn start(&mut self) -> bool {
        self.start_node(NodeId::ROOT, false)
    }

    /// Attach-without-acting: activates the root and puts the tree to sleep
    /// in one step.  The child is *not* started until [`wake`][Self::wake]
    /// plus a normal start reach it.
    pub fn start_silent(&mut self) -> bool {
        self.start_node(NodeId::ROOT, true)
    }

    /// Request a cooperative stop of the whole tree.
    pub fn request_stop(&mut self) -> bool {
        self.request_stop_node(NodeId::ROOT, false)
    }

    // ── Node lifecycle operations ─────────────────────────────────────────

    /// Start `id`.
    ///
    /// Legal only from `Inactive`, and only while the parent (if any) is
    /// `Active`; otherwise a no-op returning `false`.  Resets the stored
    /// result, emits exactly one of started / started-silent, then runs the
    /// node's entry logic (composites draw their child order and start the
    /// first child; decorators start their child; a silent root start only
    /// puts the tree to sleep).
    pub fn start_node(&mut self, id: NodeId, silent: bool) -> bool {
        {
            let node = &self.nodes[id.index()];
            if node.state != NodeState::Inactive {
                return false;
            }
            if let Some(parent) = node.parent {
                if self.nodes[parent.index()].state != NodeState::Active {
                    return false;
                }
            }
        }

        let node = &mut self.nodes[id.index()];
        node.result = None;
        node.state = NodeState::Active;
        self.notify_started(id, silent);
        self.enter_node(id, silent);
        true
    }

    /// Request a cooperative stop of `id`.
    ///
    /// Legal only from `Active`.  Advisory: the node finishes its in-flight
    /// work and then stops itself — nothing is forcibly terminated.  Parent
    /// nodes forward the request to their running child; a task observes it
    /// as `cancel_requested` on its next tick.
    pub fn request_stop_node(&mut self, id: NodeId, silent: bool) -> bool {
        if self.nodes[id.index()].state != NodeState::Active {
            return false;
        }
        self.nodes[id.index()].state = NodeState::Stopping;
        self.notify_stopping(id, silent);

        if matches!(self.nodes[id.index()].logic, NodeLogic::Root { .. }) {
            let child = self.nodes[id.index()].children[0];
            if self.nodes[child.index()].state == NodeState::Active {
                // Wait for the child to acknowledge; child_stopped finalizes
                // the root with the child's result.
                self.request_stop_node(child, silent);
            } else {
                // Child idle (restart pending): cancel the restart and
                // finalize directly.
                self.cancel_deferred_start(child);
                self.stop_node(id, true, silent);
            }
        } else if matches!(self.nodes[id.index()].logic, NodeLogic::Task(_)) {
            // The Stopping state itself is the cancellation signal; the task
            // resolves on a later tick.
        } else {
            let running = self.nodes[id.index()]
                .children
                .iter()
                .copied()
                .find(|c| self.nodes[c.index()].state == NodeState::Active);
            if let Some(child) = running {
                self.request_stop_node(child, silent);
            }
            // A child already in Stopping acknowledges on its own.
        }
        true
    }

    /// Stop `id` with a final result.
    ///
    /// Legal from any non-`Inactive` state (a no-op returning `false` from
    /// `Inactive` — no events fire).  Records `success`, emits
    /// stopped / stopped-silent, then synchronously notifies the parent's
    /// child-stopped hook: the parent decides the next move (advance a
    /// sequence, fail a selector, defer a root restart) before this call
    /// returns.
    pub fn stop_node(&mut self, id: NodeId, success: bool, silent: bool) -> bool {
        let idx = id.index();
        if self.nodes[idx].state == NodeState::Inactive {
            return false;
        }
        self.nodes[idx].state = NodeState::Inactive;
        self.nodes[idx].result = Some(success);
        if let NodeLogic::Task(task) = &mut self.nodes[idx].logic {
            task.on_stop(success);
        }
        self.notify_stopped(id, success, silent);

        if let Some(parent) = self.nodes[idx].parent {
            self.child_stopped(parent, id, success, silent);
        }
        true
    }

    /// Escape hatch: force `id` and its whole subtree to `Inactive`,
    /// bypassing the `Stopping` handshake.
    ///
    /// Children are stopped first (post-order) with silent notifications,
    /// and the target's parent is *not* notified — no control flow runs.
    /// Invariants may be violated; callers must not rely on graceful
    /// cleanup.  `false` if `id` was already `Inactive`.
    pub fn force_stop(&mut self, id: NodeId, success: bool) -> bool {
        if self.nodes[id.index()].state == NodeState::Inactive {
            return false;
        }
        self.force_stop_subtree(id, success);
        true
    }

    /// Add a countdown timer to `id`, firing `command` on expiry.
    ///
    /// Jitter is resolved once, now, through the tree RNG.
    pub fn add_node_timer(
        &mut self,
        id:          NodeId,
        interval:    f64,
        jitter:      f64,
        repeat:      Repeat,
        command:     TimerCommand,
        auto_remove: bool,
    ) {
        let Self { nodes, clock, rng, .. } = self;
        let timer =
            NodeTimer::new(interval, jitter, repeat, command, auto_remove, clock.elapsed(), rng);
        nodes[id.index()].timers.push(timer);
    }

    /// Drop all timers owned by `id`.
    pub fn clear_node_timers(&mut self, id: NodeId) {
        self.nodes[id.index()].timers.clear();
    }

    // ── Entry dispatch ────────────────────────────────────────────────────

    fn enter_node(&mut self, id: NodeId, silent: bool) {
        // Explicit field borrows so the borrow checker sees disjoint access
        // to the arena, the RNG, and the clock.
        let Self { nodes, rng, clock, .. } = self;
        let now = clock.elapsed();
        let node = &mut nodes[id.index()];

        let start_child = match &mut node.logic {
            NodeLogic::Root { asleep } => {
                if silent {
                    // Attach-without-acting: flip the sleep flag only.
                    *asleep = true;
                    None
                } else {
                    *asleep = false;
                    Some(node.children[0])
                }
            }
            NodeLogic::Selector(seq) | NodeLogic::Sequence(seq) => {
                seq.run_order.clear();
                seq.run_order.extend(0..node.children.len());
                if seq.order == Order::Random {
                    // Policy: reshuffle once per activation.
                    rng.shuffle(&mut seq.run_order);
                }
                seq.cursor = 0;
                Some(node.children[seq.run_order[0]])
            }
            NodeLogic::Decorator(_) => Some(node.children[0]),
            NodeLogic::Task(task) => {
                let mut ctx = TaskContext {
                    node: id,
                    now,
                    cancel_requested: false,
                    rng,
                    timers: &mut node.timers,
                };
                task.on_start(&mut ctx);
                None
            }
        };

        if let Some(child) = start_child {
            self.start_node(child, silent);
        }
    }

    // ── Parent reaction to a stopped child ────────────────────────────────

    /// The upward control-flow hook: runs synchronously inside the child's
    /// `stop_node`, after the child's own stopped event.
    fn child_stopped(&mut self, parent: NodeId, child: NodeId, success: bool, silent: bool) {
        let pstate = self.nodes[parent.index()].state;

        let reaction = {
            let node = &mut self.nodes[parent.index()];
            match &mut node.logic {
                NodeLogic::Root { .. } => {
                    if pstate == NodeState::Stopping {
                        Reaction::Finalize(success)
                    } else {
                        // Restart next frame, never synchronously: a child
                        // that restarts itself forever must not recurse.
                        Reaction::Defer(child)
                    }
                }
                NodeLogic::Selector(seq) => {
                    if pstate == NodeState::Stopping {
                        Reaction::Finalize(success)
                    } else if success {
                        Reaction::Finalize(true)
                    } else {
                        // Fall through to the next candidate.
                        seq.cursor += 1;
                        match seq.run_order.get(seq.cursor) {
                            Some(&pos) => Reaction::StartChild(node.children[pos]),
                            None       => Reaction::Finalize(false),
                        }
                    }
                }
                NodeLogic::Sequence(seq) => {
                    if pstate == NodeState::Stopping {
                        Reaction::Finalize(success)
                    } else if !success {
                        Reaction::Finalize(false)
                    } else {
                        seq.cursor += 1;
                        match seq.run_order.get(seq.cursor) {
                            Some(&pos) => Reaction::StartChild(node.children[pos]),
                            None       => Reaction::Finalize(true),
                        }
                    }
                }
                NodeLogic::Decorator(dec) => Reaction::Finalize(dec.transform(success)),
                // Tasks have no children; unreachable by construction.
                NodeLogic::Task(_) => Reaction::Nothing,
            }
        };

        match reaction {
            Reaction::StartChild(next) => {
                self.start_node(next, silent);
            }
            Reaction::Finalize(result) => {
                self.stop_node(parent, result, silent);
            }
            Reaction::Defer(restart) => {
                self.deferred.push_back(DeferredAction::StartNode(restart));
            }
            Reaction::Nothing => {}
        }
    }

    // ── Update passes ─────────────────────────────────────────────────────

    fn update_timers(&mut self) {
        let now = self.clock.elapsed();
        let mut fired: Vec<TimerCommand> = Vec::new();

        for idx in 0..self.nodes.len() {
            let timers = &mut self.nodes[idx].timers;
            timers.retain(|t| !(t.is_finished() && t.auto_remove()));
            for timer in timers.iter_mut() {
                if timer.update(now) {
                    fired.push(timer.command());
                }
            }
            for command in fired.drain(..) {
                self.exec_timer_command(command);
            }
        }
    }

    fn exec_timer_command(&mut self, command: TimerCommand) {
        // Stale commands (node moved on since the timer was armed) fall out
        // as ordinary rejected transitions.
        match command {
            TimerCommand::StartNode(id) => {
                self.start_node(id, false);
            }
            TimerCommand::RequestStop(id) => {
                self.request_stop_node(id, false);
            }
            TimerCommand::StopNode { node, success } => {
                self.stop_node(node, success, false);
            }
        }
    }

    fn tick_node(&mut self, id: NodeId) {
        if self.nodes[id.index()].state == NodeState::Inactive {
            return;
        }

        if matches!(self.nodes[id.index()].logic, NodeLogic::Task(_)) {
            match self.tick_task(id) {
                Status::Running => {}
                status => {
                    self.stop_node(id, status == Status::Success, false);
                }
            }
            return;
        }

        // Visit children active at visit time: a child started by a sibling's
        // cascade earlier in this loop still gets its first tick this frame.
        let child_count = self.nodes[id.index()].children.len();
        for i in 0..child_count {
            if self.nodes[id.index()].state == NodeState::Inactive {
                break; // this node completed mid-walk
            }
            let child = self.nodes[id.index()].children[i];
            if self.nodes[child.index()].state != NodeState::Inactive {
                self.tick_node(child);
            }
        }
    }

    fn tick_task(&mut self, id: NodeId) -> Status {
        let Self { nodes, rng, clock, .. } = self;
        let now = clock.elapsed();
        let node = &mut nodes[id.index()];
        let cancel = node.state == NodeState::Stopping;
        match &mut node.logic {
            NodeLogic::Task(task) => {
                let mut ctx = TaskContext {
                    node: id,
                    now,
                    cancel_requested: cancel,
                    rng,
                    timers: &mut node.timers,
                };
                task.tick(&mut ctx)
            }
            _ => Status::Running,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn force_stop_subtree(&mut self, id: NodeId, success: bool) {
        let children = self.nodes[id.index()].children.clone();
        for child in children {
            if self.nodes[child.index()].state != NodeState::Inactive {
                self.force_stop_subtree(child, success);
            }
        }
        let node = &mut self.nodes[id.index()];
        node.state = NodeState::Inactive;
        node.result = Some(success);
        if let NodeLogic::Task(task) = &mut node.logic {
            task.on_stop(success);
        }
        self.notify_stopped(id, success, true);
    }

    fn cancel_deferred_start(&mut self, id: NodeId) {
        self.deferred
            .retain(|a| !matches!(a, DeferredAction::StartNode(n) if *n == id));
    }

    // ── Observer notification ─────────────────────────────────────────────

    fn notify_started(&mut self, id: NodeId, silent: bool) {
        let Self { nodes, observers, .. } = self;
        let name = nodes[id.index()].name.as_str();
        for obs in observers.iter_mut() {
            if silent {
                obs.on_started_silent(id, name);
            } else {
                obs.on_started(id, name);
            }
        }
    }

    fn notify_stopping(&mut self, id: NodeId, silent: bool) {
        let Self { nodes, observers, .. } = self;
        let name = nodes[id.index()].name.as_str();
        for obs in observers.iter_mut() {
            if silent {
                obs.on_stopping_silent(id, name);
            } else {
                obs.on_stopping(id, name);
            }
        }
    }

    fn notify_stopped(&mut self, id: NodeId, success: bool, silent: bool) {
        let Self { nodes, observers, .. } = self;
        let name = nodes[id.index()].name.as_str();
        for obs in observers.iter_mut() {
            if silent {
                obs.on_stopped_silent(id, name, success);
            } else {
                obs.on_stopped(id, name, success);
            }
        }
    }
}
