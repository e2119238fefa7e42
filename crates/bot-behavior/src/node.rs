//! Arena node storage — lifecycle state, child bookkeeping, and node logic.

use crate::decorator::Decorate;
use crate::task::Task;
use crate::timer::NodeTimer;
use crate::NodeId;

// ── Lifecycle & classification ────────────────────────────────────────────────

/// The lifecycle state of a node.
///
/// Nodes cycle `Inactive → Active → Stopping → Inactive`; `Stopping` is
/// skipped when a node completes on its own (a task resolving, a composite
/// short-circuiting) and only entered through a cooperative stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeState {
    /// Not running.  The only state a node can be started from.
    Inactive,
    /// Running; ticked every frame.
    Active,
    /// A stop was requested; the node finishes in-flight work and then
    /// stops itself.  Advisory — nothing is forcibly terminated.
    Stopping,
}

/// Structural classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// One or more children; controls which of them run (selector, sequence).
    Composite,
    /// Exactly one child; transforms its result or brackets its execution.
    /// The root is a decorator with tree-entry duties.
    Decorator,
    /// A leaf doing the actual work.  Never has children.
    Task,
}

impl NodeKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            NodeKind::Composite => "composite",
            NodeKind::Decorator => "decorator",
            NodeKind::Task      => "task",
        }
    }
}

// ── Composite ordering ────────────────────────────────────────────────────────

/// Child iteration order for composites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Order {
    /// Declared order, every activation.
    Fixed,
    /// A fresh random permutation is drawn from the tree RNG each time the
    /// composite starts.
    Random,
}

/// Iteration bookkeeping shared by selector and sequence.
#[derive(Debug)]
pub(crate) struct CompositeState {
    pub order: Order,
    /// Positions into `children`, rebuilt (and shuffled for [`Order::Random`])
    /// on every start.
    pub run_order: Vec<usize>,
    /// Index into `run_order` of the child currently running.
    pub cursor: usize,
}

impl CompositeState {
    pub fn new(order: Order) -> Self {
        Self { order, run_order: Vec::new(), cursor: 0 }
    }
}

// ── Node logic ────────────────────────────────────────────────────────────────

/// Variant-specific behavior attached to a node.
pub(crate) enum NodeLogic {
    /// Tree entry point.  `asleep` suppresses recursive updates without
    /// tearing down any state.
    Root { asleep: bool },
    Selector(CompositeState),
    Sequence(CompositeState),
    Decorator(Box<dyn Decorate>),
    Task(Box<dyn Task>),
}

impl NodeLogic {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeLogic::Root { .. } | NodeLogic::Decorator(_) => NodeKind::Decorator,
            NodeLogic::Selector(_) | NodeLogic::Sequence(_)  => NodeKind::Composite,
            NodeLogic::Task(_)                               => NodeKind::Task,
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// One arena entry.
///
/// Composition is static: `parent` and `children` are fixed by the builder
/// before the tree can run, and only `state`, `result`, timers, and the
/// logic's internal bookkeeping mutate afterwards.
pub(crate) struct Node {
    pub name: String,
    pub state: NodeState,
    /// Final result of the last completed run; `None` while running or
    /// never started.
    pub result: Option<bool>,
    /// Non-owning handle to the parent; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Owned children in declaration order.
    pub children: Vec<NodeId>,
    pub timers: Vec<NodeTimer>,
    pub logic: NodeLogic,
}

impl Node {
    pub fn new(name: String, parent: Option<NodeId>, logic: NodeLogic) -> Self {
        Self {
            name,
            state: NodeState::Inactive,
            result: None,
            parent,
            children: Vec::new(),
            timers: Vec::new(),
            logic,
        }
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.logic.kind()
    }
}
