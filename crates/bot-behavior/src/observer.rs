//! Lifecycle observer trait for tree instrumentation.

use crate::NodeId;

/// Callbacks invoked by [`BehaviorTree`][crate::BehaviorTree] whenever a
/// node changes lifecycle state.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Silent and non-silent notifications
/// are *distinct methods*, not a flag: a node start emits exactly one of
/// [`on_started`][Self::on_started] / [`on_started_silent`][Self::on_started_silent],
/// so "did this notify normal observers" is always unambiguous.
///
/// Observers run synchronously inside the lifecycle operation, after the
/// node's own state change and before the parent is notified.
///
/// # Example — transition logger
///
/// ```rust,ignore
/// struct Logger;
///
/// impl TreeObserver for Logger {
///     fn on_stopped(&mut self, node: NodeId, name: &str, success: bool) {
///         println!("{node} `{name}` stopped (success={success})");
///     }
/// }
/// ```
pub trait TreeObserver {
    /// The node entered `Active`.
    fn on_started(&mut self, _node: NodeId, _name: &str) {}

    /// The node entered `Active` via a silent start.
    fn on_started_silent(&mut self, _node: NodeId, _name: &str) {}

    /// The node entered `Stopping` (a cooperative stop was requested).
    fn on_stopping(&mut self, _node: NodeId, _name: &str) {}

    /// The node entered `Stopping` via a silent request.
    fn on_stopping_silent(&mut self, _node: NodeId, _name: &str) {}

    /// The node returned to `Inactive` with the given final result.
    fn on_stopped(&mut self, _node: NodeId, _name: &str, _success: bool) {}

    /// The node returned to `Inactive` via a silent stop (including
    /// force-stops).
    fn on_stopped_silent(&mut self, _node: NodeId, _name: &str, _success: bool) {}
}

/// A [`TreeObserver`] that does nothing.  Useful as a placeholder.
pub struct NoopObserver;

impl TreeObserver for NoopObserver {}
