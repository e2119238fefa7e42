//! Decorator result transformers.
//!
//! A decorator node wraps exactly one child and rewrites the child's final
//! boolean result as it propagates upward.  Side effects around start/stop
//! belong in a [`Task`][crate::Task] or an observer; the arity rule (exactly
//! one child) is enforced by the builder.

/// Transforms a child's final result into the decorator's own result.
pub trait Decorate: 'static {
    /// Called when the child stops; the return value becomes the
    /// decorator's result.
    fn transform(&mut self, child_success: bool) -> bool;
}

/// Inverts the child's result (logical NOT).
pub struct Inverter;

impl Decorate for Inverter {
    fn transform(&mut self, child_success: bool) -> bool {
        !child_success
    }
}

/// Reports success regardless of the child's result.
///
/// Useful for optional behaviors that must not fail an enclosing sequence.
pub struct Succeeder;

impl Decorate for Succeeder {
    fn transform(&mut self, _child_success: bool) -> bool {
        true
    }
}

/// Adapter for closures: `|child_success| ...`.
pub struct FnDecorator<F: FnMut(bool) -> bool + 'static>(pub F);

impl<F: FnMut(bool) -> bool + 'static> Decorate for FnDecorator<F> {
    fn transform(&mut self, child_success: bool) -> bool {
        (self.0)(child_success)
    }
}
