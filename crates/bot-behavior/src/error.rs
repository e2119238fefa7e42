//! Behavior-tree error type.
//!
//! Only *structural* violations are errors: they indicate a build-time bug
//! in tree assembly, so [`TreeBuilder`][crate::TreeBuilder] rejects them
//! before the tree can ever run.  Invalid lifecycle transitions at runtime
//! (double start, stop while inactive) are expected transients and return
//! `bool` from the tree operations instead; a task failing is an ordinary
//! [`Status`][crate::Status] value and never surfaces here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("task `{0}` cannot have children")]
    TaskWithChildren(String),

    #[error("{kind} `{name}` accepts exactly one child")]
    SecondChild { kind: &'static str, name: String },

    #[error("{kind} `{name}` has no children")]
    MissingChildren { kind: &'static str, name: String },
}

/// Shorthand result type for bot-behavior.
pub type BehaviorResult<T> = Result<T, BehaviorError>;
