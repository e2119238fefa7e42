//! Status returned by task nodes.

/// The result of ticking a task or condition.
///
/// Tasks are polled once per frame while their node is active.  `Running`
/// keeps the node active across frames — that is the only suspension
/// mechanism in the tree; there is no blocking anywhere.  `Success` and
/// `Failure` are ordinary control-flow values consumed by the parent
/// composite, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The task needs more frames; the node stays active.
    Running,

    /// The task completed successfully; the node stops with success.
    Success,

    /// The task could not complete; the node stops with failure.
    Failure,
}

impl Status {
    /// `Success` for `true`, `Failure` for `false`.
    #[inline]
    pub fn from_bool(success: bool) -> Self {
        if success { Status::Success } else { Status::Failure }
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Swaps `Success` and `Failure`; `Running` is unchanged.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Running => Status::Running,
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }
}
