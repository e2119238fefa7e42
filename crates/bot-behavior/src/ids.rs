//! Typed arena handle for tree nodes.
//!
//! Nodes reference each other (parent links, child lists, timer commands)
//! through `NodeId` indices into the owning tree's arena rather than through
//! live references.  That removes all lifetime entanglement from the
//! parent back-reference while keeping upward traversal cheap.

use std::fmt;

/// Index of a node in a [`BehaviorTree`][crate::BehaviorTree]'s arena.
///
/// Ids are assigned by [`TreeBuilder`][crate::TreeBuilder] in creation order;
/// the root is always `NodeId(0)`.  An id is only meaningful for the tree
/// that created it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node of any tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Cast to `usize` for direct use as an arena index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<NodeId> for usize {
    #[inline(always)]
    fn from(id: NodeId) -> usize {
        id.index()
    }
}
