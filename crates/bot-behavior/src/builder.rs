//! Fail-fast behavior-tree assembly.
//!
//! Tree shape is fixed before activation, so every structural rule is
//! checked while the tree is being described: violations are build-time
//! bugs and surface as [`BehaviorError`]s immediately, never at run time.

use crate::decorator::Decorate;
use crate::node::{CompositeState, Node, NodeKind, NodeLogic};
use crate::task::Task;
use crate::tree::BehaviorTree;
use crate::{BehaviorError, BehaviorResult, NodeId, Order};

/// Builds a [`BehaviorTree`] one node at a time.
///
/// The root is created implicitly; child nodes attach under an explicit
/// parent id returned by the previous calls.  The root can never be given a
/// parent because no method accepts it as a child.
///
/// # Example
///
/// ```rust,ignore
/// let mut b = TreeBuilder::new("guard", 7);
/// let seq = b.sequence(b.root(), "patrol", Order::Fixed)?;
/// b.task(seq, "walk-to-post", WalkTask::new(post))?;
/// b.task(seq, "look-around", Wait::with_jitter(2.0, 0.5))?;
/// let tree = b.build()?;
/// ```
pub struct TreeBuilder {
    nodes: Vec<Node>,
    seed: u64,
}

impl TreeBuilder {
    /// Create a builder whose root node is named `name`; `seed` fixes the
    /// tree RNG (child shuffles, timer jitter) for reproducible runs.
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        let root = Node::new(name.into(), None, NodeLogic::Root { asleep: false });
        Self { nodes: vec![root], seed }
    }

    /// The implicit root node's id.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Add a selector (OR) composite under `parent`.
    pub fn selector(
        &mut self,
        parent: NodeId,
        name:   impl Into<String>,
        order:  Order,
    ) -> BehaviorResult<NodeId> {
        self.attach(parent, name.into(), NodeLogic::Selector(CompositeState::new(order)))
    }

    /// Add a sequence (AND) composite under `parent`.
    pub fn sequence(
        &mut self,
        parent: NodeId,
        name:   impl Into<String>,
        order:  Order,
    ) -> BehaviorResult<NodeId> {
        self.attach(parent, name.into(), NodeLogic::Sequence(CompositeState::new(order)))
    }

    /// Add a single-child decorator under `parent`.
    pub fn decorator(
        &mut self,
        parent:   NodeId,
        name:     impl Into<String>,
        decorate: impl Decorate,
    ) -> BehaviorResult<NodeId> {
        self.attach(parent, name.into(), NodeLogic::Decorator(Box::new(decorate)))
    }

    /// Add a leaf task under `parent`.
    pub fn task(
        &mut self,
        parent: NodeId,
        name:   impl Into<String>,
        task:   impl Task,
    ) -> BehaviorResult<NodeId> {
        self.attach(parent, name.into(), NodeLogic::Task(Box::new(task)))
    }

    /// Validate arities and produce the runnable tree.
    ///
    /// Every decorator (the root included) must have exactly one child and
    /// every composite at least one; both were upper-bounded at attach
    /// time, so only emptiness is checked here.
    pub fn build(self) -> BehaviorResult<BehaviorTree> {
        for node in &self.nodes {
            let kind = node.kind();
            if kind != NodeKind::Task && node.children.is_empty() {
                return Err(BehaviorError::MissingChildren {
                    kind: kind.as_str(),
                    name: node.name.clone(),
                });
            }
        }
        Ok(BehaviorTree::new(self.nodes, self.seed))
    }

    fn attach(
        &mut self,
        parent: NodeId,
        name:   String,
        logic:  NodeLogic,
    ) -> BehaviorResult<NodeId> {
        let pnode = &self.nodes[parent.index()];
        match pnode.kind() {
            NodeKind::Task => {
                return Err(BehaviorError::TaskWithChildren(pnode.name.clone()));
            }
            NodeKind::Decorator if !pnode.children.is_empty() => {
                return Err(BehaviorError::SecondChild {
                    kind: "decorator",
                    name: pnode.name.clone(),
                });
            }
            _ => {}
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(name, Some(parent), logic));
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }
}
