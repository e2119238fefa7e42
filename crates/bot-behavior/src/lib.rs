//! `bot-behavior` — frame-driven behavior-tree runtime for the `rust_bot` toolkit.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`status`]    | `Status` — tri-state task result                              |
//! | [`ids`]       | `NodeId` — typed arena handle                                 |
//! | [`node`]      | `Node`, `NodeState`, `NodeKind`, `Order`                      |
//! | [`timer`]     | `NodeTimer`, `Repeat`, `TimerCommand`                         |
//! | [`task`]      | `Task` trait, `TaskContext`, `FnTask`, `Condition`, `Wait`    |
//! | [`decorator`] | `Decorate` trait, `Inverter`, `Succeeder`                     |
//! | [`tree`]      | `BehaviorTree` — arena, lifecycle ops, tick loop              |
//! | [`builder`]   | `TreeBuilder` — fail-fast tree assembly                       |
//! | [`observer`]  | `TreeObserver`, `NoopObserver`                                |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Execution model
//!
//! A tree is a flat arena of nodes (`Vec<Node>` indexed by [`NodeId`]) with
//! node 0 as the root.  The host engine drives it once per frame:
//!
//! ```text
//! tree.update_time(delta);        // advance the tree's clock
//! tree.update_recursively();      // ① drain deferred actions enqueued last frame
//!                                 // ② advance every node's timers, fire commands
//!                                 // ③ depth-first tick of the active path
//! ```
//!
//! Everything is single-threaded and cooperative: a task "suspends" by
//! returning [`Status::Running`] and being asked again next frame; multiple
//! node transitions may cascade synchronously within one call, bounded by
//! tree depth.  The only cancellation primitive is `request_stop`, which a
//! task observes as `cancel_requested` and acknowledges by resolving to
//! `Success` or `Failure`.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bot_behavior::{Condition, Order, Status, TreeBuilder, Wait};
//!
//! let mut b = TreeBuilder::new("patrol-brain", 42);
//! let sel = b.selector(b.root(), "pick", Order::Fixed)?;
//! b.task(sel, "enemy-visible", Condition::new(|| false))?;
//! b.task(sel, "idle", Wait::new(1.5))?;
//! let mut tree = b.build()?;
//!
//! tree.start();
//! loop {
//!     tree.tick(1.0 / 60.0);
//! }
//! ```

pub mod builder;
pub mod decorator;
pub mod error;
pub mod ids;
pub mod node;
pub mod observer;
pub mod status;
pub mod task;
pub mod timer;
pub mod tree;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::TreeBuilder;
pub use decorator::{Decorate, FnDecorator, Inverter, Succeeder};
pub use error::{BehaviorError, BehaviorResult};
pub use ids::NodeId;
pub use node::{NodeKind, NodeState, Order};
pub use observer::{NoopObserver, TreeObserver};
pub use status::Status;
pub use task::{Condition, FnTask, Task, TaskContext, Wait};
pub use timer::{NodeTimer, Repeat, TimerCommand};
pub use tree::BehaviorTree;
