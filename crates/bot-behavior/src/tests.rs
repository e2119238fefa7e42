//! Unit tests for the behavior-tree runtime.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{
    BehaviorError, BehaviorTree, Condition, FnTask, Inverter, NodeId, NodeState, Order, Status,
    Succeeder, Task, TaskContext, TreeBuilder, TreeObserver, Wait,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Leaf that succeeds on its first tick.
fn succeeds() -> impl Task {
    FnTask(|_ctx: &mut TaskContext<'_>| Status::Success)
}

/// Leaf that fails on its first tick.
fn fails() -> impl Task {
    FnTask(|_ctx: &mut TaskContext<'_>| Status::Failure)
}

/// Leaf that runs forever until a stop is requested, then fails.
fn runs_until_cancelled() -> impl Task {
    FnTask(|ctx: &mut TaskContext<'_>| {
        if ctx.cancel_requested { Status::Failure } else { Status::Running }
    })
}

/// Leaf that counts its ticks and never finishes.
fn counting(counter: Rc<Cell<u32>>) -> impl Task {
    FnTask(move |_ctx: &mut TaskContext<'_>| {
        counter.set(counter.get() + 1);
        Status::Running
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Ev {
    Started(String),
    StartedSilent(String),
    Stopping(String),
    StoppingSilent(String),
    Stopped(String, bool),
    StoppedSilent(String, bool),
}

/// Observer that appends every notification to a shared log.
struct Recorder {
    log: Rc<RefCell<Vec<Ev>>>,
}

impl TreeObserver for Recorder {
    fn on_started(&mut self, _node: NodeId, name: &str) {
        self.log.borrow_mut().push(Ev::Started(name.into()));
    }
    fn on_started_silent(&mut self, _node: NodeId, name: &str) {
        self.log.borrow_mut().push(Ev::StartedSilent(name.into()));
    }
    fn on_stopping(&mut self, _node: NodeId, name: &str) {
        self.log.borrow_mut().push(Ev::Stopping(name.into()));
    }
    fn on_stopping_silent(&mut self, _node: NodeId, name: &str) {
        self.log.borrow_mut().push(Ev::StoppingSilent(name.into()));
    }
    fn on_stopped(&mut self, _node: NodeId, name: &str, success: bool) {
        self.log.borrow_mut().push(Ev::Stopped(name.into(), success));
    }
    fn on_stopped_silent(&mut self, _node: NodeId, name: &str, success: bool) {
        self.log.borrow_mut().push(Ev::StoppedSilent(name.into(), success));
    }
}

/// Attach a recording observer and return the shared log handle.
fn record(tree: &mut BehaviorTree) -> Rc<RefCell<Vec<Ev>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    tree.add_observer(Box::new(Recorder { log: Rc::clone(&log) }));
    log
}

/// Names of children started, in notification order.
fn started_names(log: &Rc<RefCell<Vec<Ev>>>) -> Vec<String> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Ev::Started(n) => Some(n.clone()),
            _ => None,
        })
        .collect()
}

// ── Node lifecycle ────────────────────────────────────────────────────────────

mod lifecycle {
    use super::*;

    fn single_task_tree() -> (BehaviorTree, NodeId) {
        let mut b = TreeBuilder::new("root", 0);
        let t = b.task(b.root(), "leaf", runs_until_cancelled()).unwrap();
        (b.build().unwrap(), t)
    }

    #[test]
    fn double_start_is_noop() {
        let (mut tree, _) = single_task_tree();
        assert!(tree.start());
        assert_eq!(tree.state(tree.root()), NodeState::Active);
        assert!(!tree.start());
        assert_eq!(tree.state(tree.root()), NodeState::Active);
    }

    #[test]
    fn stop_from_inactive_is_noop_without_events() {
        let (mut tree, task) = single_task_tree();
        let log = record(&mut tree);
        assert!(!tree.stop_node(task, true, false));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn child_cannot_start_under_inactive_parent() {
        let (mut tree, task) = single_task_tree();
        // Root never started.
        assert!(!tree.start_node(task, false));
        assert_eq!(tree.state(task), NodeState::Inactive);
    }

    #[test]
    fn request_stop_only_legal_while_active() {
        let (mut tree, task) = single_task_tree();
        assert!(!tree.request_stop_node(task, false));
        tree.start();
        assert!(tree.request_stop_node(task, false));
        assert_eq!(tree.state(task), NodeState::Stopping);
        // Second request while already stopping is rejected.
        assert!(!tree.request_stop_node(task, false));
    }

    #[test]
    fn start_clears_previous_result() {
        let (mut tree, task) = single_task_tree();
        tree.start();
        tree.tick(0.1);
        tree.request_stop();
        tree.tick(0.1); // task acknowledges with Failure
        assert_eq!(tree.result(tree.root()), Some(false));

        tree.start();
        assert_eq!(tree.result(tree.root()), None);
        assert_eq!(tree.result(task), None);
    }

    #[test]
    fn task_hooks_run_in_order() {
        struct Hooked {
            log: Rc<RefCell<Vec<&'static str>>>,
        }
        impl Task for Hooked {
            fn on_start(&mut self, _ctx: &mut TaskContext<'_>) {
                self.log.borrow_mut().push("start");
            }
            fn tick(&mut self, _ctx: &mut TaskContext<'_>) -> Status {
                self.log.borrow_mut().push("tick");
                Status::Success
            }
            fn on_stop(&mut self, success: bool) {
                self.log
                    .borrow_mut()
                    .push(if success { "stop-ok" } else { "stop-failed" });
            }
        }

        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut b = TreeBuilder::new("root", 0);
        b.task(b.root(), "hooked", Hooked { log: Rc::clone(&calls) }).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        tree.tick(0.1);
        assert_eq!(*calls.borrow(), vec!["start", "tick", "stop-ok"]);
    }

    #[test]
    fn stopped_event_carries_the_result() {
        let mut b = TreeBuilder::new("root", 0);
        let t = b.task(b.root(), "leaf", succeeds()).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);
        tree.start();
        tree.tick(0.1);
        assert_eq!(tree.result(t), Some(true));
        assert!(log.borrow().contains(&Ev::Stopped("leaf".into(), true)));
    }
}

// ── NodeTimer ─────────────────────────────────────────────────────────────────

mod timer {
    use bot_core::BotRng;

    use crate::{NodeId, NodeTimer, Repeat, TimerCommand};

    fn cmd() -> TimerCommand {
        TimerCommand::StartNode(NodeId(1))
    }

    #[test]
    fn one_shot_fires_exactly_once_after_interval() {
        let mut rng = BotRng::new(0);
        let mut t = NodeTimer::new(1.0, 0.0, Repeat::Times(1), cmd(), false, 0.0, &mut rng);
        assert!(!t.update(0.5));
        assert!(!t.update(0.99));
        assert!(t.update(1.0));
        assert_eq!(t.fire_count(), 1);
        assert!(t.is_finished());
        assert!(!t.update(5.0));
        assert_eq!(t.fire_count(), 1);
    }

    #[test]
    fn repeating_timer_reschedules() {
        let mut rng = BotRng::new(0);
        let mut t = NodeTimer::new(1.0, 0.0, Repeat::Times(3), cmd(), false, 0.0, &mut rng);
        assert!(t.update(1.0));
        assert!(!t.update(1.5));
        assert!(t.update(2.0));
        assert!(t.update(3.0));
        assert!(t.is_finished());
        assert!(!t.update(10.0));
    }

    #[test]
    fn forever_timer_never_finishes() {
        let mut rng = BotRng::new(0);
        let mut t = NodeTimer::new(0.5, 0.0, Repeat::Forever, cmd(), false, 0.0, &mut rng);
        for i in 1..=20 {
            assert!(t.update(i as f64 * 0.5));
        }
        assert!(!t.is_finished());
        assert_eq!(t.fire_count(), 20);
    }

    #[test]
    fn at_most_one_fire_per_pass() {
        // A stalled driver catching up does not produce a burst.
        let mut rng = BotRng::new(0);
        let mut t = NodeTimer::new(1.0, 0.0, Repeat::Forever, cmd(), false, 0.0, &mut rng);
        assert!(t.update(10.0));
        assert_eq!(t.fire_count(), 1);
    }

    #[test]
    fn jitter_bounds_next_fire() {
        let mut rng = BotRng::new(7);
        for _ in 0..50 {
            let t = NodeTimer::new(2.0, 1.0, Repeat::Times(1), cmd(), false, 0.0, &mut rng);
            assert!((1.5..2.5).contains(&t.next_fire_at()), "got {}", t.next_fire_at());
        }
    }

    #[test]
    fn next_fire_never_precedes_creation() {
        let mut rng = BotRng::new(7);
        // Jitter larger than the interval would otherwise go negative.
        for _ in 0..50 {
            let t = NodeTimer::new(0.1, 5.0, Repeat::Times(1), cmd(), false, 10.0, &mut rng);
            assert!(t.next_fire_at() >= 10.0);
        }
    }

    #[test]
    fn next_tick_timer_fires_on_first_pass() {
        let mut t = NodeTimer::next_tick(cmd(), 5.0);
        assert!(t.update(5.0));
        assert!(t.is_finished());
        assert!(t.auto_remove());
    }
}

// ── Selector ──────────────────────────────────────────────────────────────────

mod selector {
    use super::*;

    #[test]
    fn fail_fail_success_ends_success_after_three() {
        let mut b = TreeBuilder::new("root", 0);
        let sel = b.selector(b.root(), "sel", Order::Fixed).unwrap();
        b.task(sel, "c1", fails()).unwrap();
        b.task(sel, "c2", fails()).unwrap();
        b.task(sel, "c3", succeeds()).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);

        tree.start();
        tree.tick(0.1);

        assert_eq!(tree.state(sel), NodeState::Inactive);
        assert_eq!(tree.result(sel), Some(true));
        assert_eq!(started_names(&log), vec!["root", "sel", "c1", "c2", "c3"]);
    }

    #[test]
    fn all_fail_ends_failed_after_two() {
        let mut b = TreeBuilder::new("root", 0);
        let sel = b.selector(b.root(), "sel", Order::Fixed).unwrap();
        b.task(sel, "c1", fails()).unwrap();
        b.task(sel, "c2", fails()).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);

        tree.start();
        tree.tick(0.1);

        assert_eq!(tree.result(sel), Some(false));
        assert_eq!(started_names(&log), vec!["root", "sel", "c1", "c2"]);
    }

    #[test]
    fn first_success_short_circuits() {
        let mut b = TreeBuilder::new("root", 0);
        let sel = b.selector(b.root(), "sel", Order::Fixed).unwrap();
        b.task(sel, "c1", succeeds()).unwrap();
        b.task(sel, "c2", fails()).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);

        tree.start();
        tree.tick(0.1);

        assert_eq!(tree.result(sel), Some(true));
        assert!(!started_names(&log).contains(&"c2".to_string()));
    }
}

// ── Sequence ──────────────────────────────────────────────────────────────────

mod sequence {
    use super::*;

    #[test]
    fn success_success_fail_ends_failed_after_three() {
        let mut b = TreeBuilder::new("root", 0);
        let seq = b.sequence(b.root(), "seq", Order::Fixed).unwrap();
        b.task(seq, "c1", succeeds()).unwrap();
        b.task(seq, "c2", succeeds()).unwrap();
        b.task(seq, "c3", fails()).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);

        tree.start();
        tree.tick(0.1);

        assert_eq!(tree.result(seq), Some(false));
        assert_eq!(started_names(&log), vec!["root", "seq", "c1", "c2", "c3"]);
    }

    #[test]
    fn all_succeed_ends_success_after_two() {
        let mut b = TreeBuilder::new("root", 0);
        let seq = b.sequence(b.root(), "seq", Order::Fixed).unwrap();
        b.task(seq, "c1", succeeds()).unwrap();
        b.task(seq, "c2", succeeds()).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);

        tree.start();
        tree.tick(0.1);

        assert_eq!(tree.result(seq), Some(true));
        assert_eq!(started_names(&log), vec!["root", "seq", "c1", "c2"]);
    }

    #[test]
    fn first_failure_short_circuits() {
        let mut b = TreeBuilder::new("root", 0);
        let seq = b.sequence(b.root(), "seq", Order::Fixed).unwrap();
        b.task(seq, "c1", fails()).unwrap();
        b.task(seq, "c2", succeeds()).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);

        tree.start();
        tree.tick(0.1);

        assert_eq!(tree.result(seq), Some(false));
        assert!(!started_names(&log).contains(&"c2".to_string()));
    }
}

// ── Random child order ────────────────────────────────────────────────────────

mod random_order {
    use super::*;

    fn build(seed: u64) -> BehaviorTree {
        let mut b = TreeBuilder::new("root", seed);
        let sel = b.selector(b.root(), "sel", Order::Random).unwrap();
        b.task(sel, "a", fails()).unwrap();
        b.task(sel, "b", fails()).unwrap();
        b.task(sel, "c", fails()).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn same_seed_reproduces_visit_order() {
        let mut t1 = build(1234);
        let mut t2 = build(1234);
        let l1 = record(&mut t1);
        let l2 = record(&mut t2);

        t1.start();
        t2.start();
        // Three activations: the first from start, two via deferred restarts.
        for _ in 0..3 {
            t1.tick(0.1);
            t2.tick(0.1);
        }
        assert_eq!(*l1.borrow(), *l2.borrow());
    }

    #[test]
    fn each_activation_visits_every_child_once() {
        let mut tree = build(99);
        let log = record(&mut tree);
        tree.start();
        tree.tick(0.1);

        let mut names = started_names(&log);
        names.retain(|n| n != "root" && n != "sel");
        names.sort();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}

// ── Root node ─────────────────────────────────────────────────────────────────

mod root {
    use super::*;

    #[test]
    fn finished_child_restarts_on_the_next_pass() {
        let mut b = TreeBuilder::new("root", 0);
        let sel = b.selector(b.root(), "sel", Order::Fixed).unwrap();
        b.task(sel, "no-enemy", Condition::new(|| false)).unwrap();
        b.task(sel, "idle", succeeds()).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        assert_eq!(tree.state(sel), NodeState::Active);

        tree.tick(0.1);
        // Selector completed this pass; the restart is queued, not run.
        assert_eq!(tree.state(sel), NodeState::Inactive);
        assert_eq!(tree.result(sel), Some(true));
        assert_eq!(tree.state(tree.root()), NodeState::Active);
        assert_eq!(tree.pending_deferred(), 1);

        tree.tick(0.1);
        // The queued restart ran at the top of this pass (and the selector
        // completed again, queueing the next one).
        assert_eq!(tree.pending_deferred(), 1);
        assert_eq!(tree.result(sel), Some(true));
    }

    #[test]
    fn sleep_freezes_state_and_updates() {
        let ticks = Rc::new(Cell::new(0u32));
        let mut b = TreeBuilder::new("root", 0);
        let t = b.task(b.root(), "busy", counting(Rc::clone(&ticks))).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);

        tree.start();
        tree.tick(0.1);
        assert_eq!(ticks.get(), 1);

        tree.sleep();
        let events_before = log.borrow().len();
        for _ in 0..3 {
            assert!(!tree.tick(0.1));
        }
        assert_eq!(ticks.get(), 1, "no task ticks while asleep");
        assert_eq!(log.borrow().len(), events_before, "no transitions while asleep");
        assert_eq!(tree.state(t), NodeState::Active, "state preserved");

        tree.wake();
        assert!(tree.tick(0.1));
        assert_eq!(ticks.get(), 2, "ticking resumes after wake");
    }

    #[test]
    fn silent_start_only_flips_the_sleep_flag() {
        let mut b = TreeBuilder::new("root", 0);
        let t = b.task(b.root(), "leaf", succeeds()).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);

        assert!(tree.start_silent());
        assert!(tree.is_asleep());
        assert_eq!(tree.state(tree.root()), NodeState::Active);
        assert_eq!(tree.state(t), NodeState::Inactive, "child not started");
        assert_eq!(*log.borrow(), vec![Ev::StartedSilent("root".into())]);
    }

    #[test]
    fn request_stop_with_idle_child_cancels_pending_restart() {
        let mut b = TreeBuilder::new("root", 0);
        let sel = b.selector(b.root(), "sel", Order::Fixed).unwrap();
        b.task(sel, "c1", fails()).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        tree.tick(0.1);
        assert_eq!(tree.pending_deferred(), 1);

        assert!(tree.request_stop());
        assert_eq!(tree.pending_deferred(), 0, "queued restart cancelled");
        assert_eq!(tree.state(tree.root()), NodeState::Inactive);
        assert_eq!(tree.result(tree.root()), Some(true));

        // The cancelled restart must not resurface later.
        tree.tick(0.1);
        assert_eq!(tree.state(sel), NodeState::Inactive);
    }

    #[test]
    fn request_stop_forwards_to_active_child_and_finalizes_with_its_result() {
        let mut b = TreeBuilder::new("root", 0);
        let t = b.task(b.root(), "busy", runs_until_cancelled()).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        tree.tick(0.1);

        assert!(tree.request_stop());
        assert_eq!(tree.state(tree.root()), NodeState::Stopping);
        assert_eq!(tree.state(t), NodeState::Stopping);

        tree.tick(0.1); // task acknowledges with Failure
        assert_eq!(tree.state(t), NodeState::Inactive);
        assert_eq!(tree.state(tree.root()), NodeState::Inactive);
        assert_eq!(tree.result(tree.root()), Some(false));
    }
}

// ── Cooperative cancellation ──────────────────────────────────────────────────

mod cancellation {
    use super::*;

    #[test]
    fn sequence_stops_only_after_child_acknowledges() {
        let mut b = TreeBuilder::new("root", 0);
        let seq = b.sequence(b.root(), "seq", Order::Fixed).unwrap();
        let t1 = b.task(seq, "long-job", runs_until_cancelled()).unwrap();
        b.task(seq, "after", succeeds()).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        tree.tick(0.1);
        assert_eq!(tree.state(t1), NodeState::Active);

        tree.request_stop();
        // Advisory only: nothing stopped yet.
        assert_eq!(tree.state(seq), NodeState::Stopping);
        assert_eq!(tree.state(t1), NodeState::Stopping);

        tree.tick(0.1);
        // Child resolved; the sequence finalized with the child's result
        // instead of advancing to "after".
        assert_eq!(tree.state(seq), NodeState::Inactive);
        assert_eq!(tree.result(seq), Some(false));
        assert_eq!(tree.result(tree.root()), Some(false));
    }
}

// ── Force stop ────────────────────────────────────────────────────────────────

mod force_stop {
    use super::*;

    #[test]
    fn stops_subtree_without_notifying_parent() {
        let mut b = TreeBuilder::new("root", 0);
        let seq = b.sequence(b.root(), "seq", Order::Fixed).unwrap();
        let t1 = b.task(seq, "busy", runs_until_cancelled()).unwrap();
        b.task(seq, "later", succeeds()).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);

        tree.start();
        tree.tick(0.1);

        assert!(tree.force_stop(seq, false));
        assert_eq!(tree.state(seq), NodeState::Inactive);
        assert_eq!(tree.state(t1), NodeState::Inactive);
        // The root saw nothing: still active, no restart queued.
        assert_eq!(tree.state(tree.root()), NodeState::Active);
        assert_eq!(tree.pending_deferred(), 0);
        // All notifications went down the silent channel.
        assert!(log.borrow().iter().any(|e| matches!(e, Ev::StoppedSilent(..))));
        assert!(!log.borrow().iter().any(|e| matches!(e, Ev::Stopped(..))));
    }

    #[test]
    fn force_stop_from_inactive_is_rejected() {
        let mut b = TreeBuilder::new("root", 0);
        let t = b.task(b.root(), "leaf", succeeds()).unwrap();
        let mut tree = b.build().unwrap();
        assert!(!tree.force_stop(t, true));
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

mod builder {
    use super::*;

    #[test]
    fn task_cannot_have_children() {
        let mut b = TreeBuilder::new("root", 0);
        let t = b.task(b.root(), "leaf", succeeds()).unwrap();
        let err = b.task(t, "grandchild", succeeds()).unwrap_err();
        assert!(matches!(err, BehaviorError::TaskWithChildren(name) if name == "leaf"));
    }

    #[test]
    fn decorator_rejects_second_child() {
        let mut b = TreeBuilder::new("root", 0);
        let d = b.decorator(b.root(), "not", Inverter).unwrap();
        b.task(d, "first", succeeds()).unwrap();
        let err = b.task(d, "second", succeeds()).unwrap_err();
        assert!(matches!(err, BehaviorError::SecondChild { .. }));
    }

    #[test]
    fn root_rejects_second_child() {
        let mut b = TreeBuilder::new("root", 0);
        b.task(b.root(), "first", succeeds()).unwrap();
        let err = b.task(b.root(), "second", succeeds()).unwrap_err();
        assert!(matches!(err, BehaviorError::SecondChild { .. }));
    }

    #[test]
    fn empty_composite_fails_at_build() {
        let mut b = TreeBuilder::new("root", 0);
        b.selector(b.root(), "sel", Order::Fixed).unwrap();
        let err = b.build().unwrap_err();
        assert!(matches!(err, BehaviorError::MissingChildren { .. }));
    }

    #[test]
    fn childless_root_fails_at_build() {
        let b = TreeBuilder::new("root", 0);
        let err = b.build().unwrap_err();
        assert!(matches!(err, BehaviorError::MissingChildren { .. }));
    }

    #[test]
    fn accessors_reflect_structure() {
        let mut b = TreeBuilder::new("root", 0);
        let seq = b.sequence(b.root(), "seq", Order::Fixed).unwrap();
        let t = b.task(seq, "leaf", succeeds()).unwrap();
        let tree = b.build().unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.parent(t), Some(seq));
        assert_eq!(tree.parent(tree.root()), None);
        assert_eq!(tree.children(seq), &[t][..]);
        assert_eq!(tree.root_of(t), tree.root());
        assert_eq!(tree.name(t), "leaf");
        assert_eq!(tree.kind(seq), crate::NodeKind::Composite);
        assert_eq!(tree.kind(t), crate::NodeKind::Task);
    }
}

// ── Decorators ────────────────────────────────────────────────────────────────

mod decorators {
    use super::*;

    #[test]
    fn inverter_flips_child_result() {
        let mut b = TreeBuilder::new("root", 0);
        let d = b.decorator(b.root(), "not", Inverter).unwrap();
        b.task(d, "yes", Condition::new(|| true)).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        tree.tick(0.1);
        assert_eq!(tree.result(d), Some(false));
    }

    #[test]
    fn succeeder_masks_failure() {
        let mut b = TreeBuilder::new("root", 0);
        let d = b.decorator(b.root(), "optional", Succeeder).unwrap();
        b.task(d, "no", Condition::new(|| false)).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        tree.tick(0.1);
        assert_eq!(tree.result(d), Some(true));
    }
}

// ── Timer-driven behavior ─────────────────────────────────────────────────────

mod timed {
    use super::*;
    use crate::{Repeat, TimerCommand};

    #[test]
    fn wait_succeeds_only_after_its_interval() {
        let mut b = TreeBuilder::new("root", 0);
        let w = b.task(b.root(), "pause", Wait::new(1.0)).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        assert_eq!(tree.timer_count(w), 1);

        tree.tick(0.5);
        assert_eq!(tree.state(w), NodeState::Active);
        tree.tick(0.3);
        assert_eq!(tree.state(w), NodeState::Active);
        tree.tick(0.3); // elapsed 1.1
        assert_eq!(tree.state(w), NodeState::Inactive);
        assert_eq!(tree.result(w), Some(true));
    }

    #[test]
    fn wait_acknowledges_cancellation_with_failure() {
        let mut b = TreeBuilder::new("root", 0);
        let w = b.task(b.root(), "pause", Wait::new(10.0)).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        tree.tick(0.1);
        tree.request_stop();
        tree.tick(0.1);
        assert_eq!(tree.state(w), NodeState::Inactive);
        assert_eq!(tree.result(w), Some(false));
    }

    #[test]
    fn external_timer_can_request_a_stop() {
        let mut b = TreeBuilder::new("root", 0);
        let t = b.task(b.root(), "busy", runs_until_cancelled()).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        tree.add_node_timer(
            t,
            1.0,
            0.0,
            Repeat::Times(1),
            TimerCommand::RequestStop(t),
            true,
        );

        tree.tick(0.5);
        assert_eq!(tree.state(t), NodeState::Active);

        // Timer fires during this pass; the task sees the request on the
        // same pass's tick and resolves.
        tree.tick(0.6);
        assert_eq!(tree.state(t), NodeState::Inactive);
        assert_eq!(tree.result(t), Some(false));
    }

    #[test]
    fn deferred_command_runs_on_the_next_pass() {
        struct DeferredFinish {
            armed: bool,
        }
        impl Task for DeferredFinish {
            fn tick(&mut self, ctx: &mut TaskContext<'_>) -> Status {
                if !self.armed {
                    self.armed = true;
                    let node = ctx.node;
                    ctx.defer(TimerCommand::StopNode { node, success: true });
                }
                Status::Running
            }
        }

        let mut b = TreeBuilder::new("root", 0);
        let t = b.task(b.root(), "lazy", DeferredFinish { armed: false }).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        tree.tick(0.1); // arms the zero-delay timer; still running this pass
        assert_eq!(tree.state(t), NodeState::Active);

        tree.tick(0.1); // the timer fires during this pass's timer scan
        assert_eq!(tree.state(t), NodeState::Inactive);
        assert_eq!(tree.result(t), Some(true));
    }

    #[test]
    fn timers_advance_on_inactive_nodes() {
        let mut b = TreeBuilder::new("root", 0);
        let sel = b.selector(b.root(), "sel", Order::Fixed).unwrap();
        let c1 = b.task(sel, "done", fails()).unwrap();
        b.task(sel, "busy", runs_until_cancelled()).unwrap();
        let mut tree = b.build().unwrap();

        tree.start();
        tree.tick(0.1); // c1 fails and goes inactive; "busy" keeps running

        assert_eq!(tree.state(c1), NodeState::Inactive);
        tree.add_node_timer(
            c1,
            0.5,
            0.0,
            Repeat::Times(1),
            // Stopping an inactive node is a silently rejected transition.
            TimerCommand::StopNode { node: c1, success: true },
            true,
        );
        assert_eq!(tree.timer_count(c1), 1);

        tree.tick(1.0); // fires (node still inactive — timers are not gated)
        tree.tick(0.1); // exhausted auto-remove timer is pruned
        assert_eq!(tree.timer_count(c1), 0);
        assert_eq!(tree.state(c1), NodeState::Inactive);
    }
}

// ── Observer channels ─────────────────────────────────────────────────────────

mod observers {
    use super::*;

    #[test]
    fn normal_flow_never_uses_silent_channel() {
        let mut b = TreeBuilder::new("root", 0);
        let sel = b.selector(b.root(), "sel", Order::Fixed).unwrap();
        b.task(sel, "c1", fails()).unwrap();
        b.task(sel, "c2", succeeds()).unwrap();
        let mut tree = b.build().unwrap();
        let log = record(&mut tree);

        tree.start();
        tree.tick(0.1);

        assert!(!log.borrow().iter().any(|e| {
            matches!(e, Ev::StartedSilent(_) | Ev::StoppingSilent(_) | Ev::StoppedSilent(..))
        }));
    }

    #[test]
    fn all_observers_receive_every_event() {
        let mut b = TreeBuilder::new("root", 0);
        b.task(b.root(), "leaf", succeeds()).unwrap();
        let mut tree = b.build().unwrap();
        let l1 = record(&mut tree);
        let l2 = record(&mut tree);

        tree.start();
        tree.tick(0.1);
        assert_eq!(*l1.borrow(), *l2.borrow());
        assert!(!l1.borrow().is_empty());
    }
}
