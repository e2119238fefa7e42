//! The state machine proper.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Transition-requesting hook: runs against the context, optionally naming
/// the state to move to next.
type TransitionHook<S, C> = Box<dyn FnMut(&mut C) -> Option<S>>;

/// Plain callback run when a state is left.
type ExitHook<C> = Box<dyn FnMut(&mut C)>;

struct StateHooks<S, C> {
    on_enter:  Option<TransitionHook<S, C>>,
    on_update: Option<TransitionHook<S, C>>,
    on_exit:   Option<ExitHook<C>>,
}

impl<S, C> Default for StateHooks<S, C> {
    fn default() -> Self {
        Self { on_enter: None, on_update: None, on_exit: None }
    }
}

/// A frame-driven finite-state machine over a state enum `S` and a
/// caller-owned context `C`.
///
/// Exactly one state is current at a time.  Hooks are optional per state
/// and per kind — a state with no hooks is a perfectly good resting state.
/// Enter and update hooks return `Option<S>` to request a transition;
/// [`change_state`][Self::change_state] chains enter-requested transitions
/// until a state settles.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, PartialEq, Eq, Hash)]
/// enum Door { Closed, Opening, Open }
///
/// let mut fsm = StateMachine::new(Door::Closed);
/// fsm.on_update(Door::Opening, |door: &mut DoorCtx| {
///     door.angle += 5.0;
///     (door.angle >= 90.0).then_some(Door::Open)
/// });
/// ```
pub struct StateMachine<S, C> {
    current: S,
    last: S,
    hooks: FxHashMap<S, StateHooks<S, C>>,
}

impl<S: Copy + Eq + Hash, C> StateMachine<S, C> {
    /// A machine resting in `initial`.  The initial state is entered
    /// without running its enter hook; it is where the machine *is*, not a
    /// transition.
    pub fn new(initial: S) -> Self {
        Self { current: initial, last: initial, hooks: FxHashMap::default() }
    }

    /// The state the machine is in right now.
    #[inline]
    pub fn current_state(&self) -> S {
        self.current
    }

    /// The state the machine most recently left.  Equals the initial state
    /// until the first transition.
    #[inline]
    pub fn last_state(&self) -> S {
        self.last
    }

    // ── Hook registration ─────────────────────────────────────────────────

    /// Run `hook` whenever `state` is entered; a `Some` return immediately
    /// chains into the next transition.
    pub fn on_enter(&mut self, state: S, hook: impl FnMut(&mut C) -> Option<S> + 'static) {
        self.hooks.entry(state).or_default().on_enter = Some(Box::new(hook));
    }

    /// Run `hook` once per [`update`][Self::update] while `state` is current.
    pub fn on_update(&mut self, state: S, hook: impl FnMut(&mut C) -> Option<S> + 'static) {
        self.hooks.entry(state).or_default().on_update = Some(Box::new(hook));
    }

    /// Run `hook` whenever `state` is left.
    pub fn on_exit(&mut self, state: S, hook: impl FnMut(&mut C) + 'static) {
        self.hooks.entry(state).or_default().on_exit = Some(Box::new(hook));
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Transition to `next`: exit the current state, enter the new one, and
    /// keep going while enter hooks request further transitions.
    ///
    /// Transitioning to the current state is a genuine re-entry (exit then
    /// enter both run).  An enter hook that unconditionally requests a
    /// transition to itself will loop; hooks are expected to settle.
    pub fn change_state(&mut self, next: S, ctx: &mut C) {
        let mut target = next;
        loop {
            if let Some(exit) = self.hooks.get_mut(&self.current).and_then(|h| h.on_exit.as_mut())
            {
                exit(ctx);
            }
            self.last = self.current;
            self.current = target;

            let requested = self
                .hooks
                .get_mut(&self.current)
                .and_then(|h| h.on_enter.as_mut())
                .and_then(|enter| enter(ctx));
            match requested {
                Some(chained) => target = chained,
                None => return,
            }
        }
    }

    /// Run the current state's update hook once; follow a requested
    /// transition if it returns one.
    pub fn update(&mut self, ctx: &mut C) {
        let requested = self
            .hooks
            .get_mut(&self.current)
            .and_then(|h| h.on_update.as_mut())
            .and_then(|update| update(ctx));
        if let Some(next) = requested {
            self.change_state(next, ctx);
        }
    }
}
