//! The wander state machine.

use bot_core::{BotClock, BotRng, Vec3};
use bot_fsm::StateMachine;

use crate::provider::{Locomotion, WanderPolicy};

/// Lifecycle of the wander controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WanderState {
    /// At rest; nothing happens until [`WanderManager::wander`] is called.
    NotWandering,
    /// Waiting out the between-destinations pause, then asking the policy
    /// for the next destination.
    FindNewPosition,
    /// A movement is in flight.
    MovingToPosition,
    /// The policy currently forbids wandering; polled for recovery.
    CannotWander,
}

/// Everything the state hooks operate on.
///
/// Split out from the manager so the hooks (which live inside the machine)
/// never alias the machine itself.
struct WanderCtx<L, P> {
    locomotion: L,
    policy: P,
    rng: BotRng,
    clock: BotClock,

    /// Radius for the wander in progress, set by `wander` / `wander_within`.
    radius: f32,
    /// Destination chosen by `FindNewPosition`, consumed on movement start.
    target: Option<Vec3>,
    /// Clock value until which `FindNewPosition` keeps waiting.
    wait_until: f64,
    /// Clock value after which an in-flight movement is abandoned.
    move_deadline: Option<f64>,
    /// Whether the previous state was a resting one; resting exits use a
    /// short grace wait instead of the policy's full pause.
    came_from_rest: bool,
}

impl<L: Locomotion, P: WanderPolicy> WanderCtx<L, P> {
    /// Seconds to wait before picking the next destination.
    fn next_wait(&mut self) -> f64 {
        if self.came_from_rest {
            return 0.1;
        }
        let wait = self.policy.wait_time();
        if self.policy.randomize_wait() && wait > 0.0 {
            self.rng.gen_range(wait * 0.75..wait)
        } else {
            wait
        }
    }
}

/// Drives an agent on an endless pick-a-spot / walk-there loop.
///
/// Generic over a movement backend and a destination policy; owns its own
/// clock and RNG so several managers can tick side by side without shared
/// state.  The host calls [`update`][Self::update] once per frame.
pub struct WanderManager<L: Locomotion, P: WanderPolicy> {
    fsm: StateMachine<WanderState, WanderCtx<L, P>>,
    ctx: WanderCtx<L, P>,
}

impl<L: Locomotion + 'static, P: WanderPolicy + 'static> WanderManager<L, P> {
    pub fn new(locomotion: L, policy: P, seed: u64) -> Self {
        let ctx = WanderCtx {
            locomotion,
            policy,
            rng: BotRng::new(seed),
            clock: BotClock::new(),
            radius: 0.0,
            target: None,
            wait_until: 0.0,
            move_deadline: None,
            came_from_rest: false,
        };

        let mut fsm = StateMachine::new(WanderState::NotWandering);

        // Resting states mark their exit so the next wait is the short one.
        fsm.on_exit(WanderState::NotWandering, |c: &mut WanderCtx<L, P>| {
            c.came_from_rest = true;
        });
        fsm.on_exit(WanderState::CannotWander, |c: &mut WanderCtx<L, P>| {
            c.came_from_rest = true;
        });

        fsm.on_enter(WanderState::FindNewPosition, |c: &mut WanderCtx<L, P>| {
            let wait = c.next_wait();
            c.wait_until = c.clock.elapsed() + wait;
            None
        });
        fsm.on_exit(WanderState::FindNewPosition, |c: &mut WanderCtx<L, P>| {
            c.came_from_rest = false;
        });
        fsm.on_update(WanderState::FindNewPosition, |c: &mut WanderCtx<L, P>| {
            if c.clock.elapsed() < c.wait_until {
                return None;
            }
            let center = c.locomotion.position();
            match c.policy.pick_position(center, c.radius, &mut c.rng) {
                Some(target) => {
                    c.target = Some(target);
                    Some(WanderState::MovingToPosition)
                }
                None => Some(WanderState::CannotWander),
            }
        });

        fsm.on_enter(WanderState::MovingToPosition, |c: &mut WanderCtx<L, P>| {
            let Some(target) = c.target.take() else {
                return Some(WanderState::CannotWander);
            };
            if !c.locomotion.move_to(target) {
                return Some(WanderState::CannotWander);
            }
            let timeout = c.policy.movement_timeout();
            c.move_deadline = (timeout > 0.0).then(|| c.clock.elapsed() + timeout);
            None
        });
        fsm.on_exit(WanderState::MovingToPosition, |c: &mut WanderCtx<L, P>| {
            c.came_from_rest = false;
            c.move_deadline = None;
        });
        fsm.on_update(WanderState::MovingToPosition, |c: &mut WanderCtx<L, P>| {
            if !c.policy.can_wander() {
                return Some(WanderState::CannotWander);
            }
            if !c.locomotion.is_moving() {
                // Arrived.
                return Some(if c.policy.auto_wander() {
                    WanderState::FindNewPosition
                } else {
                    WanderState::NotWandering
                });
            }
            if let Some(deadline) = c.move_deadline {
                if c.clock.elapsed() >= deadline {
                    // Taking too long; abandon and pick somewhere else.
                    return Some(WanderState::FindNewPosition);
                }
            }
            None
        });

        fsm.on_update(WanderState::CannotWander, |c: &mut WanderCtx<L, P>| {
            c.policy.can_wander().then_some(WanderState::FindNewPosition)
        });

        Self { fsm, ctx }
    }

    // ── Public operations ─────────────────────────────────────────────────

    /// Start wandering with the policy's default radius.
    pub fn wander(&mut self) -> bool {
        let radius = self.ctx.policy.wander_radius();
        self.wander_within(radius)
    }

    /// Start wandering within `radius` of the agent's position.
    ///
    /// `true` only when this call actually kicked off a wander: a forbidden
    /// policy parks the machine in `CannotWander`, and a manager already
    /// wandering is left alone.
    pub fn wander_within(&mut self, radius: f32) -> bool {
        self.ctx.radius = radius;
        if !self.ctx.policy.can_wander() {
            self.fsm.change_state(WanderState::CannotWander, &mut self.ctx);
            false
        } else if self.fsm.current_state() == WanderState::NotWandering {
            self.fsm.change_state(WanderState::FindNewPosition, &mut self.ctx);
            true
        } else {
            false
        }
    }

    /// Return to rest.  `stop_moving` also aborts any in-flight movement.
    /// `false` if the manager was already at rest.
    pub fn stop_wandering(&mut self, stop_moving: bool) -> bool {
        if self.fsm.current_state() == WanderState::NotWandering {
            return false;
        }
        if stop_moving {
            self.ctx.locomotion.stop_moving();
        }
        self.fsm.change_state(WanderState::NotWandering, &mut self.ctx);
        true
    }

    /// `true` while actively looking for or walking to a destination.
    pub fn is_wandering(&self) -> bool {
        !matches!(
            self.fsm.current_state(),
            WanderState::NotWandering | WanderState::CannotWander
        )
    }

    #[inline]
    pub fn state(&self) -> WanderState {
        self.fsm.current_state()
    }

    /// Advance the manager by `delta` seconds and run one machine update.
    pub fn update(&mut self, delta: f64) {
        self.ctx.clock.advance(delta);
        self.fsm.update(&mut self.ctx);
    }

    // ── Provider access ───────────────────────────────────────────────────

    pub fn locomotion(&self) -> &L {
        &self.ctx.locomotion
    }

    pub fn locomotion_mut(&mut self) -> &mut L {
        &mut self.ctx.locomotion
    }

    pub fn policy(&self) -> &P {
        &self.ctx.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.ctx.policy
    }
}
