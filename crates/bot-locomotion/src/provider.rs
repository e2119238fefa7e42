//! Provider traits the wander manager is generic over.

use bot_core::{BotRng, Vec3};

/// Movement backend for one agent.
///
/// Calls must not block; `move_to` only *begins* a movement, and progress
/// is observed through [`is_moving`][Self::is_moving] on later frames.
pub trait Locomotion {
    /// Current world position of the agent.
    fn position(&self) -> Vec3;

    /// Begin moving toward `target`.  `false` if the movement cannot start
    /// (unreachable target, agent disabled, ...).
    fn move_to(&mut self, target: Vec3) -> bool;

    /// Abort any in-flight movement.
    fn stop_moving(&mut self);

    /// `true` while a movement begun by `move_to` is still in progress.
    fn is_moving(&self) -> bool;
}

/// Tunable wander behavior.
///
/// All values may change between frames — the manager re-queries rather
/// than caching, so a policy can, say, shrink its radius as night falls.
pub trait WanderPolicy {
    /// Whether wandering is currently possible at all.
    fn can_wander(&self) -> bool;

    /// Default radius for [`WanderManager::wander`][crate::WanderManager::wander].
    fn wander_radius(&self) -> f32;

    /// Pause before picking each new destination, in seconds.
    fn wait_time(&self) -> f64;

    /// Draw the actual pause from `0.75 × wait_time .. wait_time` instead
    /// of using it verbatim.
    fn randomize_wait(&self) -> bool;

    /// Give up on a movement after this many seconds and pick a new
    /// destination.  `0.0` disables the timeout.
    fn movement_timeout(&self) -> f64;

    /// Keep picking new destinations after each arrival instead of
    /// settling back into rest.
    fn auto_wander(&self) -> bool;

    /// Choose the next destination within `radius` of `center`, or `None`
    /// if no valid position exists right now.
    fn pick_position(&mut self, center: Vec3, radius: f32, rng: &mut BotRng) -> Option<Vec3>;
}
