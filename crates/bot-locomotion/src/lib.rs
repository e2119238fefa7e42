//! `bot-locomotion` — autonomous wandering on top of [`bot_fsm`].
//!
//! | Module       | Contents                                         |
//! |--------------|--------------------------------------------------|
//! | [`provider`] | `Locomotion` and `WanderPolicy` provider traits  |
//! | [`wander`]   | `WanderManager` — the wander state machine       |
//!
//! The crate knows nothing about any particular engine: movement and
//! destination policy come in through the provider traits, which are
//! treated as opaque, non-blocking oracles queried once per frame.

pub mod provider;
pub mod wander;


pub use provider::{Locomotion, WanderPolicy};
pub use wander::{WanderManager, WanderState};
