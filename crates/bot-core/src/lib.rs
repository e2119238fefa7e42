//! `bot-core` — foundational types for the `rust_bot` AI toolkit.
//!
//! This crate is a dependency of every other `bot-*` crate.  It intentionally
//! has no `bot-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                      |
//! |----------|-----------------------------------------------|
//! | [`time`] | `BotClock` — per-tree elapsed-seconds clock   |
//! | [`rng`]  | `BotRng` — seedable deterministic RNG wrapper |
//! | [`math`] | `Vec3`, distance helpers                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod math;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use math::Vec3;
pub use rng::BotRng;
pub use time::BotClock;
