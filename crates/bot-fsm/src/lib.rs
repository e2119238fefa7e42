//! `bot-fsm` — a small per-frame finite-state machine.
//!
//! | Module      | Contents                                      |
//! |-------------|-----------------------------------------------|
//! | [`machine`] | `StateMachine<S, C>` and its per-state hooks  |
//! | [`manager`] | `Machine` trait + `MachineManager`            |
//!
//! States are plain `Copy + Eq + Hash` enums; behavior is attached as
//! per-state hooks over a caller-owned context `C`.  Hooks request
//! transitions by *returning* the next state instead of calling back into
//! the machine, so no hook ever aliases the machine it runs inside.

pub mod machine;
pub mod manager;


pub use machine::StateMachine;
pub use manager::{Machine, MachineManager};
