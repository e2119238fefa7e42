//! Driving several machines over one shared context.

use std::hash::Hash;

use crate::StateMachine;

/// Object-safe face of a state machine, erasing the state enum so machines
/// with different state types can share one update list.
pub trait Machine<C> {
    /// Advance the machine by one frame against the shared context.
    fn update(&mut self, ctx: &mut C);
}

impl<S: Copy + Eq + Hash, C> Machine<C> for StateMachine<S, C> {
    fn update(&mut self, ctx: &mut C) {
        StateMachine::update(self, ctx);
    }
}

/// Updates a set of boxed machines once per frame, in registration order.
pub struct MachineManager<C> {
    machines: Vec<Box<dyn Machine<C>>>,
}

impl<C> Default for MachineManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> MachineManager<C> {
    pub fn new() -> Self {
        Self { machines: Vec::new() }
    }

    pub fn add(&mut self, machine: Box<dyn Machine<C>>) {
        self.machines.push(machine);
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Update every registered machine against `ctx`.
    pub fn update_all(&mut self, ctx: &mut C) {
        for machine in &mut self.machines {
            machine.update(ctx);
        }
    }
}
