//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders and macros for creating states and
//! machines with minimal boilerplate while maintaining type safety.

pub mod error;
pub mod machine;
pub mod macros;
pub mod state;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use state::{FnState, StateBuilder};

use crate::core::{StateId, StateRef};

/// Create a state with no guards or hooks.
///
/// Handy as a placeholder default or a terminal "idle" state.
///
/// # Example
///
/// ```
/// use tickfsm::builder::passive_state;
/// use tickfsm::machine::StateMachine;
///
/// let mut machine = StateMachine::new(());
/// machine.add_range(vec![passive_state("idle")]).unwrap();
/// assert!(machine.try_set("idle").is_ok());
/// ```
pub fn passive_state<K, O>(id: K) -> StateRef<K, O>
where
    K: StateId + 'static,
    O: 'static,
{
    StateBuilder::new(id).shared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::StateMachine;

    #[test]
    fn passive_state_builds() {
        let state: StateRef<&'static str, ()> = passive_state("idle");
        let machine = StateMachine::new(());

        assert_eq!(state.id(), "idle");
        assert!(state.can_enter(&machine));
        assert!(state.can_exit(&machine));
    }
}
