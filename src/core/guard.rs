//! Guard predicates for controlling state transitions.
//!
//! Guards are boolean functions over the machine that decide whether a
//! state may be entered or left. They back the `can_enter`/`can_exit`
//! checks of closure-built states (see [`StateBuilder`]).
//!
//! [`StateBuilder`]: crate::builder::StateBuilder

use super::id::StateId;
use crate::machine::StateMachine;

type Predicate<K, O> = Box<dyn Fn(&StateMachine<K, O>) -> bool + Send + Sync>;

/// Predicate that determines if a transition can execute.
///
/// Guards are evaluated before any side effect of a guarded transition and
/// must not mutate the machine (they only see it by shared reference).
///
/// # Example
///
/// ```rust
/// use tickfsm::core::Guard;
/// use tickfsm::machine::StateMachine;
///
/// struct Unit {
///     stamina: u32,
/// }
///
/// let tired = Guard::new(|m: &StateMachine<&'static str, Unit>| m.owner().stamina < 10);
///
/// let machine = StateMachine::new(Unit { stamina: 3 });
/// assert!(tired.check(&machine));
/// ```
pub struct Guard<K: StateId, O> {
    predicate: Predicate<K, O>,
}

impl<K: StateId, O> Guard<K, O> {
    /// Create a guard from a predicate function.
    ///
    /// The predicate should be deterministic for a given machine and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&StateMachine<K, O>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Guard that always passes.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Guard that passes only when the owner satisfies `predicate`.
    pub fn owner<F>(predicate: F) -> Self
    where
        F: Fn(&O) -> bool + Send + Sync + 'static,
    {
        Self::new(move |machine| predicate(machine.owner()))
    }

    /// Check if the guard allows the transition.
    pub fn check(&self, machine: &StateMachine<K, O>) -> bool {
        (self.predicate)(machine)
    }
}

impl<K: StateId, O> Default for Guard<K, O> {
    fn default() -> Self {
        Self::always()
    }
}
