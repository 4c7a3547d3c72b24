//! The State contract implemented by every state a machine can enter.
//!
//! States receive the machine in every callback. The owner is reachable
//! through [`StateMachine::owner`] / [`StateMachine::owner_mut`], and
//! transitions can be requested re-entrantly from any lifecycle hook.

use super::id::StateId;
use crate::machine::StateMachine;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a registered state instance.
///
/// The engine clones the handle before invoking a callback, which keeps the
/// machine free to be borrowed mutably by the state.
pub type StateRef<K, O> = Arc<dyn State<K, O>>;

/// Trait for states driven by a [`StateMachine`].
///
/// Guards are pure predicates evaluated before a guarded transition; the
/// lifecycle hooks carry the side effects. All methods have defaults, so a
/// state only implements the ones it cares about.
///
/// Callbacks take `&self`: per-state runtime data either lives in the owner
/// or behind interior mutability (atomics, locks).
///
/// # Example
///
/// ```rust
/// use tickfsm::core::State;
/// use tickfsm::machine::StateMachine;
///
/// struct Counter {
///     ticks: u32,
/// }
///
/// struct Counting;
///
/// impl State<&'static str, Counter> for Counting {
///     fn id(&self) -> &'static str {
///         "counting"
///     }
///
///     fn on_tick(&self, machine: &mut StateMachine<&'static str, Counter>) {
///         machine.owner_mut().ticks += 1;
///     }
/// }
///
/// let mut machine = StateMachine::with_state(Counter { ticks: 0 }, Counting);
/// machine.tick();
/// machine.tick();
/// assert_eq!(machine.owner().ticks, 2);
/// ```
pub trait State<K: StateId, O>: Send + Sync {
    /// Natural identifier of this state.
    ///
    /// Used when a state is registered without an explicit key.
    fn id(&self) -> K;

    /// Whether the machine may transition into this state.
    ///
    /// Default implementation returns `true`.
    fn can_enter(&self, _machine: &StateMachine<K, O>) -> bool {
        true
    }

    /// Whether the machine may leave this state while it is current.
    ///
    /// Default implementation returns `true`.
    fn can_exit(&self, _machine: &StateMachine<K, O>) -> bool {
        true
    }

    /// Called once, right after this state becomes current.
    fn on_enter(&self, _machine: &mut StateMachine<K, O>) {}

    /// Called on every machine tick while this state is current.
    fn on_tick(&self, _machine: &mut StateMachine<K, O>) {}

    /// Called once, right before this state stops being current.
    fn on_exit(&self, _machine: &mut StateMachine<K, O>) {}
}

impl<K: StateId, O> fmt::Debug for dyn State<K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State").field(&self.id()).finish()
    }
}
