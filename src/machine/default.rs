//! State machine with a designated fallback state.

use super::engine::StateMachine;
use super::error::TransitionError;
use super::registry::StateRegistry;
use crate::core::{State, StateId, StateRef};
use std::ops::{Deref, DerefMut};

/// A [`StateMachine`] that remembers a default state to fall back on.
///
/// Dereferences to the wrapped machine, so the whole engine surface
/// (`tick`, `try_set`, `force_set`, ...) is available directly.
///
/// Construction favors availability: a default identifier that is not
/// registered still becomes current, leaving the machine degraded (id set,
/// no instance) rather than failing.
///
/// # Example
///
/// ```rust
/// use tickfsm::builder::StateBuilder;
/// use tickfsm::machine::{DefaultStateMachine, StateRegistry};
///
/// let mut registry = StateRegistry::new();
/// registry.register(StateBuilder::new("idle").build()).unwrap();
/// registry.register(StateBuilder::new("alert").build()).unwrap();
///
/// let mut machine = DefaultStateMachine::from_registry((), registry, "idle");
/// assert_eq!(machine.current_id(), Some(&"idle"));
///
/// machine.try_set("alert").unwrap();
/// machine.try_set_default().unwrap();
/// assert_eq!(machine.current_id(), Some(&"idle"));
/// ```
pub struct DefaultStateMachine<K: StateId, O> {
    machine: StateMachine<K, O>,
}

impl<K: StateId, O> DefaultStateMachine<K, O> {
    /// Create an empty machine with no default yet.
    ///
    /// Use [`set_default_and_recover`](Self::set_default_and_recover) once
    /// states are registered.
    pub fn new(owner: O) -> Self {
        Self::from_machine(StateMachine::new(owner), None)
    }

    /// Create a machine holding `state`, which is both default and current.
    pub fn with_state<S>(owner: O, state: S) -> Self
    where
        S: State<K, O> + 'static,
    {
        let id = state.id();
        Self::from_machine(StateMachine::with_state(owner, state), Some(id))
    }

    /// Create an empty machine whose default is `default_id`.
    ///
    /// The registry is empty, so the machine starts degraded on
    /// `default_id` until states are registered and a transition occurs.
    pub fn with_default(owner: O, default_id: K) -> Self {
        let mut machine = Self::from_machine(StateMachine::new(owner), Some(default_id.clone()));
        machine.machine.force_set(default_id);
        machine
    }

    /// Create a machine over `registry` and force it into `default_id`.
    pub fn from_registry(owner: O, registry: StateRegistry<K, O>, default_id: K) -> Self {
        let mut machine =
            Self::from_machine(StateMachine::from_registry(owner, registry), Some(default_id.clone()));
        machine.machine.force_set(default_id);
        machine
    }

    /// Wrap an existing machine without performing any transition.
    pub fn from_machine(mut machine: StateMachine<K, O>, default_id: Option<K>) -> Self {
        machine.default_id = default_id;
        Self { machine }
    }

    pub fn default_id(&self) -> Option<&K> {
        self.machine.default_id.as_ref()
    }

    /// Store a new default and, if the machine has no current instance,
    /// force-transition into it immediately.
    ///
    /// Returns true when the recovery transition ran.
    pub fn set_default_and_recover(&mut self, default_id: K) -> bool {
        self.machine.default_id = Some(default_id);
        self.ensure_default()
    }

    /// Force into the default when there is no current instance.
    ///
    /// Returns true when a transition ran.
    pub fn ensure_default(&mut self) -> bool {
        match &self.machine.default_id {
            Some(id) if self.machine.current().is_none() => {
                tracing::debug!(state = id.name(), "recovering to default state");
                let id = id.clone();
                self.machine.force_set(id);
                true
            }
            _ => false,
        }
    }

    /// [`try_set`](StateMachine::try_set) against the default.
    pub fn try_set_default(&mut self) -> Result<StateRef<K, O>, TransitionError> {
        let id = self.machine.default_id.clone().ok_or(TransitionError::NoDefault)?;
        self.machine.try_set(id)
    }

    /// [`try_reset`](StateMachine::try_reset) against the default.
    pub fn try_reset_default(&mut self) -> Result<StateRef<K, O>, TransitionError> {
        let id = self.machine.default_id.clone().ok_or(TransitionError::NoDefault)?;
        self.machine.try_reset(id)
    }

    /// [`force_set`](StateMachine::force_set) against the default.
    pub fn force_set_default(&mut self) -> Result<Option<StateRef<K, O>>, TransitionError> {
        let id = self.machine.default_id.clone().ok_or(TransitionError::NoDefault)?;
        Ok(self.machine.force_set(id))
    }

    /// Recovery action that force-sets the default.
    ///
    /// The returned closure can be handed to watchdogs or called from inside
    /// a state. It reads the default from the machine it is given at call
    /// time, so later calls to
    /// [`set_default_and_recover`](Self::set_default_and_recover) are
    /// honored. It does nothing if no default is set.
    pub fn recovery_action(&self) -> impl Fn(&mut StateMachine<K, O>) + Clone + Send + Sync {
        |machine: &mut StateMachine<K, O>| {
            if let Some(id) = machine.default_id.clone() {
                machine.force_set(id);
            }
        }
    }

    pub fn into_inner(self) -> StateMachine<K, O> {
        self.machine
    }

    /// Exit the current state and hand the owner back.
    pub fn shutdown(self) -> O {
        self.machine.shutdown()
    }
}

impl<K: StateId, O> Deref for DefaultStateMachine<K, O> {
    type Target = StateMachine<K, O>;

    fn deref(&self) -> &Self::Target {
        &self.machine
    }
}

impl<K: StateId, O> DerefMut for DefaultStateMachine<K, O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.machine
    }
}
