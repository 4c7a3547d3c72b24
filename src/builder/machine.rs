//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{State, StateId, StateRef};
use crate::machine::{DefaultStateMachine, MachineConfig, StateMachine, StateRegistry};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// Unlike the plain constructors, the builder validates its input: an
/// explicit initial state must be registered, and duplicate states are
/// reported together.
///
/// # Example
///
/// ```rust
/// use tickfsm::builder::{MachineBuilder, StateBuilder};
///
/// let machine = MachineBuilder::new()
///     .owner(0u32)
///     .state(StateBuilder::new("wait").build())
///     .state(StateBuilder::new("wander").build())
///     .default_state("wait")
///     .build_with_default()
///     .unwrap();
///
/// assert_eq!(machine.current_id(), Some(&"wait"));
/// ```
pub struct MachineBuilder<K: StateId, O> {
    owner: Option<O>,
    states: Vec<StateRef<K, O>>,
    config: MachineConfig,
    initial: Option<K>,
    default_id: Option<K>,
}

impl<K: StateId, O> MachineBuilder<K, O> {
    pub fn new() -> Self {
        Self {
            owner: None,
            states: Vec::new(),
            config: MachineConfig::default(),
            initial: None,
            default_id: None,
        }
    }

    /// Set the owner (required).
    pub fn owner(mut self, owner: O) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Add a state.
    pub fn state<S>(mut self, state: S) -> Self
    where
        S: State<K, O> + 'static,
    {
        self.states.push(Arc::new(state));
        self
    }

    /// Add multiple shared states at once.
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = StateRef<K, O>>,
    {
        self.states.extend(states);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// State entered (forced) when the machine is built.
    pub fn initial(mut self, id: K) -> Self {
        self.initial = Some(id);
        self
    }

    /// Fallback state for [`build_with_default`](Self::build_with_default).
    pub fn default_state(mut self, id: K) -> Self {
        self.default_id = Some(id);
        self
    }

    /// Build a plain machine, entering the initial state if one was given.
    pub fn build(self) -> Result<StateMachine<K, O>, BuildError> {
        let (mut machine, initial, _) = self.assemble()?;
        if let Some(id) = initial {
            machine.force_set(id);
        }
        Ok(machine)
    }

    /// Build a machine with a default state.
    ///
    /// Enters the initial state if one was given, the default otherwise.
    /// An unregistered default is accepted and leaves the machine degraded.
    pub fn build_with_default(self) -> Result<DefaultStateMachine<K, O>, BuildError> {
        let (machine, initial, default_id) = self.assemble()?;
        let default_id = default_id.ok_or(BuildError::MissingDefault)?;

        let first = initial.unwrap_or_else(|| default_id.clone());
        let mut machine = DefaultStateMachine::from_machine(machine, Some(default_id));
        machine.force_set(first);
        Ok(machine)
    }

    fn assemble(self) -> Result<(StateMachine<K, O>, Option<K>, Option<K>), BuildError> {
        let owner = self.owner.ok_or(BuildError::MissingOwner)?;
        self.config.validate()?;
        let registry = StateRegistry::from_states(self.states)?;

        if let Some(id) = &self.initial {
            if !registry.contains(id) {
                return Err(BuildError::UnknownInitial {
                    state: id.name().to_string(),
                });
            }
        }

        let machine = StateMachine::from_parts(owner, registry, self.config);
        Ok((machine, self.initial, self.default_id))
    }
}

impl<K: StateId, O> Default for MachineBuilder<K, O> {
    fn default() -> Self {
        Self::new()
    }
}
