//! Registry mapping state identifiers to state instances.

use super::error::{RegistrationError, RegistryError};
use crate::core::{State, StateId, StateRef};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Identifier → instance map owned by a machine.
///
/// Identifiers are unique: registering an identifier twice is an error.
/// [`replace`](Self::replace) is the explicit way to swap an instance.
pub struct StateRegistry<K: StateId, O> {
    states: HashMap<K, StateRef<K, O>>,
}

impl<K: StateId, O> StateRegistry<K, O> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// Build a registry from states keyed by their natural identifiers.
    pub fn from_states<I>(states: I) -> Result<Self, RegistrationError>
    where
        I: IntoIterator<Item = StateRef<K, O>>,
    {
        let mut registry = Self::new();
        registry.add_range(states)?;
        Ok(registry)
    }

    /// Register a state under its natural identifier.
    pub fn register<S>(&mut self, state: S) -> Result<(), RegistryError>
    where
        S: State<K, O> + 'static,
    {
        self.insert(state.id(), Arc::new(state))
    }

    /// Register a shared state under an explicit identifier.
    pub fn insert(&mut self, id: K, state: StateRef<K, O>) -> Result<(), RegistryError> {
        if self.states.contains_key(&id) {
            tracing::warn!(state = id.name(), "rejected duplicate state registration");
            return Err(RegistryError::AlreadyRegistered {
                state: id.name().to_string(),
            });
        }
        self.states.insert(id, state);
        Ok(())
    }

    /// Forced re-registration: bind `id` to `state`, returning the previous
    /// instance if there was one.
    pub fn replace(&mut self, id: K, state: StateRef<K, O>) -> Option<StateRef<K, O>> {
        self.states.insert(id, state)
    }

    /// Check a batch against the registry, accumulating ALL conflicts.
    pub fn check_batch(&self, states: &[StateRef<K, O>]) -> Validation<(), NonEmptyVec<RegistryError>> {
        let mut seen = HashSet::new();
        let checks: Vec<Validation<(), NonEmptyVec<RegistryError>>> = states
            .iter()
            .map(|state| {
                let id = state.id();
                if self.states.contains_key(&id) {
                    Validation::fail(RegistryError::AlreadyRegistered {
                        state: id.name().to_string(),
                    })
                } else if !seen.insert(id.clone()) {
                    Validation::fail(RegistryError::DuplicateInBatch {
                        state: id.name().to_string(),
                    })
                } else {
                    Validation::success(())
                }
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Register every state under its natural identifier.
    ///
    /// The batch is all-or-nothing: if any identifier is already registered
    /// or repeated within the batch, nothing is added and every conflict is
    /// reported. Returns the number of states added.
    pub fn add_range<I>(&mut self, states: I) -> Result<usize, RegistrationError>
    where
        I: IntoIterator<Item = StateRef<K, O>>,
    {
        let states: Vec<StateRef<K, O>> = states.into_iter().collect();

        if let Validation::Failure(errors) = self.check_batch(&states) {
            let conflicts: Vec<RegistryError> = errors.iter().cloned().collect();
            tracing::warn!(conflicts = conflicts.len(), "rejected state batch");
            return Err(RegistrationError { conflicts });
        }

        let added = states.len();
        for state in states {
            self.states.insert(state.id(), state);
        }
        Ok(added)
    }

    pub fn get(&self, id: &K) -> Option<&StateRef<K, O>> {
        self.states.get(id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.states.contains_key(id)
    }

    /// Registered identifiers, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.states.keys()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<K: StateId, O> Default for StateRegistry<K, O> {
    fn default() -> Self {
        Self::new()
    }
}
