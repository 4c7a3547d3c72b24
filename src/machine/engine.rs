//! The keyed state machine engine.

use super::config::MachineConfig;
use super::error::{GuardSide, RegistrationError, RegistryError, TransitionError};
use super::registry::StateRegistry;
use crate::core::{
    display_name, State, StateId, StateRef, TransitionHistory, TransitionKind, TransitionRecord,
};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// State machine bound to one owner for its whole lifetime.
///
/// The machine owns its registry and its owner value; states reach the
/// owner through [`owner`](Self::owner) / [`owner_mut`](Self::owner_mut).
/// To drive an entity the machine does not own, instantiate `O` as a
/// reference type.
///
/// # Transition protocol
///
/// 1. previous id/instance ← current
/// 2. outgoing `on_exit` (if there is a current instance)
/// 3. current id/instance ← target
/// 4. incoming `on_enter` (if the target instance exists)
///
/// Guarded requests ([`try_set`](Self::try_set), [`try_reset`](Self::try_reset))
/// evaluate the current state's `can_exit` and the target's `can_enter`
/// before step 1. [`force_set`](Self::force_set) never evaluates guards.
///
/// Transitions requested from inside a callback run immediately. A request
/// made from `on_exit` supersedes the transition that triggered the exit:
/// the exiting state is not exited a second time and the outer request
/// reports [`TransitionError::Superseded`].
///
/// # Example
///
/// ```rust
/// use tickfsm::core::State;
/// use tickfsm::machine::{StateMachine, StateRegistry};
/// use tickfsm::state_ids;
///
/// state_ids! {
///     pub enum Door {
///         Closed,
///         Open,
///     }
/// }
///
/// struct Closed;
/// struct Open;
///
/// impl State<Door, Vec<&'static str>> for Closed {
///     fn id(&self) -> Door { Door::Closed }
///     fn on_exit(&self, m: &mut StateMachine<Door, Vec<&'static str>>) {
///         m.owner_mut().push("creak");
///     }
/// }
///
/// impl State<Door, Vec<&'static str>> for Open {
///     fn id(&self) -> Door { Door::Open }
/// }
///
/// let mut registry = StateRegistry::new();
/// registry.register(Closed).unwrap();
/// registry.register(Open).unwrap();
///
/// let mut machine = StateMachine::from_registry(Vec::new(), registry);
/// machine.force_set(Door::Closed);
/// machine.try_set(Door::Open).unwrap();
///
/// assert_eq!(machine.current_id(), Some(&Door::Open));
/// assert_eq!(machine.previous_id(), Some(&Door::Closed));
/// assert_eq!(machine.owner(), &vec!["creak"]);
/// ```
pub struct StateMachine<K: StateId, O> {
    owner: O,
    registry: StateRegistry<K, O>,
    current_id: Option<K>,
    current: Option<StateRef<K, O>>,
    previous_id: Option<K>,
    previous: Option<StateRef<K, O>>,
    history: TransitionHistory<K>,
    config: MachineConfig,
    sequence: u64,
    depth: usize,
    exiting: bool,
    // Fallback read by `DefaultStateMachine` and its recovery action.
    pub(crate) default_id: Option<K>,
}

impl<K: StateId, O> StateMachine<K, O> {
    /// Create a machine with an empty registry and no current state.
    pub fn new(owner: O) -> Self {
        Self::from_parts(owner, StateRegistry::new(), MachineConfig::default())
    }

    /// Create a machine over a populated registry without entering any state.
    pub fn from_registry(owner: O, registry: StateRegistry<K, O>) -> Self {
        Self::from_parts(owner, registry, MachineConfig::default())
    }

    /// Create a machine holding a single state and enter it.
    pub fn with_state<S>(owner: O, state: S) -> Self
    where
        S: State<K, O> + 'static,
    {
        let id = state.id();
        let mut registry = StateRegistry::new();
        registry.replace(id.clone(), Arc::new(state));

        let mut machine = Self::from_registry(owner, registry);
        machine.force_set(id);
        machine
    }

    /// Add `state` to `registry` and enter it.
    ///
    /// Fails if the state's identifier is already registered.
    pub fn with_initial<S>(
        owner: O,
        mut registry: StateRegistry<K, O>,
        state: S,
    ) -> Result<Self, RegistryError>
    where
        S: State<K, O> + 'static,
    {
        let id = state.id();
        registry.register(state)?;

        let mut machine = Self::from_registry(owner, registry);
        machine.force_set(id);
        Ok(machine)
    }

    pub(crate) fn from_parts(owner: O, registry: StateRegistry<K, O>, config: MachineConfig) -> Self {
        Self {
            owner,
            registry,
            current_id: None,
            current: None,
            previous_id: None,
            previous: None,
            history: TransitionHistory::with_capacity(config.history_capacity),
            config,
            sequence: 0,
            depth: 0,
            exiting: false,
            default_id: None,
        }
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn owner_mut(&mut self) -> &mut O {
        &mut self.owner
    }

    pub fn registry(&self) -> &StateRegistry<K, O> {
        &self.registry
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn history(&self) -> &TransitionHistory<K> {
        &self.history
    }

    pub fn current_id(&self) -> Option<&K> {
        self.current_id.as_ref()
    }

    pub fn previous_id(&self) -> Option<&K> {
        self.previous_id.as_ref()
    }

    pub fn current(&self) -> Option<&StateRef<K, O>> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&StateRef<K, O>> {
        self.previous.as_ref()
    }

    /// True after a forced transition to an unregistered identifier: the
    /// current id is set but there is no instance to tick.
    pub fn is_degraded(&self) -> bool {
        self.current_id.is_some() && self.current.is_none()
    }

    /// Register a single state under its natural identifier.
    pub fn register<S>(&mut self, state: S) -> Result<(), RegistryError>
    where
        S: State<K, O> + 'static,
    {
        self.registry.register(state)
    }

    /// Bulk-register states under their natural identifiers.
    ///
    /// All-or-nothing; see [`StateRegistry::add_range`].
    pub fn add_range<I>(&mut self, states: I) -> Result<usize, RegistrationError>
    where
        I: IntoIterator<Item = StateRef<K, O>>,
    {
        self.registry.add_range(states)
    }

    /// Forced re-registration of `id`.
    ///
    /// If `id` is current, the running instance stays current until the
    /// next transition into `id` (e.g. `try_reset`).
    pub fn replace(&mut self, id: K, state: StateRef<K, O>) -> Option<StateRef<K, O>> {
        self.registry.replace(id, state)
    }

    /// Drive the current state one step. No-op without a current instance.
    pub fn tick(&mut self) {
        if let Some(state) = self.current.clone() {
            tracing::trace!(state = %display_name(self.current_id.as_ref()), "tick");
            state.on_tick(self);
        }
    }

    /// Enter `id` unless it is already current.
    ///
    /// Requesting the current identifier returns the current instance
    /// without evaluating guards or re-running any callback.
    pub fn try_set(&mut self, id: K) -> Result<StateRef<K, O>, TransitionError> {
        if self.current_id.as_ref() == Some(&id) {
            return self.current.clone().ok_or_else(|| TransitionError::UnknownState {
                state: id.name().to_string(),
            });
        }
        self.try_reset(id)
    }

    /// Enter `id`, re-entering it if it is already current.
    ///
    /// Returns the entered instance. The machine is unchanged when `id` is
    /// unknown or a guard refuses.
    pub fn try_reset(&mut self, id: K) -> Result<StateRef<K, O>, TransitionError> {
        let Some(target) = self.registry.get(&id).cloned() else {
            tracing::debug!(state = id.name(), "transition to unknown state ignored");
            return Err(TransitionError::UnknownState {
                state: id.name().to_string(),
            });
        };

        if let Some(limit) = self.config.max_transition_depth {
            if self.depth >= limit {
                tracing::warn!(state = id.name(), limit, "transition depth limit reached");
                return Err(TransitionError::DepthExceeded { limit });
            }
        }

        if let Err(side) = self.check_guards(&target) {
            let from = display_name(self.current_id.as_ref());
            tracing::debug!(from = %from, to = id.name(), %side, "transition refused");
            return Err(TransitionError::Refused {
                from,
                to: id.name().to_string(),
                side,
            });
        }

        let requested = id.name().to_string();
        if self.transition(id, Some(Arc::clone(&target)), TransitionKind::Guarded) {
            Ok(target)
        } else {
            Err(TransitionError::Superseded {
                requested,
                actual: display_name(self.current_id.as_ref()),
            })
        }
    }

    /// Enter `id` unconditionally.
    ///
    /// Guards are bypassed and an unregistered `id` is tolerated: the
    /// machine then records `id` as current with no instance, and ticks are
    /// no-ops until the next transition. Returns the resolved instance.
    pub fn force_set(&mut self, id: K) -> Option<StateRef<K, O>> {
        let target = self.registry.get(&id).cloned();
        if target.is_none() {
            tracing::warn!(state = id.name(), "forced transition to unregistered state");
        }
        self.transition(id, target.clone(), TransitionKind::Forced);
        target
    }

    /// Whether a guarded transition to `id` would currently be allowed.
    pub fn can_set(&self, id: &K) -> bool {
        self.registry
            .get(id)
            .is_some_and(|target| self.check_guards(target).is_ok())
    }

    /// First identifier in `ids` whose guarded transition would be allowed.
    pub fn first_enterable<'a, I>(&self, ids: I) -> Option<K>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        ids.into_iter().find(|id| self.can_set(id)).cloned()
    }

    /// Exit the current state and hand the owner back.
    ///
    /// States entered by transitions requested from the final `on_exit` are
    /// exited as well.
    pub fn shutdown(mut self) -> O {
        while let Some(state) = self.current.clone() {
            let sequence = self.sequence;
            self.exiting = true;
            state.on_exit(&mut self);
            self.exiting = false;
            if self.sequence == sequence {
                break;
            }
        }
        tracing::debug!(state = %display_name(self.current_id.as_ref()), "machine shut down");
        self.owner
    }

    fn check_guards(&self, target: &StateRef<K, O>) -> Result<(), GuardSide> {
        if let Some(current) = &self.current {
            if !current.can_exit(self) {
                return Err(GuardSide::Exit);
            }
        }
        if !target.can_enter(self) {
            return Err(GuardSide::Enter);
        }
        Ok(())
    }

    /// Runs the transition protocol. Returns false when a transition
    /// requested from the outgoing state's `on_exit` took over.
    fn transition(&mut self, id: K, target: Option<StateRef<K, O>>, kind: TransitionKind) -> bool {
        self.depth += 1;
        let completed = self.run_transition(id, target, kind);
        self.depth -= 1;
        completed
    }

    fn run_transition(&mut self, id: K, target: Option<StateRef<K, O>>, kind: TransitionKind) -> bool {
        let outgoing = self.current.clone();
        self.previous_id = self.current_id.clone();
        self.previous = outgoing.clone();

        // The exiting state already runs its on_exit when a nested request
        // lands here from inside it.
        if let Some(state) = outgoing.filter(|_| !self.exiting) {
            let sequence = self.sequence;
            self.exiting = true;
            state.on_exit(self);
            self.exiting = false;

            if self.sequence != sequence {
                tracing::debug!(
                    requested = id.name(),
                    actual = %display_name(self.current_id.as_ref()),
                    "transition superseded during exit"
                );
                return false;
            }
        }
        self.exiting = false;

        self.sequence += 1;
        let from = self.current_id.replace(id.clone());
        self.current = target.clone();

        tracing::debug!(
            from = %display_name(from.as_ref()),
            to = id.name(),
            ?kind,
            sequence = self.sequence,
            "state transition"
        );
        self.history.record(TransitionRecord {
            sequence: self.sequence,
            from,
            to: id,
            kind,
            timestamp: Utc::now(),
        });

        if let Some(state) = target {
            state.on_enter(self);
        }
        true
    }
}

impl<K: StateId, O> fmt::Debug for StateMachine<K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_id)
            .field("previous", &self.previous_id)
            .field("registered", &self.registry.len())
            .field("sequence", &self.sequence)
            .finish()
    }
}
