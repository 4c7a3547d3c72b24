//! Builder for closure-backed states.

use crate::core::{Guard, State, StateId, StateRef};
use crate::machine::StateMachine;
use std::sync::Arc;

type Hook<K, O> = Box<dyn Fn(&mut StateMachine<K, O>) + Send + Sync>;

/// A state whose guards and hooks are closures.
///
/// Built with [`StateBuilder`]; useful for small states and tests where a
/// dedicated type would be boilerplate.
pub struct FnState<K: StateId, O> {
    id: K,
    enter_guard: Guard<K, O>,
    exit_guard: Guard<K, O>,
    on_enter: Option<Hook<K, O>>,
    on_tick: Option<Hook<K, O>>,
    on_exit: Option<Hook<K, O>>,
}

impl<K: StateId, O> State<K, O> for FnState<K, O> {
    fn id(&self) -> K {
        self.id.clone()
    }

    fn can_enter(&self, machine: &StateMachine<K, O>) -> bool {
        self.enter_guard.check(machine)
    }

    fn can_exit(&self, machine: &StateMachine<K, O>) -> bool {
        self.exit_guard.check(machine)
    }

    fn on_enter(&self, machine: &mut StateMachine<K, O>) {
        if let Some(hook) = &self.on_enter {
            hook(machine);
        }
    }

    fn on_tick(&self, machine: &mut StateMachine<K, O>) {
        if let Some(hook) = &self.on_tick {
            hook(machine);
        }
    }

    fn on_exit(&self, machine: &mut StateMachine<K, O>) {
        if let Some(hook) = &self.on_exit {
            hook(machine);
        }
    }
}

/// Builder for constructing states with a fluent API.
///
/// # Example
///
/// ```rust
/// use tickfsm::builder::StateBuilder;
/// use tickfsm::machine::StateMachine;
///
/// struct Sentry {
///     alarms: u32,
/// }
///
/// let alert = StateBuilder::new("alert")
///     .enter_when(|m: &StateMachine<&'static str, Sentry>| m.owner().alarms > 0)
///     .on_tick(|m: &mut StateMachine<&'static str, Sentry>| m.owner_mut().alarms -= 1)
///     .build();
///
/// let mut machine = StateMachine::new(Sentry { alarms: 2 });
/// machine.register(alert).unwrap();
/// machine.try_set("alert").unwrap();
/// machine.tick();
/// assert_eq!(machine.owner().alarms, 1);
/// ```
pub struct StateBuilder<K: StateId, O> {
    state: FnState<K, O>,
}

impl<K: StateId, O> StateBuilder<K, O> {
    /// Start a state with the given identifier; guards default to allow.
    pub fn new(id: K) -> Self {
        Self {
            state: FnState {
                id,
                enter_guard: Guard::always(),
                exit_guard: Guard::always(),
                on_enter: None,
                on_tick: None,
                on_exit: None,
            },
        }
    }

    /// Set the enter guard.
    pub fn enter_guard(mut self, guard: Guard<K, O>) -> Self {
        self.state.enter_guard = guard;
        self
    }

    /// Set the exit guard.
    pub fn exit_guard(mut self, guard: Guard<K, O>) -> Self {
        self.state.exit_guard = guard;
        self
    }

    /// Set the enter guard from a closure.
    pub fn enter_when<F>(self, predicate: F) -> Self
    where
        F: Fn(&StateMachine<K, O>) -> bool + Send + Sync + 'static,
    {
        self.enter_guard(Guard::new(predicate))
    }

    /// Set the exit guard from a closure.
    pub fn exit_when<F>(self, predicate: F) -> Self
    where
        F: Fn(&StateMachine<K, O>) -> bool + Send + Sync + 'static,
    {
        self.exit_guard(Guard::new(predicate))
    }

    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut StateMachine<K, O>) + Send + Sync + 'static,
    {
        self.state.on_enter = Some(Box::new(hook));
        self
    }

    pub fn on_tick<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut StateMachine<K, O>) + Send + Sync + 'static,
    {
        self.state.on_tick = Some(Box::new(hook));
        self
    }

    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut StateMachine<K, O>) + Send + Sync + 'static,
    {
        self.state.on_exit = Some(Box::new(hook));
        self
    }

    /// Build the state.
    pub fn build(self) -> FnState<K, O> {
        self.state
    }

    /// Build the state as a shared handle, ready for `add_range`.
    pub fn shared(self) -> StateRef<K, O>
    where
        K: 'static,
        O: 'static,
    {
        Arc::new(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Npc {
        hunger: u32,
        log: Vec<&'static str>,
    }

    type Machine = StateMachine<&'static str, Npc>;

    #[test]
    fn bare_state_allows_everything() {
        let machine: Machine = StateMachine::new(Npc::default());
        let state = StateBuilder::new("idle").build();

        assert_eq!(state.id(), "idle");
        assert!(state.can_enter(&machine));
        assert!(state.can_exit(&machine));
    }

    #[test]
    fn hooks_run_in_lifecycle_order() {
        let mut machine: Machine = StateMachine::new(Npc::default());
        machine
            .register(
                StateBuilder::new("eat")
                    .on_enter(|m: &mut Machine| m.owner_mut().log.push("enter"))
                    .on_tick(|m: &mut Machine| m.owner_mut().log.push("tick"))
                    .on_exit(|m: &mut Machine| m.owner_mut().log.push("exit"))
                    .build(),
            )
            .unwrap();

        machine.try_set("eat").unwrap();
        machine.tick();
        let npc = machine.shutdown();

        assert_eq!(npc.log, vec!["enter", "tick", "exit"]);
    }

    #[test]
    fn guards_come_from_closures() {
        let mut machine: Machine = StateMachine::new(Npc { hunger: 3, ..Npc::default() });
        machine
            .register(
                StateBuilder::new("eat")
                    .enter_when(|m: &Machine| m.owner().hunger > 5)
                    .build(),
            )
            .unwrap();

        assert!(!machine.can_set(&"eat"));
        machine.owner_mut().hunger = 8;
        assert!(machine.can_set(&"eat"));
    }

    #[test]
    fn explicit_guard_objects() {
        let machine: Machine = StateMachine::new(Npc::default());
        let state = StateBuilder::new("sleep")
            .enter_guard(Guard::owner(|npc: &Npc| npc.hunger == 0))
            .exit_guard(Guard::new(|_: &Machine| false))
            .build();

        assert!(state.can_enter(&machine));
        assert!(!state.can_exit(&machine));
    }

    #[test]
    fn shared_state_is_registrable_in_bulk() {
        let mut machine: Machine = StateMachine::new(Npc::default());
        let added = machine
            .add_range(vec![
                StateBuilder::new("a").shared(),
                StateBuilder::new("b").shared(),
            ])
            .unwrap();
        assert_eq!(added, 2);
    }
}
