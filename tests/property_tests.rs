//! Property-based tests for the transition protocol.
//!
//! Random operation sequences are replayed against a machine and a small
//! reference model; the machine must agree with the model after every step.

use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tickfsm::machine::{StateMachine, StateRegistry, TransitionError};
use tickfsm::{state_ids, State, StateId, StateRef};

state_ids! {
    enum Id {
        A,
        B,
        C,
        // Never registered
        Ghost,
    }
}

const REGISTERED: [Id; 3] = [Id::A, Id::B, Id::C];

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Enter(Id),
    Tick(Id),
    Exit(Id),
}

type Machine = StateMachine<Id, Vec<Event>>;

struct Probe {
    id: Id,
    enter_ok: bool,
    exit_ok: bool,
    guard_calls: AtomicUsize,
}

impl State<Id, Vec<Event>> for Probe {
    fn id(&self) -> Id {
        self.id
    }

    fn can_enter(&self, _machine: &Machine) -> bool {
        self.guard_calls.fetch_add(1, Ordering::SeqCst);
        self.enter_ok
    }

    fn can_exit(&self, _machine: &Machine) -> bool {
        self.guard_calls.fetch_add(1, Ordering::SeqCst);
        self.exit_ok
    }

    fn on_enter(&self, machine: &mut Machine) {
        machine.owner_mut().push(Event::Enter(self.id));
    }

    fn on_tick(&self, machine: &mut Machine) {
        machine.owner_mut().push(Event::Tick(self.id));
    }

    fn on_exit(&self, machine: &mut Machine) {
        machine.owner_mut().push(Event::Exit(self.id));
    }
}

#[derive(Clone, Debug)]
enum Op {
    TrySet(Id),
    TryReset(Id),
    Force(Id),
    Tick,
}

struct Fixture {
    machine: Machine,
    probes: Vec<Arc<Probe>>,
}

impl Fixture {
    fn new(guards: &[(bool, bool); 3]) -> Self {
        let probes: Vec<Arc<Probe>> = REGISTERED
            .iter()
            .zip(guards)
            .map(|(&id, &(enter_ok, exit_ok))| {
                Arc::new(Probe {
                    id,
                    enter_ok,
                    exit_ok,
                    guard_calls: AtomicUsize::new(0),
                })
            })
            .collect();

        let mut registry = StateRegistry::new();
        let shared: Vec<StateRef<Id, Vec<Event>>> = probes
            .iter()
            .map(|p| Arc::clone(p) as StateRef<Id, Vec<Event>>)
            .collect();
        registry.add_range(shared).unwrap();

        Self {
            machine: StateMachine::from_registry(Vec::new(), registry),
            probes,
        }
    }

    fn probe(&self, id: Id) -> Option<&Probe> {
        self.probes.iter().find(|p| p.id == id).map(|p| p.as_ref())
    }

    fn guard_calls(&self) -> usize {
        self.probes
            .iter()
            .map(|p| p.guard_calls.load(Ordering::SeqCst))
            .sum()
    }

    fn apply(&mut self, op: &Op) -> Option<Result<Id, TransitionError>> {
        match *op {
            Op::TrySet(id) => Some(self.machine.try_set(id).map(|s| s.id())),
            Op::TryReset(id) => Some(self.machine.try_reset(id).map(|s| s.id())),
            Op::Force(id) => {
                self.machine.force_set(id);
                None
            }
            Op::Tick => {
                self.machine.tick();
                None
            }
        }
    }
}

/// Reference model of the current identifier.
fn model_step(fixture: &Fixture, current: Option<Id>, op: &Op) -> Option<Id> {
    let guarded = |target: Id| -> Option<Id> {
        let target_probe = fixture.probe(target)?;
        let exit_ok = current
            .and_then(|c| fixture.probe(c))
            .map_or(true, |p| p.exit_ok);
        (exit_ok && target_probe.enter_ok).then_some(target)
    };

    match *op {
        Op::TrySet(id) if current == Some(id) => current,
        Op::TrySet(id) | Op::TryReset(id) => guarded(id).or(current),
        Op::Force(id) => Some(id),
        Op::Tick => current,
    }
}

fn arbitrary_id() -> impl Strategy<Value = Id> {
    prop_oneof![Just(Id::A), Just(Id::B), Just(Id::C), Just(Id::Ghost)]
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arbitrary_id().prop_map(Op::TrySet),
        arbitrary_id().prop_map(Op::TryReset),
        arbitrary_id().prop_map(Op::Force),
        Just(Op::Tick),
    ]
}

fn arbitrary_guards() -> impl Strategy<Value = [(bool, bool); 3]> {
    any::<[(bool, bool); 3]>()
}

proptest! {
    #[test]
    fn machine_agrees_with_model(
        guards in arbitrary_guards(),
        ops in prop::collection::vec(arbitrary_op(), 1..40)
    ) {
        let mut fixture = Fixture::new(&guards);
        let mut expected = None;

        for op in &ops {
            expected = model_step(&fixture, expected, op);
            fixture.apply(op);
            prop_assert_eq!(fixture.machine.current_id().copied(), expected);
        }
    }

    #[test]
    fn unknown_ids_leave_machine_unchanged(
        guards in arbitrary_guards(),
        ops in prop::collection::vec(arbitrary_op(), 0..20),
        reset in any::<bool>()
    ) {
        let mut fixture = Fixture::new(&guards);
        for op in &ops {
            fixture.apply(op);
        }

        let current = fixture.machine.current_id().copied();
        let previous = fixture.machine.previous_id().copied();
        let events = fixture.machine.owner().len();

        let op = if reset { Op::TryReset(Id::Ghost) } else { Op::TrySet(Id::Ghost) };
        let result = fixture.apply(&op);

        if current != Some(Id::Ghost) || reset {
            prop_assert!(
                matches!(result, Some(Err(TransitionError::UnknownState { .. }))),
                "unknown state should fail softly"
            );
        }
        prop_assert_eq!(fixture.machine.current_id().copied(), current);
        prop_assert_eq!(fixture.machine.previous_id().copied(), previous);
        prop_assert_eq!(fixture.machine.owner().len(), events);
    }

    #[test]
    fn enter_and_exit_strictly_alternate(
        guards in arbitrary_guards(),
        ops in prop::collection::vec(arbitrary_op(), 1..40)
    ) {
        let mut fixture = Fixture::new(&guards);
        for op in &ops {
            fixture.apply(op);
        }

        let lifecycle: Vec<&Event> = fixture
            .machine
            .owner()
            .iter()
            .filter(|e| !matches!(e, Event::Tick(_)))
            .collect();

        let mut inside: Option<Id> = None;
        for event in lifecycle {
            match event {
                Event::Enter(id) => {
                    prop_assert!(inside.is_none(), "enter before previous exit");
                    inside = Some(*id);
                }
                Event::Exit(id) => {
                    prop_assert_eq!(inside, Some(*id), "exit of a state that was not entered");
                    inside = None;
                }
                Event::Tick(_) => {}
            }
        }

        // Whatever was entered last and not exited is the live instance.
        let live = fixture.machine.current().map(|s| s.id());
        prop_assert_eq!(inside, live);
    }

    #[test]
    fn force_never_evaluates_guards(
        guards in arbitrary_guards(),
        targets in prop::collection::vec(arbitrary_id(), 1..20)
    ) {
        let mut fixture = Fixture::new(&guards);

        for target in targets {
            fixture.apply(&Op::Force(target));
            prop_assert_eq!(fixture.machine.current_id(), Some(&target));
        }
        prop_assert_eq!(fixture.guard_calls(), 0);
    }

    #[test]
    fn try_set_current_is_noop(
        guards in arbitrary_guards(),
        start in prop_oneof![Just(Id::A), Just(Id::B), Just(Id::C)],
        repeats in 1..5usize
    ) {
        let mut fixture = Fixture::new(&guards);
        fixture.apply(&Op::Force(start));
        let events = fixture.machine.owner().len();
        let calls = fixture.guard_calls();

        for _ in 0..repeats {
            let result = fixture.apply(&Op::TrySet(start));
            prop_assert_eq!(result, Some(Ok(start)));
        }

        prop_assert_eq!(fixture.machine.owner().len(), events);
        prop_assert_eq!(fixture.guard_calls(), calls);
        prop_assert!(fixture.machine.previous_id().is_none());
    }

    #[test]
    fn try_reset_current_reenters_once(
        start in prop_oneof![Just(Id::A), Just(Id::B), Just(Id::C)]
    ) {
        let mut fixture = Fixture::new(&[(true, true); 3]);
        fixture.apply(&Op::Force(start));
        let before = fixture.machine.owner().len();

        let result = fixture.apply(&Op::TryReset(start));

        prop_assert_eq!(result, Some(Ok(start)));
        let tail = &fixture.machine.owner()[before..];
        prop_assert_eq!(tail, &[Event::Exit(start), Event::Enter(start)][..]);
        prop_assert_eq!(fixture.machine.previous_id(), Some(&start));
    }
}

#[test]
fn state_names_are_stable() {
    for id in REGISTERED {
        assert_eq!(id.name(), id.name());
    }
    assert_eq!(Id::Ghost.name(), "Ghost");
}
