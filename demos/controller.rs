//! Wait / Random-Change Controller
//!
//! This demo drives a controller through two behaviors for a fixed number
//! of simulation ticks.
//!
//! Key concepts:
//! - A default state entered at construction
//! - Transitions requested from inside `on_tick`
//! - Owner data (counter, random source) reached through the machine
//!
//! Run with: cargo run --example controller
//! Set `RUST_LOG=tickfsm=debug` to see the engine's transition log.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tickfsm::core::{State, StateId};
use tickfsm::machine::{DefaultStateMachine, StateMachine, StateRegistry};
use tickfsm::state_ids;

state_ids! {
    enum Behavior {
        WaitSeconds,
        RandomChange,
    }
}

/// The entity whose behavior the machine drives.
struct Controller {
    count: u32,
    random: StdRng,
}

type Machine = StateMachine<Behavior, Controller>;

/// Counts ticks and moves on after ten of them.
struct WaitSeconds;

impl State<Behavior, Controller> for WaitSeconds {
    fn id(&self) -> Behavior {
        Behavior::WaitSeconds
    }

    fn on_enter(&self, machine: &mut Machine) {
        machine.owner_mut().count = 0;
        println!("enter state WaitSeconds");
    }

    fn on_tick(&self, machine: &mut Machine) {
        machine.owner_mut().count += 1;
        println!("WaitSeconds on tick, count {}", machine.owner().count);

        if machine.owner().count > 10 {
            let _ = machine.try_set(Behavior::RandomChange);
        }
    }

    fn on_exit(&self, _machine: &mut Machine) {
        println!("exit state WaitSeconds");
    }
}

/// Rolls a die every tick and returns to waiting on a high roll.
struct RandomChange;

impl State<Behavior, Controller> for RandomChange {
    fn id(&self) -> Behavior {
        Behavior::RandomChange
    }

    fn on_enter(&self, _machine: &mut Machine) {
        println!("enter state RandomChange");
    }

    fn on_tick(&self, machine: &mut Machine) {
        let roll = machine.owner_mut().random.gen_range(0..10);
        println!("RandomChange on tick, random value {}", roll);

        if roll > 5 {
            let _ = machine.try_set(Behavior::WaitSeconds);
        }
    }

    fn on_exit(&self, _machine: &mut Machine) {
        println!("exit state RandomChange");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    println!("=== Controller Demo ===\n");

    let mut registry = StateRegistry::new();
    if let Err(e) = registry.register(WaitSeconds) {
        eprintln!("registration failed: {}", e);
        return;
    }
    if let Err(e) = registry.register(RandomChange) {
        eprintln!("registration failed: {}", e);
        return;
    }

    let controller = Controller {
        count: 0,
        random: StdRng::seed_from_u64(7),
    };
    let mut machine = DefaultStateMachine::from_registry(controller, registry, Behavior::WaitSeconds);

    for _ in 0..30 {
        machine.tick();
    }

    println!("\nTransitions:");
    for record in machine.history().iter() {
        let from = record.from.as_ref().map_or("<none>", |id| id.name());
        println!("  #{} {} -> {} ({:?})", record.sequence, from, record.to.name(), record.kind);
    }

    let controller = machine.shutdown();
    println!("\nFinal count: {}", controller.count);
}
