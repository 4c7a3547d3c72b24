//! tickfsm: a keyed finite-state-machine engine for tick-driven simulations
//!
//! A machine is bound to one owner (the entity whose behavior it drives),
//! holds a registry of states keyed by identifier, and forwards each
//! simulation tick to its current state. States request transitions by
//! identifier; the engine arbitrates them through enter/exit guards and
//! runs the exit/enter callbacks in order.
//!
//! # Core Concepts
//!
//! - **StateId**: the key naming a state, usually a `state_ids!` enum
//! - **State**: guards (`can_enter`/`can_exit`) and lifecycle hooks
//!   (`on_enter`/`on_tick`/`on_exit`)
//! - **StateMachine**: registry, owner and the transition protocol
//! - **DefaultStateMachine**: a machine that can always fall back to a
//!   designated default state
//!
//! # Example
//!
//! ```rust
//! use tickfsm::core::State;
//! use tickfsm::machine::{DefaultStateMachine, StateMachine, StateRegistry};
//! use tickfsm::state_ids;
//!
//! state_ids! {
//!     pub enum Behavior {
//!         Wait,
//!         Wander,
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Critter {
//!     count: u32,
//! }
//!
//! struct Wait;
//! struct Wander;
//!
//! impl State<Behavior, Critter> for Wait {
//!     fn id(&self) -> Behavior {
//!         Behavior::Wait
//!     }
//!
//!     fn on_enter(&self, machine: &mut StateMachine<Behavior, Critter>) {
//!         machine.owner_mut().count = 0;
//!     }
//!
//!     fn on_tick(&self, machine: &mut StateMachine<Behavior, Critter>) {
//!         machine.owner_mut().count += 1;
//!         if machine.owner().count > 2 {
//!             let _ = machine.try_set(Behavior::Wander);
//!         }
//!     }
//! }
//!
//! impl State<Behavior, Critter> for Wander {
//!     fn id(&self) -> Behavior {
//!         Behavior::Wander
//!     }
//! }
//!
//! let mut registry = StateRegistry::new();
//! registry.register(Wait).unwrap();
//! registry.register(Wander).unwrap();
//!
//! let mut machine = DefaultStateMachine::from_registry(Critter::default(), registry, Behavior::Wait);
//! for _ in 0..3 {
//!     machine.tick();
//! }
//!
//! assert_eq!(machine.current_id(), Some(&Behavior::Wander));
//! assert_eq!(machine.previous_id(), Some(&Behavior::Wait));
//! ```

// Lets `state_ids!` name serde through this crate inside its own tests.
extern crate self as tickfsm;

pub mod builder;
pub mod core;
pub mod machine;

#[doc(hidden)]
pub use serde as __serde;

// Re-export commonly used types
pub use crate::core::{Guard, State, StateId, StateRef};
pub use crate::machine::{DefaultStateMachine, StateMachine, StateRegistry, TransitionError};
