//! Core contracts of the state machine.
//!
//! This module contains the pieces every machine is built from:
//! - State identifiers via the `StateId` trait
//! - The `State` lifecycle contract
//! - Guard predicates for transition control
//! - Bounded transition history

mod guard;
mod history;
mod id;
mod state;

pub use guard::Guard;
pub use history::{TransitionHistory, TransitionKind, TransitionRecord};
pub use id::StateId;
pub(crate) use id::display_name;
pub use state::{State, StateRef};
