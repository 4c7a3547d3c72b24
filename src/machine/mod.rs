//! The state machine engine and its default-state variant.
//!
//! # Key Concepts
//!
//! - **Registry**: identifier → state instance map owned by each machine
//! - **Engine**: guard evaluation and the exit/swap/enter protocol
//! - **Default wrapper**: remembers a fallback state for recovery
//!
//! All operations are synchronous. A machine is driven by one caller at a
//! time; states request transitions re-entrantly through the `&mut`
//! machine they receive.

mod config;
mod default;
mod engine;
mod error;
mod registry;

pub use config::{MachineConfig, DEFAULT_HISTORY_CAPACITY};
pub use default::DefaultStateMachine;
pub use engine::StateMachine;
pub use error::{ConfigError, GuardSide, RegistrationError, RegistryError, TransitionError};
pub use registry::StateRegistry;
