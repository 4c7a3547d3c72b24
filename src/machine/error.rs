//! Errors reported by the state machine and its registry.

use std::fmt;
use thiserror::Error;

/// Which guard refused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardSide {
    /// The current state's `can_exit` returned false
    Exit,
    /// The target state's `can_enter` returned false
    Enter,
}

impl fmt::Display for GuardSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exit => f.write_str("exit"),
            Self::Enter => f.write_str("enter"),
        }
    }
}

/// Reasons a guarded transition request was not performed.
///
/// None of these are fatal: the machine is left in a consistent state and
/// the caller decides whether to retry or recover.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    #[error("No state registered as '{state}'")]
    UnknownState { state: String },

    #[error("Transition from '{from}' to '{to}' refused by {side} guard")]
    Refused {
        from: String,
        to: String,
        side: GuardSide,
    },

    #[error("Transition to '{requested}' superseded by nested transition to '{actual}'")]
    Superseded { requested: String, actual: String },

    #[error("Transition depth limit ({limit}) exceeded")]
    DepthExceeded { limit: usize },

    #[error("No default state configured")]
    NoDefault,
}

impl TransitionError {
    /// True when the request was turned down by a guard.
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::Refused { .. })
    }
}

/// Errors raised when registering states.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    #[error("State '{state}' is already registered")]
    AlreadyRegistered { state: String },

    #[error("State '{state}' appears more than once in the batch")]
    DuplicateInBatch { state: String },
}

/// A batch registration rejected as a whole, with every conflict found.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Registration rejected with {} conflict(s)", .conflicts.len())]
pub struct RegistrationError {
    pub conflicts: Vec<RegistryError>,
}

/// Errors loading a machine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
