//! Build errors for the machine builder.

use crate::machine::{ConfigError, RegistrationError};
use thiserror::Error;

/// Errors that can occur when building state machines.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Owner not specified. Call .owner(value) before .build()")]
    MissingOwner,

    #[error("Default state not specified. Call .default_state(id) before .build_with_default()")]
    MissingDefault,

    #[error("Initial state '{state}' is not registered")]
    UnknownInitial { state: String },

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
