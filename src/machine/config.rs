//! Machine configuration.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default number of transition records a machine keeps.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// Tunables for a [`StateMachine`](super::StateMachine).
///
/// Every field has a default, so partial JSON documents are accepted.
///
/// # Example
///
/// ```rust
/// use tickfsm::machine::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "max_transition_depth": 8 }"#).unwrap();
/// assert_eq!(config.max_transition_depth, Some(8));
/// assert_eq!(config.history_capacity, 32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Transition records kept in history (0 disables history)
    pub history_capacity: usize,

    /// Maximum nesting of transitions requested from inside callbacks.
    ///
    /// `None` leaves chains unbounded; runaway self-transition loops are
    /// then the caller's responsibility. Only guarded requests are limited.
    pub max_transition_depth: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_transition_depth: None,
        }
    }
}

impl MachineConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set history capacity.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the nested transition depth limit.
    pub fn max_transition_depth(mut self, depth: usize) -> Self {
        self.max_transition_depth = Some(depth);
        self
    }

    /// Reject settings the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_transition_depth == Some(0) {
            return Err(ConfigError::Invalid(
                "max_transition_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
