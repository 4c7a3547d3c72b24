//! Identifiers naming the states registered with a machine.
//!
//! An identifier is an opaque key: the engine only compares, hashes and
//! names it. Closed state sets should use an enum (see [`state_ids!`]);
//! open sets can use string keys.
//!
//! [`state_ids!`]: crate::state_ids

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// # Required Traits
///
/// - `Clone`: identifiers are copied into current/previous slots and history
/// - `Eq` + `Hash`: identifiers key the state registry
/// - `Debug`: identifiers must be debuggable for diagnostics
///
/// # Example
///
/// ```rust
/// use tickfsm::core::StateId;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Behavior {
///     Idle,
///     Patrol,
///     Chase,
/// }
///
/// impl StateId for Behavior {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Patrol => "Patrol",
///             Self::Chase => "Chase",
///         }
///     }
/// }
///
/// assert_eq!(Behavior::Chase.name(), "Chase");
/// ```
pub trait StateId: Clone + Eq + Hash + Debug + Send + Sync {
    /// Get the identifier's name for display/logging.
    fn name(&self) -> &str;
}

impl StateId for &'static str {
    fn name(&self) -> &str {
        self
    }
}

impl StateId for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Name of an optional identifier, `"<none>"` when unset.
pub(crate) fn display_name<K: StateId>(id: Option<&K>) -> String {
    id.map_or_else(|| "<none>".to_string(), |k| k.name().to_string())
}
