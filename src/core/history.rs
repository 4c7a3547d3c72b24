//! Transition history tracking.
//!
//! Every transition the engine performs is appended to a bounded log so
//! callers can inspect how an entity moved through its states.

use super::id::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// How a transition was performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Guards were evaluated and passed
    Guarded,
    /// Guards were bypassed
    Forced,
}

/// Record of a single transition.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     sequence: 1,
///     from: None,
///     to: "idle",
///     kind: TransitionKind::Forced,
///     timestamp: Utc::now(),
/// };
/// assert!(record.is_initial());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<K> {
    /// Monotonic transition counter of the owning machine
    pub sequence: u64,
    /// The state being left, if any
    pub from: Option<K>,
    /// The state being entered
    pub to: K,
    /// Whether guards were evaluated
    pub kind: TransitionKind,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl<K> TransitionRecord<K> {
    /// True when the machine had no current state before this transition.
    pub fn is_initial(&self) -> bool {
        self.from.is_none()
    }
}

/// Ordered, bounded history of transitions.
///
/// When full, the oldest record is dropped. A capacity of zero disables
/// recording entirely.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{TransitionHistory, TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::with_capacity(2);
/// for (sequence, (from, to)) in [(None, "a"), (Some("a"), "b"), (Some("b"), "c")]
///     .into_iter()
///     .enumerate()
/// {
///     history.record(TransitionRecord {
///         sequence: sequence as u64,
///         from,
///         to,
///         kind: TransitionKind::Guarded,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.path(), vec![&"a", &"b", &"c"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory<K> {
    capacity: usize,
    records: VecDeque<TransitionRecord<K>>,
}

impl<K: StateId> TransitionHistory<K> {
    /// Create an empty history holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(64)),
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord<K>) {
        if self.capacity == 0 {
            self.records.clear();
            return;
        }
        // A deserialized history may hold more records than its capacity.
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// States traversed, oldest first.
    ///
    /// Starts with the `from` state of the oldest retained record (when it
    /// has one), followed by the `to` state of every record.
    pub fn path(&self) -> Vec<&K> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(from) = self.records.front().and_then(|r| r.from.as_ref()) {
            path.push(from);
        }
        path.extend(self.records.iter().map(|r| &r.to));
        path
    }

    /// Time between the oldest and newest retained records.
    ///
    /// Returns `None` if the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord<K>> {
        self.records.back()
    }

    /// Retained records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord<K>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
