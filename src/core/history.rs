//! State transition history tracking.
//!
//! Provides immutable tracking of the moves a machine has made,
//! following functional programming principles.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single state transition.
///
/// The first record of a machine has no `from` state: it is the move
/// performed by `initialize`.
///
/// # Example
///
/// ```rust
/// use statewatch::core::StateTransition;
/// use statewatch::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum FormState {
///         Empty,
///         Filled,
///     }
/// }
///
/// let transition = StateTransition {
///     from: Some(FormState::Empty),
///     to: FormState::Filled,
///     trigger: Some("password".to_string()),
///     timestamp: Utc::now(),
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left, `None` for the initial move
    pub from: Option<S>,
    /// The state being entered
    pub to: S,
    /// Property whose change caused the move, `None` for direct moves
    pub trigger: Option<String>,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of state transitions.
///
/// The `record` method returns a new history with the transition added;
/// `push` appends in place. A bounded history keeps only the most recent
/// `capacity` records.
///
/// # Example
///
/// ```rust
/// use statewatch::core::{StateHistory, StateTransition};
/// use statewatch::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Phase {
///         One,
///         Two,
///         Three,
///     }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: None,
///         to: Phase::One,
///         trigger: None,
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: Some(Phase::One),
///         to: Phase::Two,
///         trigger: Some("first".to_string()),
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: Some(Phase::Two),
///         to: Phase::Three,
///         trigger: Some("second".to_string()),
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Phase::One, &Phase::Two, &Phase::Three]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    capacity: Option<usize>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            capacity: None,
        }
    }

    /// Create an empty history keeping at most `capacity` records.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            transitions: VecDeque::new(),
            capacity: Some(capacity),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// This is a pure function - it does not mutate the existing history
    /// but returns a new one with the transition added. When bounded, the
    /// oldest records are dropped.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut next = self.clone();
        next.push(transition);
        next
    }

    /// Append a transition in place, dropping the oldest records past the bound.
    pub fn push(&mut self, transition: StateTransition<S>) {
        self.transitions.push_back(transition);
        if let Some(capacity) = self.capacity {
            while self.transitions.len() > capacity {
                self.transitions.pop_front();
            }
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the first record (when it has one), then
    /// the `to` state of each record.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(from) = self.transitions.front().and_then(|t| t.from.as_ref()) {
            path.push(from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions in order.
    pub fn transitions(&self) -> &VecDeque<StateTransition<S>> {
        &self.transitions
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Empty,
            Middle,
            Filled,
        }
    }

    fn step(from: Option<TestState>, to: TestState) -> StateTransition<TestState> {
        StateTransition {
            from,
            to,
            trigger: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::new();
        assert_eq!(history.transitions().len(), 0);
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();

        let new_history = history.record(step(None, TestState::Empty));

        assert_eq!(history.transitions().len(), 0);
        assert_eq!(new_history.transitions().len(), 1);
    }

    #[test]
    fn get_path_starts_at_initial_state() {
        let history = StateHistory::new()
            .record(step(None, TestState::Empty))
            .record(step(Some(TestState::Empty), TestState::Filled))
            .record(step(Some(TestState::Filled), TestState::Middle));

        let path = history.get_path();
        assert_eq!(
            path,
            vec![&TestState::Empty, &TestState::Filled, &TestState::Middle]
        );
    }

    #[test]
    fn bounded_history_drops_oldest() {
        let history = StateHistory::bounded(2)
            .record(step(None, TestState::Empty))
            .record(step(Some(TestState::Empty), TestState::Middle))
            .record(step(Some(TestState::Middle), TestState::Filled));

        assert_eq!(history.transitions().len(), 2);
        assert_eq!(history.capacity(), Some(2));
        // The path of a truncated history opens with the oldest kept `from`.
        assert_eq!(
            history.get_path(),
            vec![&TestState::Empty, &TestState::Middle, &TestState::Filled]
        );
    }

    #[test]
    fn push_appends_in_place_and_respects_bound() {
        let mut history = StateHistory::bounded(3);
        let mut from = None;
        for i in 0..100 {
            let to = if i % 2 == 0 { TestState::Filled } else { TestState::Empty };
            history.push(step(from, to));
            from = Some(to);
        }

        assert_eq!(history.transitions().len(), 3);
        assert_eq!(history.last().map(|t| t.to), Some(TestState::Empty));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let history = StateHistory::bounded(0).record(step(None, TestState::Empty));
        assert!(history.transitions().is_empty());
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history = StateHistory::new().record(step(None, TestState::Empty));

        std::thread::sleep(std::time::Duration::from_millis(10));

        let history = history.record(step(Some(TestState::Empty), TestState::Filled));

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut transition = step(Some(TestState::Empty), TestState::Middle);
        transition.trigger = Some("first".to_string());
        let history = StateHistory::bounded(8).record(transition);

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.transitions().len(), 1);
        assert_eq!(deserialized.capacity(), Some(8));
        assert_eq!(
            deserialized.last().and_then(|t| t.trigger.as_deref()),
            Some("first")
        );
    }
}
