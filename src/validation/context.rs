//! Snapshot of a machine's configuration handed to validation.

use crate::core::State;

/// What the machine has been configured with, flattened for checking.
#[derive(Clone, Debug)]
pub struct ConfigurationContext<S: State> {
    /// Every registered state.
    pub states: Vec<S>,
    /// `(property, target)` for every subscription entry.
    pub condition_targets: Vec<(&'static str, S)>,
    /// `(state, preferred next)` for every state with a hint.
    pub preferred: Vec<(S, S)>,
}

impl<S: State> ConfigurationContext<S> {
    pub fn is_registered(&self, state: &S) -> bool {
        self.states.contains(state)
    }
}

impl<S: State> Default for ConfigurationContext<S> {
    fn default() -> Self {
        Self {
            states: Vec::new(),
            condition_targets: Vec::new(),
            preferred: Vec::new(),
        }
    }
}
