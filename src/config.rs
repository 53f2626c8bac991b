//! Machine options.

use serde::{Deserialize, Serialize};

/// History records kept when no capacity is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Options controlling a [`StateMachine`](crate::machine::StateMachine).
///
/// Every field has a default, so partial JSON is accepted.
///
/// # Example
///
/// ```rust
/// use statewatch::config::MachineConfig;
///
/// let config: MachineConfig = serde_json::from_str(r#"{ "history_capacity": 32 }"#).unwrap();
///
/// assert!(config.record_history);
/// assert_eq!(config.history_capacity, Some(32));
/// assert!(config.validate_on_initialize);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Record every move in the machine's history.
    pub record_history: bool,

    /// Keep at most this many history records (`None` = unbounded).
    ///
    /// Defaults to [`DEFAULT_HISTORY_CAPACITY`]; a machine lives as long as its
    /// subject, so an unbounded history grows for that whole lifetime.
    pub history_capacity: Option<usize>,

    /// Run configuration validation in `initialize` and refuse to start on
    /// violations.
    pub validate_on_initialize: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            record_history: true,
            history_capacity: Some(DEFAULT_HISTORY_CAPACITY),
            validate_on_initialize: true,
        }
    }
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable history recording.
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Bound the history to the most recent `capacity` records.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    /// Keep every history record.
    pub fn unbounded_history(mut self) -> Self {
        self.history_capacity = None;
        self
    }

    /// Enable or disable validation during `initialize`.
    pub fn validate_on_initialize(mut self, enabled: bool) -> Self {
        self.validate_on_initialize = enabled;
        self
    }
}
