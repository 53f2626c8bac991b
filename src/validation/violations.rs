//! Configuration violations.

use thiserror::Error;

/// A configuration mistake found by [`validate_configuration`](super::validate_configuration).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("Condition on '{property}' targets unregistered state '{target}'")]
    UnregisteredTarget { property: String, target: String },

    #[error("State '{state}' prefers unregistered state '{next}'")]
    UnregisteredPreferredNext { state: String, next: String },

    #[error("State '{state}' names itself as preferred next state")]
    SelfPreferredNext { state: String },
}
