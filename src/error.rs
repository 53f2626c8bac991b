//! Errors raised by the state machine and its configuration API.

use crate::validation::ConfigViolation;
use thiserror::Error;

/// Errors that can occur when configuring or driving a state machine.
///
/// Every variant is a caller mistake and fails fast; none is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    #[error("Invalid selector '{name}': {reason}")]
    InvalidSelector { name: String, reason: &'static str },

    #[error("State '{0}' is not registered. Call .configure_state() first")]
    UnregisteredState(String),

    #[error("Unrecognized combinator '{0}', expected 'and' or 'or'")]
    UnrecognizedCombinator(String),

    #[error("State '{0}' is already configured")]
    DuplicateState(String),

    #[error("Combination targeting '{0}' has no clauses")]
    EmptyCombination(String),

    #[error("State machine is already initialized")]
    AlreadyInitialized,

    #[error("State machine has been disposed")]
    Disposed,

    #[error("Invalid configuration ({} violation(s))", .0.len())]
    InvalidConfiguration(Vec<ConfigViolation>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = MachineError::UnregisteredState("Filled".to_string());
        assert_eq!(
            err.to_string(),
            "State 'Filled' is not registered. Call .configure_state() first"
        );

        let err = MachineError::InvalidSelector {
            name: "total".to_string(),
            reason: "not declared by the subject",
        };
        assert_eq!(
            err.to_string(),
            "Invalid selector 'total': not declared by the subject"
        );
    }

    #[test]
    fn configuration_error_counts_violations() {
        let err = MachineError::InvalidConfiguration(vec![
            ConfigViolation::SelfPreferredNext {
                state: "Empty".to_string(),
            },
            ConfigViolation::UnregisteredPreferredNext {
                state: "Empty".to_string(),
                next: "Gone".to_string(),
            },
        ]);
        assert_eq!(err.to_string(), "Invalid configuration (2 violation(s))");
    }
}
