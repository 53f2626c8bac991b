//! Validation of a machine's configuration.
//!
//! Uses Stillwater's `Validation` type to accumulate every problem in one
//! pass instead of stopping at the first one, so a misconfigured machine
//! reports all of its dangling targets together.
//!
//! # Example
//!
//! ```rust
//! use statewatch::state_enum;
//! use statewatch::validation::{validate_configuration, ConfigurationContext};
//!
//! state_enum! {
//!     enum FormState {
//!         Empty,
//!         Filled,
//!     }
//! }
//!
//! let context = ConfigurationContext {
//!     states: vec![FormState::Empty],
//!     condition_targets: vec![("password", FormState::Filled)],
//!     preferred: vec![],
//! };
//!
//! assert!(validate_configuration(&context).is_failure());
//! ```

pub mod context;
pub mod rules;
pub mod violations;

pub use context::ConfigurationContext;
pub use rules::{validate_configuration, violations};
pub use violations::ConfigViolation;
