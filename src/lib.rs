//! Statewatch: a declarative, property-change-driven state machine
//!
//! A *subject* exposes observable properties. The machine watches some of
//! them, re-evaluates boolean conditions whenever one changes, and moves
//! between named states, running entry actions on the state it lands in.
//! Deciding *which* move to make is a pure function over the candidate
//! conditions; the engine around it owns the subject handle and the effects.
//!
//! # Core Concepts
//!
//! - **Subject**: a struct declaring its observable properties, held in an
//!   [`Observable`](subject::Observable) cell that notifies on every write
//! - **Property**: a typed selector token, built with [`property!`]
//! - **Condition**: a predicate over one property, or several combined with
//!   AND/OR, paired with a target state
//! - **Entry action**: a write or procedure run when a state becomes active
//! - **Preferred next**: a per-state hint deciding which condition wins
//!
//! # Example
//!
//! ```rust
//! use statewatch::core::Clause;
//! use statewatch::machine::StateMachine;
//! use statewatch::subject::{Observable, Subject};
//! use statewatch::{property, state_enum};
//!
//! state_enum! {
//!     enum FormState {
//!         Empty,
//!         Middle,
//!         Filled,
//!     }
//! }
//!
//! #[derive(Default)]
//! struct LoginForm {
//!     login: String,
//!     password: String,
//!     submit_enabled: bool,
//! }
//!
//! impl Subject for LoginForm {
//!     const PROPERTIES: &'static [&'static str] = &["login", "password", "submit_enabled"];
//! }
//!
//! # fn main() -> Result<(), statewatch::MachineError> {
//! let form = Observable::new(LoginForm::default());
//! let login = property!(LoginForm, login: String);
//! let password = property!(LoginForm, password: String);
//! let submit_enabled = property!(LoginForm, submit_enabled: bool);
//!
//! let machine = StateMachine::new(&form);
//! machine
//!     .configure_state(FormState::Empty)?
//!     .set(&submit_enabled, false)?
//!     .preferred_next(FormState::Middle)
//!     .build();
//! machine
//!     .configure_state(FormState::Middle)?
//!     .set(&submit_enabled, false)?
//!     .preferred_next(FormState::Filled)
//!     .build();
//! machine
//!     .configure_state(FormState::Filled)?
//!     .set(&submit_enabled, true)?
//!     .build();
//!
//! machine.all(
//!     FormState::Empty,
//!     vec![Clause::new(&login, String::is_empty)?, Clause::new(&password, String::is_empty)?],
//! )?;
//! machine.any(
//!     FormState::Middle,
//!     vec![Clause::new(&login, String::is_empty)?, Clause::new(&password, String::is_empty)?],
//! )?;
//! machine.all(
//!     FormState::Filled,
//!     vec![
//!         Clause::new(&login, |v: &String| !v.is_empty())?,
//!         Clause::new(&password, |v: &String| !v.is_empty())?,
//!     ],
//! )?;
//!
//! machine.initialize(FormState::Empty)?;
//!
//! form.set(&login, "admin".to_string())?;
//! assert_eq!(machine.current_state(), Some(FormState::Middle));
//!
//! form.set(&password, "hunter2".to_string())?;
//! assert_eq!(machine.current_state(), Some(FormState::Filled));
//! assert!(form.read(|f| f.submit_enabled));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod machine;
pub mod subject;
pub mod validation;

mod macros;

// Re-export commonly used types
pub use config::MachineConfig;
pub use crate::core::{Clause, Combinator, State, StateHistory};
pub use error::MachineError;
pub use machine::StateMachine;
pub use subject::{Observable, Property, Subject, SubjectHandle};
