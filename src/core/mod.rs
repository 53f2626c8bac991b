//! Core state machine types.
//!
//! This module contains the pure building blocks of the machine:
//! - State identity via the `State` trait
//! - Conditions and AND/OR combinators over subject properties
//! - Immutable history tracking
//!
//! Nothing here touches a live subject; evaluation always receives the
//! subject value to inspect.

mod condition;
mod history;
mod state;

pub use condition::{Clause, Combinator, Condition};
pub use history::{StateHistory, StateTransition};
pub use state::State;
