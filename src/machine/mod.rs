//! The state machine: registry, subscriptions, dispatch and the engine
//! tying them to a subject.

pub mod dispatch;
pub mod engine;
pub mod registry;
pub mod subscriptions;

pub use dispatch::{resolve, Decision, Pass};
pub use engine::StateMachine;
pub use registry::{EntryAction, Procedure, StateBuilder, StateNode, StateRegistry};
pub use subscriptions::SubscriptionTable;
