//! The observed subject.
//!
//! A subject is a plain struct that declares which of its properties are
//! observable. Live values sit in an [`Observable`] cell, which emits a
//! "property changed" notification after every write. The machine holds only
//! a [`SubjectHandle`], so it never keeps the subject alive.

mod observable;
mod property;

pub use observable::{Listener, ListenerId, Observable, SubjectHandle};
pub use property::Property;

/// Contract for types whose property changes drive a state machine.
///
/// # Example
///
/// ```rust
/// use statewatch::subject::Subject;
///
/// #[derive(Default)]
/// struct LoginForm {
///     login: String,
///     password: String,
///     submit_enabled: bool,
/// }
///
/// impl Subject for LoginForm {
///     const PROPERTIES: &'static [&'static str] = &["login", "password", "submit_enabled"];
/// }
///
/// assert!(LoginForm::exposes("login"));
/// assert!(!LoginForm::exposes("email"));
/// ```
pub trait Subject: 'static {
    /// Names of every observable property.
    const PROPERTIES: &'static [&'static str];

    /// Check whether `name` is an observable property.
    fn exposes(name: &str) -> bool {
        Self::PROPERTIES.contains(&name)
    }
}
