//! Typed property tokens.
//!
//! A `Property` pairs a property name with plain accessor functions, so the
//! machine learns which property a selector reads without inspecting code.

use super::Subject;
use crate::error::MachineError;
use std::fmt;

/// Typed accessor token for one property of a subject.
///
/// Accessors are function pointers, so tokens are `Copy` and can be built
/// from non-capturing closures. The [`property!`](crate::property) macro
/// builds read/write tokens for plain struct fields.
///
/// # Example
///
/// ```rust
/// use statewatch::subject::{Property, Subject};
///
/// struct Form {
///     login: String,
/// }
///
/// impl Subject for Form {
///     const PROPERTIES: &'static [&'static str] = &["login"];
/// }
///
/// let login = Property::read_write(
///     "login",
///     |f: &Form| f.login.clone(),
///     |f: &mut Form, v: String| f.login = v,
/// );
///
/// assert_eq!(login.key(), Ok("login"));
/// ```
pub struct Property<S, T> {
    name: &'static str,
    get: fn(&S) -> T,
    set: Option<fn(&mut S, T)>,
}

impl<S, T> Property<S, T> {
    /// Create a read-only token.
    pub fn new(name: &'static str, get: fn(&S) -> T) -> Self {
        Self {
            name,
            get,
            set: None,
        }
    }

    /// Create a token that can also write the property.
    pub fn read_write(name: &'static str, get: fn(&S) -> T, set: fn(&mut S, T)) -> Self {
        Self {
            name,
            get,
            set: Some(set),
        }
    }

    /// A selector that computes a value instead of naming a property.
    ///
    /// Computed selectors cannot be subscribed to; registering one fails
    /// with [`MachineError::InvalidSelector`].
    pub fn computed(get: fn(&S) -> T) -> Self {
        Self::new("", get)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }

    /// Read the property from a subject value.
    pub fn get(&self, subject: &S) -> T {
        (self.get)(subject)
    }

    pub(crate) fn getter(&self) -> fn(&S) -> T {
        self.get
    }

    pub(crate) fn setter(&self) -> Option<fn(&mut S, T)> {
        self.set
    }
}

impl<S: Subject, T> Property<S, T> {
    /// Resolve the subscription key for this selector.
    ///
    /// Fails unless the token names a property declared in
    /// [`Subject::PROPERTIES`].
    pub fn key(&self) -> Result<&'static str, MachineError> {
        if self.name.is_empty() {
            return Err(MachineError::InvalidSelector {
                name: String::new(),
                reason: "selector does not name a property",
            });
        }
        if !S::exposes(self.name) {
            return Err(MachineError::InvalidSelector {
                name: self.name.to_string(),
                reason: "not declared by the subject",
            });
        }
        Ok(self.name)
    }

    /// Resolve the key and require a setter.
    pub(crate) fn writable_key(&self) -> Result<&'static str, MachineError> {
        let name = self.key()?;
        if self.set.is_none() {
            return Err(MachineError::InvalidSelector {
                name: name.to_string(),
                reason: "property is read-only",
            });
        }
        Ok(name)
    }
}

impl<S, T> Clone for Property<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for Property<S, T> {}

impl<S, T> fmt::Debug for Property<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("writable", &self.set.is_some())
            .finish()
    }
}
