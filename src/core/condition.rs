//! Conditions: predicates over the subject that name a target state.
//!
//! A condition is evaluated against the *current* subject value each time
//! one of the properties it depends on changes. Compound conditions fold
//! several per-property clauses with a [`Combinator`].

use super::state::State;
use crate::error::MachineError;
use crate::subject::{Property, Subject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical operator folding the clauses of a compound condition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    /// Fold results left to right.
    ///
    /// Every result is consumed; nothing short-circuits. An empty input is
    /// `false`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statewatch::core::Combinator;
    ///
    /// assert!(Combinator::Or.fold([false, true, false]));
    /// assert!(!Combinator::And.fold([true, false]));
    /// assert!(!Combinator::And.fold([]));
    /// ```
    pub fn fold(self, results: impl IntoIterator<Item = bool>) -> bool {
        let mut results = results.into_iter();
        let Some(first) = results.next() else {
            return false;
        };
        results.fold(first, |acc, next| match self {
            Self::And => acc & next,
            Self::Or => acc | next,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl FromStr for Combinator {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" | "all" => Ok(Self::And),
            "or" | "any" => Ok(Self::Or),
            _ => Err(MachineError::UnrecognizedCombinator(s.to_string())),
        }
    }
}

impl TryFrom<String> for Combinator {
    type Error = MachineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Combinator> for String {
    fn from(value: Combinator) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One property selector paired with a predicate over its value.
pub struct Clause<S> {
    property: &'static str,
    test: Box<dyn Fn(&S) -> bool>,
}

impl<S: Subject> Clause<S> {
    /// Pair a selector with a predicate.
    ///
    /// Fails with [`MachineError::InvalidSelector`] unless the selector names
    /// a declared property.
    pub fn new<T, P>(property: &Property<S, T>, predicate: P) -> Result<Self, MachineError>
    where
        T: 'static,
        P: Fn(&T) -> bool + 'static,
    {
        let name = property.key()?;
        let get = property.getter();
        Ok(Self {
            property: name,
            test: Box::new(move |subject: &S| predicate(&get(subject))),
        })
    }

    pub fn property(&self) -> &'static str {
        self.property
    }

    /// Read the property from `subject` and apply the predicate.
    pub fn test(&self, subject: &S) -> bool {
        (self.test)(subject)
    }
}

impl<S> fmt::Debug for Clause<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clause")
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

/// Predicate over the subject that, when true, proposes `target`.
///
/// Conditions are identified by the properties they depend on and their
/// target; the machine registers each one under every dependency.
pub struct Condition<S, Id> {
    properties: Vec<&'static str>,
    target: Id,
    predicate: Box<dyn Fn(&S) -> bool>,
}

impl<S: Subject, Id: State> Condition<S, Id> {
    /// Condition over a single property.
    pub fn single(clause: Clause<S>, target: Id) -> Self {
        Self {
            properties: vec![clause.property],
            target,
            predicate: Box::new(move |subject: &S| clause.test(subject)),
        }
    }

    /// Compound condition over several clauses.
    ///
    /// Each evaluation re-reads every clause's property from the subject
    /// passed in, so the result always reflects the current snapshot.
    pub fn combined(mode: Combinator, clauses: Vec<Clause<S>>, target: Id) -> Self {
        let mut properties: Vec<&'static str> = Vec::with_capacity(clauses.len());
        for clause in &clauses {
            if !properties.contains(&clause.property) {
                properties.push(clause.property);
            }
        }

        Self {
            properties,
            target,
            predicate: Box::new(move |subject: &S| {
                mode.fold(clauses.iter().map(|clause| clause.test(subject)))
            }),
        }
    }

    /// Distinct properties this condition depends on, in clause order.
    pub fn properties(&self) -> &[&'static str] {
        &self.properties
    }

    pub fn target(&self) -> &Id {
        &self.target
    }

    pub fn depends_on(&self, property: &str) -> bool {
        self.properties.contains(&property)
    }

    /// Evaluate against a subject value.
    pub fn check(&self, subject: &S) -> bool {
        (self.predicate)(subject)
    }
}

impl<S, Id: fmt::Debug> fmt::Debug for Condition<S, Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("properties", &self.properties)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
