//! Mapping from observed property to the conditions that depend on it.

use crate::core::{Condition, State};
use crate::subject::Subject;
use std::collections::HashMap;
use std::rc::Rc;

/// Subscription table.
///
/// Each property keeps its conditions in registration order; the dispatch
/// tie-break depends on that order. Entries are never removed one at a time.
pub struct SubscriptionTable<S, Id> {
    entries: HashMap<&'static str, Vec<Rc<Condition<S, Id>>>>,
    order: Vec<&'static str>,
}

impl<S: Subject, Id: State> SubscriptionTable<S, Id> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a condition under every property it depends on.
    pub fn register(&mut self, condition: Condition<S, Id>) -> Rc<Condition<S, Id>> {
        let condition = Rc::new(condition);
        for &property in condition.properties() {
            let entry = self.entries.entry(property).or_insert_with(|| {
                self.order.push(property);
                Vec::new()
            });
            entry.push(Rc::clone(&condition));
        }
        condition
    }

    /// Conditions registered for `property`, in registration order.
    pub fn conditions_for(&self, property: &str) -> &[Rc<Condition<S, Id>>] {
        self.entries
            .get(property)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Observed properties in first-registration order.
    pub fn properties(&self) -> &[&'static str] {
        &self.order
    }

    /// `(property, target)` for every entry.
    pub fn targets(&self) -> Vec<(&'static str, Id)> {
        self.order
            .iter()
            .flat_map(|property| {
                self.conditions_for(property)
                    .iter()
                    .map(move |condition| (*property, condition.target().clone()))
            })
            .collect()
    }

    /// Number of observed properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl<S: Subject, Id: State> Default for SubscriptionTable<S, Id> {
    fn default() -> Self {
        Self::new()
    }
}
