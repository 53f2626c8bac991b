//! State registry and the builder used to configure each state.

use crate::core::State;
use crate::error::MachineError;
use crate::subject::{Observable, Property, Subject};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Procedure run against the live subject.
pub type Procedure<S> = Rc<dyn Fn(&Observable<S>)>;

/// Side effect applied to the subject when its state becomes active.
pub enum EntryAction<S> {
    /// Write a constant to a property (listeners are notified).
    Assign {
        property: &'static str,
        apply: Procedure<S>,
    },
    /// Run an arbitrary procedure.
    Invoke(Procedure<S>),
}

impl<S: Subject> EntryAction<S> {
    /// Action writing `value` to `property`.
    ///
    /// Fails with [`MachineError::InvalidSelector`] unless the property is
    /// declared by the subject and writable.
    pub fn assign<T>(property: &Property<S, T>, value: T) -> Result<Self, MachineError>
    where
        T: Clone + 'static,
    {
        let name = property.writable_key()?;
        let property = *property;
        Ok(Self::Assign {
            property: name,
            apply: Rc::new(move |subject: &Observable<S>| {
                if let Err(err) = subject.set(&property, value.clone()) {
                    tracing::error!(%err, property = name, "entry action could not assign property");
                }
            }),
        })
    }

    /// Action running `procedure`.
    pub fn invoke<F>(procedure: F) -> Self
    where
        F: Fn(&Observable<S>) + 'static,
    {
        Self::Invoke(Rc::new(procedure))
    }

    pub fn apply(&self, subject: &Observable<S>) {
        match self {
            Self::Assign { apply, .. } => apply(subject),
            Self::Invoke(procedure) => procedure(subject),
        }
    }
}

impl<S> Clone for EntryAction<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Assign { property, apply } => Self::Assign {
                property: *property,
                apply: Rc::clone(apply),
            },
            Self::Invoke(procedure) => Self::Invoke(Rc::clone(procedure)),
        }
    }
}

impl<S> fmt::Debug for EntryAction<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign { property, .. } => f.debug_tuple("Assign").field(property).finish(),
            Self::Invoke(_) => f.write_str("Invoke"),
        }
    }
}

/// A configured state: its entry and leave actions and optional hint.
pub struct StateNode<S, Id> {
    id: Id,
    entry_actions: RefCell<Vec<EntryAction<S>>>,
    leave_actions: RefCell<Vec<Procedure<S>>>,
    preferred_next: RefCell<Option<Id>>,
}

impl<S: Subject, Id: State> StateNode<S, Id> {
    fn new(id: Id) -> Self {
        Self {
            id,
            entry_actions: RefCell::new(Vec::new()),
            leave_actions: RefCell::new(Vec::new()),
            preferred_next: RefCell::new(None),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn preferred_next(&self) -> Option<Id> {
        self.preferred_next.borrow().clone()
    }

    pub fn entry_actions(&self) -> Vec<EntryAction<S>> {
        self.entry_actions.borrow().clone()
    }

    /// Run entry actions in declaration order.
    ///
    /// Works on a snapshot, so actions may re-enter the machine.
    pub fn enter(&self, subject: &Observable<S>) {
        let actions = self.entry_actions.borrow().clone();
        for action in &actions {
            action.apply(subject);
        }
    }

    /// Run leave actions in declaration order.
    pub fn leave(&self, subject: &Observable<S>) {
        let actions = self.leave_actions.borrow().clone();
        for action in &actions {
            action(subject);
        }
    }

    /// Drop every action and the hint.
    pub fn clear(&self) {
        self.entry_actions.borrow_mut().clear();
        self.leave_actions.borrow_mut().clear();
        self.preferred_next.borrow_mut().take();
    }
}

impl<S, Id: fmt::Debug> fmt::Debug for StateNode<S, Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("id", &self.id)
            .field("entry_actions", &self.entry_actions.borrow().len())
            .field("leave_actions", &self.leave_actions.borrow().len())
            .field("preferred_next", &self.preferred_next.borrow())
            .finish()
    }
}

/// Mapping from state id to its node, in configuration order.
pub struct StateRegistry<S, Id> {
    states: HashMap<Id, Rc<StateNode<S, Id>>>,
    order: Vec<Id>,
}

impl<S: Subject, Id: State> StateRegistry<S, Id> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a fresh node. Each id can be configured once.
    pub fn insert(&mut self, id: Id) -> Result<Rc<StateNode<S, Id>>, MachineError> {
        if self.states.contains_key(&id) {
            return Err(MachineError::DuplicateState(id.name().to_string()));
        }
        let node = Rc::new(StateNode::new(id.clone()));
        self.states.insert(id.clone(), Rc::clone(&node));
        self.order.push(id);
        Ok(node)
    }

    pub fn get(&self, id: &Id) -> Option<Rc<StateNode<S, Id>>> {
        self.states.get(id).cloned()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.states.contains_key(id)
    }

    /// Ids in configuration order.
    pub fn ids(&self) -> &[Id] {
        &self.order
    }

    /// Nodes in configuration order.
    pub fn nodes(&self) -> Vec<Rc<StateNode<S, Id>>> {
        self.order
            .iter()
            .filter_map(|id| self.states.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Remove every node, returning them for cleanup.
    pub fn clear(&mut self) -> Vec<Rc<StateNode<S, Id>>> {
        let nodes = self.nodes();
        self.states.clear();
        self.order.clear();
        nodes
    }
}

impl<S: Subject, Id: State> Default for StateRegistry<S, Id> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent configuration of one state, returned by
/// [`StateMachine::configure_state`](crate::machine::StateMachine::configure_state).
///
/// The state is already registered when the builder is handed out; every
/// call appends to it directly.
pub struct StateBuilder<S, Id> {
    node: Rc<StateNode<S, Id>>,
}

impl<S: Subject, Id: State> StateBuilder<S, Id> {
    pub(crate) fn new(node: Rc<StateNode<S, Id>>) -> Self {
        Self { node }
    }

    /// Append a pre-built entry action.
    pub fn with_entry_action(self, action: EntryAction<S>) -> Self {
        self.node.entry_actions.borrow_mut().push(action);
        self
    }

    /// Append an action writing `value` to `property` on entry.
    pub fn set<T>(self, property: &Property<S, T>, value: T) -> Result<Self, MachineError>
    where
        T: Clone + 'static,
    {
        let action = EntryAction::assign(property, value)?;
        Ok(self.with_entry_action(action))
    }

    /// Append a procedure run on entry.
    pub fn run<F>(self, procedure: F) -> Self
    where
        F: Fn(&Observable<S>) + 'static,
    {
        self.with_entry_action(EntryAction::invoke(procedure))
    }

    /// Append a procedure run when the state is left.
    pub fn on_leave<F>(self, procedure: F) -> Self
    where
        F: Fn(&Observable<S>) + 'static,
    {
        self.node.leave_actions.borrow_mut().push(Rc::new(procedure));
        self
    }

    /// Declare the state to check first when a property changes.
    pub fn preferred_next(self, id: Id) -> Self {
        *self.node.preferred_next.borrow_mut() = Some(id);
        self
    }

    /// Finish configuring the state.
    pub fn build(self) {}
}
