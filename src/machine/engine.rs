//! The transition engine.

use crate::config::MachineConfig;
use crate::core::{Clause, Combinator, Condition, State, StateHistory, StateTransition};
use crate::error::MachineError;
use crate::machine::dispatch::{resolve, Pass};
use crate::machine::registry::{StateBuilder, StateNode, StateRegistry};
use crate::machine::subscriptions::SubscriptionTable;
use crate::subject::{ListenerId, Observable, Property, Subject, SubjectHandle};
use crate::validation::{validate_configuration, violations, ConfigurationContext};
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, error, trace, warn};

/// State machine driven by property changes on an observable subject.
///
/// Configure states and conditions, then call [`initialize`](Self::initialize).
/// From then on every change notification from the subject is resolved into
/// at most one move, whose target state's entry actions run before the
/// write that caused it returns.
///
/// The machine holds only a weak handle to the subject. Dropping the machine
/// unsubscribes it.
///
/// Entry actions that write observed properties re-enter the machine. Two
/// states whose entry actions keep re-satisfying each other's conditions
/// recurse without bound; avoiding such cycles is up to the configuration.
///
/// # Example
///
/// ```rust
/// use statewatch::core::{Clause, Combinator};
/// use statewatch::machine::StateMachine;
/// use statewatch::subject::{Observable, Subject};
/// use statewatch::{property, state_enum};
///
/// state_enum! {
///     enum FormState {
///         Empty,
///         Filled,
///     }
/// }
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
/// # fn main() -> Result<(), statewatch::MachineError> {
/// let form = Observable::new(LoginForm::default());
/// let login = property!(LoginForm, login: String);
/// let password = property!(LoginForm, password: String);
/// let submit_enabled = property!(LoginForm, submit_enabled: bool);
///
/// let machine = StateMachine::new(&form);
/// machine.configure_state(FormState::Empty)?.set(&submit_enabled, false)?.build();
/// machine.configure_state(FormState::Filled)?.set(&submit_enabled, true)?.build();
///
/// machine.combine(
///     Combinator::Or,
///     FormState::Empty,
///     vec![Clause::new(&login, String::is_empty)?, Clause::new(&password, String::is_empty)?],
/// )?;
/// machine.combine(
///     Combinator::And,
///     FormState::Filled,
///     vec![
///         Clause::new(&login, |v: &String| !v.is_empty())?,
///         Clause::new(&password, |v: &String| !v.is_empty())?,
///     ],
/// )?;
/// machine.initialize(FormState::Empty)?;
///
/// form.set(&login, "admin".to_string())?;
/// form.set(&password, "hunter2".to_string())?;
///
/// assert_eq!(machine.current_state(), Some(FormState::Filled));
/// assert!(form.read(|f| f.submit_enabled));
/// # Ok(())
/// # }
/// ```
pub struct StateMachine<S: Subject, Id: State> {
    core: Rc<MachineCore<S, Id>>,
}

/// Shared state reached both by the caller and by the subject's listener.
///
/// No `RefCell` borrow is held while actions run, so actions may re-enter.
struct MachineCore<S: Subject, Id: State> {
    subject: SubjectHandle<S>,
    config: MachineConfig,
    registry: RefCell<StateRegistry<S, Id>>,
    subscriptions: RefCell<SubscriptionTable<S, Id>>,
    current: RefCell<Option<Id>>,
    history: RefCell<StateHistory<Id>>,
    listener: Cell<Option<ListenerId>>,
    initialized: Cell<bool>,
    disposed: Cell<bool>,
}

impl<S: Subject, Id: State> StateMachine<S, Id> {
    /// Create a machine observing `subject` with default options.
    pub fn new(subject: &Rc<Observable<S>>) -> Self {
        Self::with_config(subject, MachineConfig::default())
    }

    /// Create a machine observing `subject`.
    pub fn with_config(subject: &Rc<Observable<S>>, config: MachineConfig) -> Self {
        let history = match config.history_capacity {
            Some(capacity) => StateHistory::bounded(capacity),
            None => StateHistory::new(),
        };

        Self {
            core: Rc::new(MachineCore {
                subject: subject.handle(),
                config,
                registry: RefCell::new(StateRegistry::new()),
                subscriptions: RefCell::new(SubscriptionTable::new()),
                current: RefCell::new(None),
                history: RefCell::new(history),
                listener: Cell::new(None),
                initialized: Cell::new(false),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Register a state and return its builder.
    ///
    /// Each id can be configured once, and only before `initialize`.
    pub fn configure_state(&self, id: Id) -> Result<StateBuilder<S, Id>, MachineError> {
        self.core.ensure_configurable()?;
        let node = self.core.registry.borrow_mut().insert(id)?;
        Ok(StateBuilder::new(node))
    }

    /// Move to `target` whenever `property` changes and `predicate` holds for
    /// its new value.
    pub fn on<T, P>(&self, property: &Property<S, T>, predicate: P, target: Id) -> Result<(), MachineError>
    where
        T: 'static,
        P: Fn(&T) -> bool + 'static,
    {
        self.core.ensure_configurable()?;
        let clause = Clause::new(property, predicate)?;
        self.register(Condition::single(clause, target));
        Ok(())
    }

    /// Move to `target` when the clauses, folded with `mode`, hold.
    ///
    /// The condition is re-evaluated over the current values of every clause's
    /// property whenever any one of them changes.
    pub fn combine(
        &self,
        mode: Combinator,
        target: Id,
        clauses: Vec<Clause<S>>,
    ) -> Result<(), MachineError> {
        self.core.ensure_configurable()?;
        if clauses.is_empty() {
            return Err(MachineError::EmptyCombination(target.name().to_string()));
        }
        self.register(Condition::combined(mode, clauses, target));
        Ok(())
    }

    /// [`combine`](Self::combine) with the mode given as text (`"and"`/`"or"`).
    pub fn combine_named(
        &self,
        mode: &str,
        target: Id,
        clauses: Vec<Clause<S>>,
    ) -> Result<(), MachineError> {
        let mode: Combinator = mode.parse()?;
        self.combine(mode, target, clauses)
    }

    /// Shorthand for `combine(Combinator::And, ..)`.
    pub fn all(&self, target: Id, clauses: Vec<Clause<S>>) -> Result<(), MachineError> {
        self.combine(Combinator::And, target, clauses)
    }

    /// Shorthand for `combine(Combinator::Or, ..)`.
    pub fn any(&self, target: Id, clauses: Vec<Clause<S>>) -> Result<(), MachineError> {
        self.combine(Combinator::Or, target, clauses)
    }

    /// Enter `start` and begin reacting to notifications.
    pub fn initialize(&self, start: Id) -> Result<(), MachineError> {
        self.core.ensure_configurable()?;
        let node = self.core.node(&start)?;

        if self.core.config.validate_on_initialize {
            self.validate()?;
        }

        self.core.initialized.set(true);
        let subject = self.core.subject.upgrade();
        self.core.enter(node, None, None, subject.as_deref());
        Ok(())
    }

    /// Move to `target` now.
    ///
    /// Fails with [`MachineError::UnregisteredState`], leaving the current
    /// state untouched, if `target` was never configured.
    pub fn move_to(&self, target: Id) -> Result<(), MachineError> {
        self.core.transition(&target, None)
    }

    /// The active state, `None` before `initialize`.
    pub fn current_state(&self) -> Option<Id> {
        self.core.current.borrow().clone()
    }

    /// Snapshot of the recorded moves.
    pub fn history(&self) -> StateHistory<Id> {
        self.core.history.borrow().clone()
    }

    /// Check that every condition target and hint names a registered state.
    pub fn validate(&self) -> Result<(), MachineError> {
        let found = violations(validate_configuration(&self.core.configuration()));
        if found.is_empty() {
            Ok(())
        } else {
            Err(MachineError::InvalidConfiguration(found))
        }
    }

    /// Release everything and stop observing the subject.
    pub fn dispose(&self) {
        self.core.dispose();
    }

    /// Number of configured states.
    pub fn state_count(&self) -> usize {
        self.core.registry.borrow().len()
    }

    /// Observed properties in first-registration order.
    pub fn subscribed_properties(&self) -> Vec<&'static str> {
        self.core.subscriptions.borrow().properties().to_vec()
    }

    /// Number of conditions registered under `property`.
    pub fn conditions_for(&self, property: &str) -> usize {
        self.core.subscriptions.borrow().conditions_for(property).len()
    }

    /// Whether the machine currently listens to the subject.
    pub fn is_subscribed(&self) -> bool {
        self.core.listener.get().is_some()
    }

    /// Whether `initialize` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.core.initialized.get()
    }

    /// Whether the machine has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.core.disposed.get()
    }

    /// Weak handle to the observed subject.
    pub fn subject(&self) -> SubjectHandle<S> {
        self.core.subject.clone()
    }

    fn register(&self, condition: Condition<S, Id>) {
        self.subscribe_once();
        let condition = self.core.subscriptions.borrow_mut().register(condition);
        debug!(
            properties = ?condition.properties(),
            target = ?condition.target(),
            "condition registered"
        );
    }

    /// Subscribe to the subject unless already subscribed.
    fn subscribe_once(&self) {
        if self.core.listener.get().is_some() {
            return;
        }
        let Some(subject) = self.core.subject.upgrade() else {
            debug!("subject released; not subscribing");
            return;
        };

        let core = Rc::downgrade(&self.core);
        let id = subject.subscribe(Rc::new(move |property: &str| {
            if let Some(core) = core.upgrade() {
                core.dispatch(property);
            }
        }));
        self.core.listener.set(Some(id));
    }
}

impl<S: Subject, Id: State> MachineCore<S, Id> {
    fn ensure_configurable(&self) -> Result<(), MachineError> {
        if self.disposed.get() {
            return Err(MachineError::Disposed);
        }
        if self.initialized.get() {
            return Err(MachineError::AlreadyInitialized);
        }
        Ok(())
    }

    fn node(&self, id: &Id) -> Result<Rc<StateNode<S, Id>>, MachineError> {
        self.registry
            .borrow()
            .get(id)
            .ok_or_else(|| MachineError::UnregisteredState(id.name().to_string()))
    }

    fn configuration(&self) -> ConfigurationContext<Id> {
        let registry = self.registry.borrow();
        ConfigurationContext {
            states: registry.ids().to_vec(),
            condition_targets: self.subscriptions.borrow().targets(),
            preferred: registry
                .nodes()
                .iter()
                .filter_map(|node| node.preferred_next().map(|next| (node.id().clone(), next)))
                .collect(),
        }
    }

    /// Handle one change notification.
    fn dispatch(&self, property: &str) {
        if self.disposed.get() || !self.initialized.get() {
            trace!(property, "notification ignored; machine not running");
            return;
        }

        let candidates = self.subscriptions.borrow().conditions_for(property).to_vec();
        if candidates.is_empty() {
            return;
        }
        let Some(current) = self.current.borrow().clone() else {
            return;
        };
        let Some(subject) = self.subject.upgrade() else {
            debug!(property, "subject released; notification ignored");
            return;
        };

        let preferred = self
            .registry
            .borrow()
            .get(&current)
            .and_then(|node| node.preferred_next());

        let decision = resolve(&current, preferred.as_ref(), &candidates, |condition| {
            subject.read(|value| condition.check(value))
        });
        drop(subject);

        let Some(decision) = decision else {
            trace!(property, current = ?current, "no condition satisfied");
            return;
        };

        if let Some(shadowed) = &decision.shadowed {
            warn!(
                property,
                satisfied = ?shadowed,
                target = ?decision.target,
                "later-registered condition took the transition target"
            );
        }
        trace!(
            property,
            preferred = decision.pass == Pass::Preferred,
            target = ?decision.target,
            "condition satisfied"
        );

        if let Err(err) = self.transition(&decision.target, Some(property)) {
            error!(%err, property, "notification-driven move failed");
        }
    }

    fn transition(&self, target: &Id, trigger: Option<&str>) -> Result<(), MachineError> {
        if self.disposed.get() {
            return Err(MachineError::Disposed);
        }
        let node = self.node(target)?;
        let previous = self.current.borrow().clone();
        let subject = self.subject.upgrade();

        if let (Some(previous), Some(subject)) = (&previous, &subject) {
            let leaving = self.registry.borrow().get(previous);
            if let Some(leaving) = leaving {
                leaving.leave(subject);
            }
        }

        self.enter(node, previous, trigger, subject.as_deref());
        Ok(())
    }

    /// Point at `node`, record the move, then run its entry actions.
    fn enter(
        &self,
        node: Rc<StateNode<S, Id>>,
        from: Option<Id>,
        trigger: Option<&str>,
        subject: Option<&Observable<S>>,
    ) {
        let to = node.id().clone();
        *self.current.borrow_mut() = Some(to.clone());

        if self.config.record_history {
            self.history.borrow_mut().push(StateTransition {
                from: from.clone(),
                to: to.clone(),
                trigger: trigger.map(str::to_string),
                timestamp: Utc::now(),
            });
        }

        debug!(from = ?from, to = ?to, trigger, "state entered");

        match subject {
            Some(subject) => node.enter(subject),
            None => debug!(state = ?to, "subject released; entry actions skipped"),
        }
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }

        if let Some(id) = self.listener.take() {
            if let Some(subject) = self.subject.upgrade() {
                subject.unsubscribe(id);
            }
        }

        let nodes = self.registry.borrow_mut().clear();
        for node in nodes {
            node.clear();
        }
        self.subscriptions.borrow_mut().clear();
        self.current.borrow_mut().take();

        debug!("state machine disposed");
    }
}

impl<S: Subject, Id: State> Drop for StateMachine<S, Id> {
    fn drop(&mut self) {
        self.core.dispose();
    }
}

impl<S: Subject, Id: State> fmt::Debug for StateMachine<S, Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.core.current.borrow())
            .field("states", &self.core.registry.borrow().len())
            .field("properties", &self.core.subscriptions.borrow().len())
            .field("initialized", &self.core.initialized.get())
            .field("disposed", &self.core.disposed.get())
            .finish()
    }
}
