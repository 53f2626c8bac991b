//! Observable cell and the weak handle the machine holds on to it.

use super::{Property, Subject};
use crate::error::MachineError;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked with the name of the property that just changed.
pub type Listener = Rc<dyn Fn(&str)>;

/// Identifies one listener registration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(u64);

/// Single-threaded observable wrapper around a subject value.
///
/// Writes go through [`set`](Self::set) or [`update`](Self::update). The value
/// borrow is released before listeners run, so a listener may read the
/// subject or write further properties (nested notifications are delivered
/// synchronously, before the outer write returns).
///
/// Calling `set`/`update` from inside a [`read`](Self::read) closure panics,
/// as any overlapping `RefCell` borrow would.
///
/// # Example
///
/// ```rust
/// use statewatch::property;
/// use statewatch::subject::{Observable, Subject};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// #[derive(Default)]
/// struct Form {
///     login: String,
/// }
///
/// impl Subject for Form {
///     const PROPERTIES: &'static [&'static str] = &["login"];
/// }
///
/// let form = Observable::new(Form::default());
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = Rc::clone(&seen);
/// form.subscribe(Rc::new(move |name: &str| sink.borrow_mut().push(name.to_string())));
///
/// form.set(&property!(Form, login: String), "admin".to_string()).unwrap();
///
/// assert_eq!(*seen.borrow(), vec!["login".to_string()]);
/// assert_eq!(form.read(|f| f.login.clone()), "admin");
/// ```
pub struct Observable<S> {
    value: RefCell<S>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_id: Cell<u64>,
}

impl<S: Subject> Observable<S> {
    /// Wrap a subject value.
    pub fn new(value: S) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(value),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        })
    }

    /// Borrow the current value.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Read one property.
    pub fn get<T>(&self, property: &Property<S, T>) -> T {
        self.read(|subject| property.get(subject))
    }

    /// Write one property and notify listeners.
    ///
    /// Listeners are notified on every write, whether or not the value changed.
    pub fn set<T>(&self, property: &Property<S, T>, value: T) -> Result<(), MachineError> {
        let name = property.writable_key()?;
        if let Some(setter) = property.setter() {
            setter(&mut self.value.borrow_mut(), value);
        }
        self.notify(name);
        Ok(())
    }

    /// Mutate the value and notify listeners that `name` changed.
    pub fn update(&self, name: &str, f: impl FnOnce(&mut S)) {
        f(&mut self.value.borrow_mut());
        self.notify(name);
    }

    /// Notify listeners that `name` changed.
    pub fn notify(&self, name: &str) {
        // Snapshot so listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(name);
        }
    }

    /// Register a change listener.
    pub fn subscribe(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Create a non-owning handle to this cell.
    pub fn handle(self: &Rc<Self>) -> SubjectHandle<S> {
        SubjectHandle {
            inner: Rc::downgrade(self),
        }
    }

    /// Consume the cell and return the value, if no other owner remains.
    pub fn try_unwrap(this: Rc<Self>) -> Result<S, Rc<Self>> {
        Rc::try_unwrap(this).map(|observable| observable.value.into_inner())
    }
}

impl<S: fmt::Debug> fmt::Debug for Observable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

/// Lookup-only reference to an [`Observable`].
///
/// Once every strong owner is gone the handle reports released, and reads
/// through it yield `None` instead of failing.
pub struct SubjectHandle<S> {
    inner: Weak<Observable<S>>,
}

impl<S: Subject> SubjectHandle<S> {
    /// Strong reference for the duration of one operation.
    pub fn upgrade(&self) -> Option<Rc<Observable<S>>> {
        self.inner.upgrade()
    }

    pub fn is_released(&self) -> bool {
        self.inner.strong_count() == 0
    }

    /// Read the value, or `None` if the subject is gone.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> Option<R> {
        self.upgrade().map(|observable| observable.read(f))
    }
}

impl<S> Clone for SubjectHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for SubjectHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubjectHandle")
            .field("released", &(self.inner.strong_count() == 0))
            .finish()
    }
}
