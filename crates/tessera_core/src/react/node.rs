//! Shared wake/sleep machinery behind streams, subjects and values
//!
//! A node is dormant until its first listener arrives. Waking invokes the
//! node's `connect` function, which hands back a [`Remover`] that is kept
//! until the last listener leaves. Sleeping runs that remover and, for
//! retaining nodes, drops the materialized value so nothing stale outlives
//! the observation.

use std::cell::RefCell;
use std::mem;
use std::rc::{Rc, Weak};

use super::eq::EqFn;
use super::error::{ListenResult, ReactError};
use super::listeners::{dispatch, ListenerId, Listeners};
use super::remover::Remover;

/// Upstream connection function: receives a dispatcher, returns the disconnect
pub(crate) type ConnectFn<T> = dyn Fn(Dispatcher<T>) -> Result<Remover, ReactError>;

/// Internal listener signature: the dispatched value and, for retaining
/// nodes, the value it replaced
pub(crate) type NodeListener<T> = dyn Fn(&T, Option<&T>) -> ListenResult;

enum Lifecycle {
    Dormant,
    /// `connect` is running; a sleep requested meanwhile is applied once it returns
    Connecting { sleep_requested: bool },
    Awake(Remover),
}

/// How a new listener wants to observe the node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Observe {
    /// Future dispatches only; a dormant node connects before the listener is added
    Emits,
    /// Current value if there is one; a dormant node connects after the listener is added
    Values,
}

pub(crate) struct Node<T> {
    connect: Box<ConnectFn<T>>,
    listeners: RefCell<Listeners<NodeListener<T>>>,
    lifecycle: RefCell<Lifecycle>,
    retain: bool,
    value: RefCell<Option<T>>,
}

impl<T: Clone + 'static> Node<T> {
    pub(crate) fn new(
        retain: bool,
        connect: impl Fn(Dispatcher<T>) -> Result<Remover, ReactError> + 'static,
    ) -> Rc<Self> {
        Rc::new(Node {
            connect: Box::new(connect),
            listeners: RefCell::new(Listeners::new()),
            lifecycle: RefCell::new(Lifecycle::Dormant),
            retain,
            value: RefCell::new(None),
        })
    }

    pub(crate) fn is_awake(&self) -> bool {
        !matches!(*self.lifecycle.borrow(), Lifecycle::Dormant)
    }

    pub(crate) fn is_occupied(&self) -> bool {
        self.value.borrow().is_some()
    }

    pub(crate) fn retained(&self) -> Option<T> {
        self.value.borrow().clone()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub(crate) fn observe(
        self: &Rc<Self>,
        listener: Rc<NodeListener<T>>,
        mode: Observe,
    ) -> Result<Remover, ReactError> {
        if !self.is_awake() {
            return match mode {
                Observe::Values => {
                    let id = self.listeners.borrow_mut().add(listener);
                    if let Err(err) = self.wake() {
                        self.listeners.borrow_mut().remove(id);
                        return Err(err);
                    }
                    Ok(self.remover(id))
                }
                Observe::Emits => {
                    self.wake()?;
                    let id = self.listeners.borrow_mut().add(listener);
                    Ok(self.remover(id))
                }
            };
        }

        let id = self.listeners.borrow_mut().add(listener.clone());
        if mode == Observe::Values {
            let current = self.retained();
            if let Some(current) = current {
                if let Err(err) = listener(&current, None) {
                    self.remove_listener(id);
                    return Err(err);
                }
            }
        }
        Ok(self.remover(id))
    }

    /// Deliver a value to every listener
    ///
    /// Dispatching into a dormant node does nothing and retains nothing.
    pub(crate) fn dispatch(&self, value: T) -> ListenResult {
        if !self.is_awake() {
            return Ok(());
        }
        let snapshot = self.listeners.borrow().snapshot();
        if self.retain {
            let old = self.value.replace(Some(value.clone()));
            dispatch(&snapshot, |listener| listener(&value, old.as_ref()))
        } else {
            dispatch(&snapshot, |listener| listener(&value, None))
        }
    }

    /// Dispatch only if `value` differs from the retained value under `eq`
    pub(crate) fn update(&self, value: T, eq: &EqFn<T>) -> ListenResult {
        let unchanged = match &*self.value.borrow() {
            Some(old) => eq(old, &value),
            None => false,
        };
        if unchanged {
            return Ok(());
        }
        self.dispatch(value)
    }

    fn remover(self: &Rc<Self>, id: ListenerId) -> Remover {
        let node = self.clone();
        Remover::new(move || node.remove_listener(id))
    }

    fn remove_listener(&self, id: ListenerId) {
        let now_empty = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.remove(id) && listeners.is_empty()
        };
        if now_empty {
            self.sleep();
        }
    }

    fn wake(self: &Rc<Self>) -> ListenResult {
        tracing::trace!(retain = self.retain, "reactive node waking");
        *self.lifecycle.borrow_mut() = Lifecycle::Connecting {
            sleep_requested: false,
        };
        let dispatcher = Dispatcher {
            node: Rc::downgrade(self),
        };

        match (self.connect)(dispatcher) {
            Ok(disconnect) => {
                let sleep_requested = matches!(
                    *self.lifecycle.borrow(),
                    Lifecycle::Connecting {
                        sleep_requested: true
                    }
                );
                if sleep_requested {
                    tracing::debug!("last listener left during connect, disconnecting");
                    *self.lifecycle.borrow_mut() = Lifecycle::Dormant;
                    disconnect.remove();
                    self.value.borrow_mut().take();
                } else {
                    *self.lifecycle.borrow_mut() = Lifecycle::Awake(disconnect);
                }
                Ok(())
            }
            Err(err) => {
                *self.lifecycle.borrow_mut() = Lifecycle::Dormant;
                self.value.borrow_mut().take();
                Err(err)
            }
        }
    }

    fn sleep(&self) {
        let previous = {
            let mut lifecycle = self.lifecycle.borrow_mut();
            if let Lifecycle::Connecting { sleep_requested } = &mut *lifecycle {
                *sleep_requested = true;
                return;
            }
            mem::replace(&mut *lifecycle, Lifecycle::Dormant)
        };
        if let Lifecycle::Awake(disconnect) = previous {
            tracing::trace!(retain = self.retain, "reactive node sleeping");
            disconnect.remove();
            self.value.borrow_mut().take();
        }
    }
}

/// Handle given to `connect` for pushing values into its node
///
/// Holds the node weakly: once every handle to the node is gone, dispatching
/// is a no-op.
pub struct Dispatcher<T> {
    node: Weak<Node<T>>,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Dispatcher {
            node: self.node.clone(),
        }
    }
}

impl<T: Clone + 'static> Dispatcher<T> {
    /// Deliver `value` to every listener of the node
    pub fn dispatch(&self, value: T) -> ListenResult {
        match self.node.upgrade() {
            Some(node) => node.dispatch(value),
            None => Ok(()),
        }
    }

    /// Deliver `value` only if it differs from the last dispatched value under `eq`
    pub fn update(&self, value: T, eq: &EqFn<T>) -> ListenResult {
        match self.node.upgrade() {
            Some(node) => node.update(value, eq),
            None => Ok(()),
        }
    }
}
