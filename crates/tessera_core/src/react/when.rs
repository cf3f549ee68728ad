//! Future adapter for waiting on a value

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use super::error::ReactError;
use super::remover::Remover;
use super::value::Value;

/// Resolves to the first value satisfying a predicate
///
/// Created by [`Value::when`]. Dropping it before it resolves removes its
/// change listener.
pub struct When<T> {
    state: Rc<WhenState<T>>,
}

struct WhenState<T> {
    value: RefCell<Option<T>>,
    resolved: Cell<bool>,
    waker: RefCell<Option<Waker>>,
    watch: RefCell<Option<Remover>>,
}

impl<T> WhenState<T> {
    fn new() -> Self {
        WhenState {
            value: RefCell::new(None),
            resolved: Cell::new(false),
            waker: RefCell::new(None),
            watch: RefCell::new(None),
        }
    }

    fn resolve(&self, value: T) {
        *self.value.borrow_mut() = Some(value);
        self.resolved.set(true);
        let watch = self.watch.borrow_mut().take();
        if let Some(watch) = watch {
            watch.remove();
        }
        let waker = self.waker.borrow_mut().take();
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T: Clone + 'static> When<T> {
    pub(crate) fn ready(value: T) -> Self {
        let state = WhenState::new();
        *state.value.borrow_mut() = Some(value);
        state.resolved.set(true);
        When {
            state: Rc::new(state),
        }
    }

    pub(crate) fn watch(
        source: &Value<T>,
        pred: impl Fn(&T) -> bool + 'static,
    ) -> Result<Self, ReactError> {
        let state = Rc::new(WhenState::new());
        let weak = Rc::downgrade(&state);
        let remover = source.on_change(move |value, _| {
            if let Some(state) = weak.upgrade() {
                if !state.resolved.get() && pred(value) {
                    state.resolve(value.clone());
                }
            }
            Ok(())
        })?;
        *state.watch.borrow_mut() = Some(remover);
        Ok(When { state })
    }
}

impl<T> When<T> {
    pub fn is_resolved(&self) -> bool {
        self.state.resolved.get()
    }
}

impl<T> Future for When<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let value = self.state.value.borrow_mut().take();
        match value {
            Some(value) => Poll::Ready(value),
            None => {
                *self.state.waker.borrow_mut() = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl<T> Drop for When<T> {
    fn drop(&mut self) {
        let watch = self.state.watch.borrow_mut().take();
        if let Some(watch) = watch {
            watch.remove();
        }
    }
}
