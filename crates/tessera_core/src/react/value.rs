//! Values: subjects with a durable current value
//!
//! A [`Value`] can always be read through [`Value::current`], observed or
//! not. While observed it caches its value and keeps it in sync through
//! change dispatches; while dormant it recomputes on every read, because
//! nothing would invalidate a cache.
//!
//! Derived values assume their mapping functions are pure: the same input
//! yields an equivalent output. Nothing checks this at runtime.

use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use super::eq::{data_equals, elementwise, EqFn};
use super::error::{ListenResult, ReactError};
use super::node::{Dispatcher, Node, Observe};
use super::remover::Remover;
use super::stream::Stream;
use super::subject::{connect_join, Subject};
use super::when::When;

/// A reactive value with an always-readable current value
pub struct Value<T> {
    subject: Subject<T>,
    eq: EqFn<T>,
    compute: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Value<T> {
    fn clone(&self) -> Self {
        Value {
            subject: self.subject.clone(),
            eq: self.eq.clone(),
            compute: self.compute.clone(),
        }
    }
}

impl<T: Clone + 'static> Value<T> {
    /// Assemble a value from its equality, its dormant reader and its connect function
    ///
    /// `connect` must dispatch the current value synchronously and then
    /// dispatch on every change (as judged by `eq`).
    pub fn from_parts(
        eq: EqFn<T>,
        compute: impl Fn() -> T + 'static,
        connect: impl Fn(Dispatcher<T>) -> Result<Remover, ReactError> + 'static,
    ) -> Self {
        Value {
            subject: Subject {
                node: Node::new(true, connect),
            },
            eq,
            compute: Rc::new(compute),
        }
    }

    /// A value that never changes
    pub fn constant(value: T) -> Self
    where
        T: PartialEq,
    {
        let read = value.clone();
        Value::from_parts(
            data_equals(),
            move || read.clone(),
            move |dispatcher: Dispatcher<T>| {
                dispatcher.dispatch(value.clone())?;
                Ok(Remover::noop())
            },
        )
    }

    /// The current value
    pub fn current(&self) -> T {
        match self.subject.node.retained() {
            Some(value) => value,
            None => (self.compute)(),
        }
    }

    /// The equality function gating this value's change dispatches
    pub fn eq(&self) -> EqFn<T> {
        self.eq.clone()
    }

    /// Register `listener` for changes only, called with `(new, old)`
    pub fn on_change(
        &self,
        listener: impl Fn(&T, &T) -> ListenResult + 'static,
    ) -> Result<Remover, ReactError> {
        self.subject.node.observe(
            Rc::new(move |value: &T, old: Option<&T>| match old {
                Some(old) => listener(value, old),
                None => Ok(()),
            }),
            Observe::Emits,
        )
    }

    /// A value of `f` applied to this value, compared structurally
    pub fn map<R>(&self, f: impl Fn(&T) -> R + 'static) -> Value<R>
    where
        R: Clone + PartialEq + 'static,
    {
        self.map_eq(f, data_equals())
    }

    /// A value of `f` applied to this value, compared with `eq`
    ///
    /// While observed the mapped result is cached and only redispatched when
    /// it differs under `eq`. While dormant every read recomputes it.
    pub fn map_eq<R: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> R + 'static,
        eq: EqFn<R>,
    ) -> Value<R> {
        let f = Rc::new(f);
        let compute = {
            let (source, f) = (self.clone(), f.clone());
            move || f(&source.current())
        };
        let connect = {
            let (source, eq) = (self.clone(), eq.clone());
            move |dispatcher: Dispatcher<R>| {
                let (f, eq) = (f.clone(), eq.clone());
                source.on_value(move |value| dispatcher.update(f(value), &eq))
            }
        };
        Value::from_parts(eq, compute, connect)
    }

    /// A value that follows whichever value `f` maps the current source value to
    ///
    /// Every source change swaps the subscription over to the new inner
    /// value. A change is dispatched when the new inner value differs from
    /// the last dispatched one under the *inner* value's equality, so the
    /// effective equality can change as the source moves between inner
    /// values.
    ///
    /// While dormant, the inner value is recomputed only when the source
    /// value differs (under the source's equality) from the one it was last
    /// computed for.
    pub fn switch_map<R: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> Value<R> + 'static,
    ) -> Value<R> {
        let f = Rc::new(f);
        let state: Rc<RefCell<SwitchState<T, R>>> = Rc::new(RefCell::new(SwitchState {
            source_value: None,
            inner: None,
        }));

        let eq: EqFn<R> = {
            let state = state.clone();
            Rc::new(move |a: &R, b: &R| {
                let inner_eq = state.borrow().inner.as_ref().map(Value::eq);
                inner_eq.is_some_and(|eq| eq(a, b))
            })
        };

        let compute = {
            let (source, f, state) = (self.clone(), f.clone(), state.clone());
            move || {
                let source_value = source.current();
                let cached = {
                    let state = state.borrow();
                    match (&state.source_value, &state.inner) {
                        (Some(previous), Some(inner)) if (source.eq)(previous, &source_value) => {
                            Some(inner.clone())
                        }
                        _ => None,
                    }
                };
                let inner = match cached {
                    Some(inner) => inner,
                    None => {
                        let inner = f(&source_value);
                        let mut state = state.borrow_mut();
                        state.source_value = Some(source_value);
                        state.inner = Some(inner.clone());
                        inner
                    }
                };
                inner.current()
            }
        };

        let connect = {
            let source = self.clone();
            move |dispatcher: Dispatcher<R>| {
                let inner_remover: Rc<RefCell<Option<Remover>>> = Rc::new(RefCell::new(None));
                let outer = {
                    let (f, state, inner_remover) = (f.clone(), state.clone(), inner_remover.clone());
                    source.on_value(move |source_value| {
                        let stale = inner_remover.borrow_mut().take();
                        if let Some(stale) = stale {
                            stale.remove();
                        }

                        let inner = f(source_value);
                        {
                            let mut state = state.borrow_mut();
                            state.source_value = Some(source_value.clone());
                            state.inner = Some(inner.clone());
                        }

                        let inner_eq = inner.eq();
                        let dispatcher = dispatcher.clone();
                        let remover =
                            inner.on_value(move |value| dispatcher.update(value.clone(), &inner_eq))?;
                        *inner_remover.borrow_mut() = Some(remover);
                        Ok(())
                    })?
                };
                Ok(Remover::new(move || {
                    outer.remove();
                    let inner = inner_remover.borrow_mut().take();
                    if let Some(inner) = inner {
                        inner.remove();
                    }
                }))
            }
        };

        Value::from_parts(eq, compute, connect)
    }

    /// A value holding the current values of all `values`, in order
    ///
    /// Two joined vectors are equal when every slot is equal under that
    /// slot's own equality.
    pub fn join(values: impl IntoIterator<Item = Value<T>>) -> Value<Vec<T>> {
        let values: Vec<Value<T>> = values.into_iter().collect();
        let eq = elementwise(values.iter().map(Value::eq).collect());
        let compute = {
            let values = values.clone();
            move || -> Vec<T> { values.iter().map(Value::current).collect() }
        };
        let sources: Vec<Subject<T>> = values.iter().map(|v| v.subject.clone()).collect();
        let connect = {
            let eq = eq.clone();
            move |dispatcher: Dispatcher<Vec<T>>| {
                let eq = eq.clone();
                connect_join(&sources, move |joined| dispatcher.update(joined, &eq))
            }
        };
        Value::from_parts(eq, compute, connect)
    }

    /// A stream of this value's changes
    pub fn to_stream(&self) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |dispatcher: Dispatcher<T>| {
            source.on_change(move |value, _| dispatcher.dispatch(value.clone()))
        })
    }

    /// A future resolving to the first value (current or later) satisfying `pred`
    ///
    /// Resolves immediately when the current value already satisfies
    /// `pred`. Otherwise it watches changes and stops watching once it
    /// resolves or is dropped. It never fails on its own.
    pub fn when(&self, pred: impl Fn(&T) -> bool + 'static) -> Result<When<T>, ReactError> {
        let current = self.current();
        if pred(&current) {
            return Ok(When::ready(current));
        }
        When::watch(self, pred)
    }
}

struct SwitchState<T, R> {
    source_value: Option<T>,
    inner: Option<Value<R>>,
}

impl<T> Deref for Value<T> {
    type Target = Subject<T>;

    fn deref(&self) -> &Subject<T> {
        &self.subject
    }
}
