//! Lazily materialized values
//!
//! A [`Subject`] has no value until someone observes it. The first observer
//! wakes it and its `connect` function starts producing values; the latest
//! one is retained while the subject is observed and released as soon as
//! the last observer leaves.
//!
//! # Observation order
//!
//! [`Subject::on_value`] registers its listener *before* a dormant subject
//! connects, so a source that dispatches synchronously from `connect`
//! behaves the same as one that dispatches later. [`Subject::on_emit`]
//! only wants future values, so the subject connects first.

use std::cell::RefCell;
use std::rc::Rc;

use super::error::{ListenResult, ReactError};
use super::node::{Dispatcher, Node, Observe};
use super::remover::Remover;

/// A reactive value materialized on observation
pub struct Subject<T> {
    pub(crate) node: Rc<Node<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Subject {
            node: self.node.clone(),
        }
    }
}

impl<T: Clone + 'static> Subject<T> {
    /// Create a subject over `connect`
    ///
    /// `connect` must eventually dispatch an initial value (not necessarily
    /// synchronously) and may dispatch again on every change. The remover it
    /// returns runs when the subject goes dormant.
    pub fn derive(
        connect: impl Fn(Dispatcher<T>) -> Result<Remover, ReactError> + 'static,
    ) -> Self {
        Subject {
            node: Node::new(true, connect),
        }
    }

    /// A subject that always holds `value`
    pub fn constant(value: T) -> Self {
        Subject::derive(move |dispatcher: Dispatcher<T>| {
            dispatcher.dispatch(value.clone())?;
            Ok(Remover::noop())
        })
    }

    /// Register `listener` for future values only
    pub fn on_emit(
        &self,
        listener: impl Fn(&T) -> ListenResult + 'static,
    ) -> Result<Remover, ReactError> {
        self.node
            .observe(Rc::new(move |value: &T, _: Option<&T>| listener(value)), Observe::Emits)
    }

    /// Register `listener` for the current value (if materialized) and all future values
    ///
    /// When the subject already holds a value, `listener` receives it before
    /// this call returns.
    pub fn on_value(
        &self,
        listener: impl Fn(&T) -> ListenResult + 'static,
    ) -> Result<Remover, ReactError> {
        self.node
            .observe(Rc::new(move |value: &T, _: Option<&T>| listener(value)), Observe::Values)
    }

    pub fn is_awake(&self) -> bool {
        self.node.is_awake()
    }

    /// Whether the subject is awake and has received a value
    pub fn is_occupied(&self) -> bool {
        self.node.is_occupied()
    }

    pub fn listener_count(&self) -> usize {
        self.node.listener_count()
    }

    /// A subject of `f` applied to each of this subject's values
    pub fn map<R: Clone + 'static>(&self, f: impl Fn(&T) -> R + 'static) -> Subject<R> {
        let source = self.clone();
        let f = Rc::new(f);
        Subject::derive(move |dispatcher: Dispatcher<R>| {
            let f = f.clone();
            source.on_value(move |value| dispatcher.dispatch(f(value)))
        })
    }

    /// A subject holding the values of all `sources`, in order
    ///
    /// Nothing is dispatched until every source has delivered a value.
    /// After that, any single source change redispatches the whole vector.
    pub fn join(sources: impl IntoIterator<Item = Subject<T>>) -> Subject<Vec<T>> {
        let sources: Vec<Subject<T>> = sources.into_iter().collect();
        Subject::derive(move |dispatcher: Dispatcher<Vec<T>>| {
            connect_join(&sources, move |values| dispatcher.dispatch(values))
        })
    }
}

/// Subscribe to every source, calling `ready` with the full vector once all have values
pub(crate) fn connect_join<T: Clone + 'static>(
    sources: &[Subject<T>],
    ready: impl Fn(Vec<T>) -> ListenResult + 'static,
) -> Result<Remover, ReactError> {
    if sources.is_empty() {
        ready(Vec::new())?;
        return Ok(Remover::noop());
    }

    let slots: Rc<RefCell<Vec<Option<T>>>> = Rc::new(RefCell::new(vec![None; sources.len()]));
    let ready = Rc::new(ready);
    let mut removers = Vec::with_capacity(sources.len());

    for (index, source) in sources.iter().enumerate() {
        let slots = slots.clone();
        let ready = ready.clone();
        let subscribed = source.on_value(move |value| {
            let values = {
                let mut slots = slots.borrow_mut();
                slots[index] = Some(value.clone());
                slots.iter().cloned().collect::<Option<Vec<T>>>()
            };
            match values {
                Some(values) => ready(values),
                None => Ok(()),
            }
        });
        match subscribed {
            Ok(remover) => removers.push(remover),
            Err(err) => {
                Remover::join(removers).remove();
                return Err(err);
            }
        }
    }
    Ok(Remover::join(removers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// A subject whose connect stashes its dispatcher for the test to drive
    fn manual<T: Clone + 'static>() -> (Subject<T>, Rc<RefCell<Option<Dispatcher<T>>>>) {
        let slot: Rc<RefCell<Option<Dispatcher<T>>>> = Rc::new(RefCell::new(None));
        let connect_slot = slot.clone();
        let subject = Subject::derive(move |dispatcher| {
            *connect_slot.borrow_mut() = Some(dispatcher);
            let disconnect_slot = connect_slot.clone();
            Ok(Remover::new(move || {
                disconnect_slot.borrow_mut().take();
            }))
        });
        (subject, slot)
    }

    fn send<T: Clone + 'static>(slot: &Rc<RefCell<Option<Dispatcher<T>>>>, value: T) {
        let dispatcher = slot.borrow().clone();
        dispatcher.expect("subject is connected").dispatch(value).unwrap();
    }

    #[test]
    fn test_constant_on_value_is_immediate() {
        let subject = Subject::constant(5);
        let seen = Rc::new(Cell::new(0));
        let seen_in = seen.clone();
        let remover = subject
            .on_value(move |v| {
                seen_in.set(*v);
                Ok(())
            })
            .unwrap();
        assert_eq!(seen.get(), 5);
        assert!(subject.is_occupied());
        remover.remove();
        assert!(!subject.is_occupied());
    }

    #[test]
    fn test_async_first_value_reaches_on_value() {
        let (subject, slot) = manual::<&'static str>();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = seen.clone();
        let remover = subject
            .on_value(move |v| {
                seen_in.borrow_mut().push(*v);
                Ok(())
            })
            .unwrap();
        assert!(seen.borrow().is_empty());
        assert!(!subject.is_occupied());

        send(&slot, "loaded");
        assert_eq!(*seen.borrow(), vec!["loaded"]);

        remover.remove();
        assert!(slot.borrow().is_none());
    }

    #[test]
    fn test_join_waits_for_every_source() {
        let (a, slot_a) = manual::<i32>();
        let (b, slot_b) = manual::<i32>();
        let joined = Subject::join([a, b]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = seen.clone();
        let remover = joined
            .on_value(move |v| {
                seen_in.borrow_mut().push(v.clone());
                Ok(())
            })
            .unwrap();

        send(&slot_a, 1);
        assert!(seen.borrow().is_empty());
        send(&slot_b, 2);
        send(&slot_a, 3);
        assert_eq!(*seen.borrow(), vec![vec![1, 2], vec![3, 2]]);

        remover.remove();
        assert!(slot_a.borrow().is_none());
        assert!(slot_b.borrow().is_none());
    }

    #[test]
    fn test_map_follows_source() {
        let (source, slot) = manual::<i32>();
        let doubled = source.map(|v| v * 2);
        let seen = Rc::new(Cell::new(0));
        let seen_in = seen.clone();
        let remover = doubled
            .on_value(move |v| {
                seen_in.set(*v);
                Ok(())
            })
            .unwrap();
        send(&slot, 21);
        assert_eq!(seen.get(), 42);
        remover.remove();
        assert!(!source.is_awake());
    }
}
