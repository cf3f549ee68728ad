//! Push-only event streams
//!
//! A [`Stream`] never holds a value. It connects to its upstream source when
//! it gains its first listener and disconnects when it loses its last one.
//! Derived streams (`map`, `filter`, `merge`) are streams of their own, so a
//! chain of derived streams wakes and sleeps one level at a time.

use std::ops::Deref;
use std::rc::Rc;

use super::error::{ListenResult, ReactError};
use super::node::{Dispatcher, Node, Observe};
use super::remover::Remover;

/// A push-only reactive event source
pub struct Stream<T> {
    node: Rc<Node<T>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Stream {
            node: self.node.clone(),
        }
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Create a stream over an upstream source
    ///
    /// `connect` runs each time the stream wakes. It may dispatch any number
    /// of times, synchronously or later, and must stop once the returned
    /// remover has run.
    pub fn new(
        connect: impl Fn(Dispatcher<T>) -> Result<Remover, ReactError> + 'static,
    ) -> Self {
        Stream {
            node: Node::new(false, connect),
        }
    }

    /// A stream that never emits
    pub fn never() -> Self {
        Stream::new(|_| Ok(Remover::noop()))
    }

    /// Register `listener` for every future emission
    ///
    /// The first listener wakes the stream; it is registered before the
    /// upstream connects, so emissions made during connect reach it.
    pub fn on_emit(
        &self,
        listener: impl Fn(&T) -> ListenResult + 'static,
    ) -> Result<Remover, ReactError> {
        self.node
            .observe(Rc::new(move |value: &T, _: Option<&T>| listener(value)), Observe::Values)
    }

    pub fn is_awake(&self) -> bool {
        self.node.is_awake()
    }

    pub fn listener_count(&self) -> usize {
        self.node.listener_count()
    }

    /// A stream of `f` applied to every emission
    pub fn map<R: Clone + 'static>(&self, f: impl Fn(&T) -> R + 'static) -> Stream<R> {
        let upstream = self.clone();
        let f = Rc::new(f);
        Stream::new(move |dispatcher: Dispatcher<R>| {
            let f = f.clone();
            upstream.on_emit(move |value| dispatcher.dispatch(f(value)))
        })
    }

    /// A stream of the emissions that satisfy `pred`
    pub fn filter(&self, pred: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        let upstream = self.clone();
        let pred = Rc::new(pred);
        Stream::new(move |dispatcher: Dispatcher<T>| {
            let pred = pred.clone();
            upstream.on_emit(move |value| {
                if pred(value) {
                    dispatcher.dispatch(value.clone())
                } else {
                    Ok(())
                }
            })
        })
    }

    /// A stream emitting whatever any of `streams` emits
    pub fn merge(streams: impl IntoIterator<Item = Stream<T>>) -> Stream<T> {
        let streams: Vec<Stream<T>> = streams.into_iter().collect();
        Stream::new(move |dispatcher: Dispatcher<T>| {
            let mut removers = Vec::with_capacity(streams.len());
            for stream in &streams {
                let dispatcher = dispatcher.clone();
                match stream.on_emit(move |value| dispatcher.dispatch(value.clone())) {
                    Ok(remover) => removers.push(remover),
                    Err(err) => {
                        Remover::join(removers).remove();
                        return Err(err);
                    }
                }
            }
            Ok(Remover::join(removers))
        })
    }

    pub(crate) fn dispatch(&self, value: T) -> ListenResult {
        self.node.dispatch(value)
    }
}

/// A stream triggered by calling [`Emitter::emit`]
///
/// Used to bridge host callbacks (input handlers, timers) into the
/// reactive graph. Emitted values are not retained.
pub struct Emitter<T> {
    stream: Stream<T>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Emitter {
            stream: self.stream.clone(),
        }
    }
}

impl<T: Clone + 'static> Emitter<T> {
    pub fn new() -> Self {
        Emitter {
            stream: Stream::never(),
        }
    }

    /// Synchronously deliver `value` to every current listener
    pub fn emit(&self, value: T) -> ListenResult {
        self.stream.dispatch(value)
    }

    /// The stream side of this emitter
    pub fn stream(&self) -> Stream<T> {
        self.stream.clone()
    }
}

impl<T: Clone + 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Emitter<T> {
    type Target = Stream<T>;

    fn deref(&self) -> &Stream<T> {
        &self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let emitter = Emitter::<i32>::new();
        assert!(emitter.emit(1).is_ok());
        assert!(!emitter.is_awake());
    }

    #[test]
    fn test_map_and_filter_chain() {
        let emitter = Emitter::<i32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = seen.clone();

        let evens = emitter.filter(|v| v % 2 == 0).map(|v| v * 10);
        let remover = evens
            .on_emit(move |v| {
                seen_in.borrow_mut().push(*v);
                Ok(())
            })
            .unwrap();

        for v in 1..=4 {
            emitter.emit(v).unwrap();
        }
        assert_eq!(*seen.borrow(), vec![20, 40]);

        remover.remove();
        assert!(!emitter.is_awake());
        assert!(!evens.is_awake());
    }

    #[test]
    fn test_merge_forwards_all_sources() {
        let a = Emitter::<&'static str>::new();
        let b = Emitter::<&'static str>::new();
        let merged = Stream::merge([a.stream(), b.stream()]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = seen.clone();

        let remover = merged
            .on_emit(move |v| {
                seen_in.borrow_mut().push(*v);
                Ok(())
            })
            .unwrap();
        a.emit("a").unwrap();
        b.emit("b").unwrap();
        assert_eq!(*seen.borrow(), vec!["a", "b"]);

        remover.remove();
        assert!(!a.is_awake());
        assert!(!b.is_awake());
    }

    #[test]
    fn test_sync_connect_emission_reaches_first_listener() {
        let stream = Stream::new(|d: Dispatcher<i32>| {
            d.dispatch(3)?;
            Ok(Remover::noop())
        });
        let seen = Rc::new(Cell::new(0));
        let seen_in = seen.clone();
        let remover = stream
            .on_emit(move |v| {
                seen_in.set(*v);
                Ok(())
            })
            .unwrap();
        assert_eq!(seen.get(), 3);
        remover.remove();
    }
}
