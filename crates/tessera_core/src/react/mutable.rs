//! Externally settable values

use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use super::eq::{data_equals, EqFn};
use super::error::ListenResult;
use super::node::Dispatcher;
use super::remover::Remover;
use super::value::Value;

/// A value owned and updated by application code
///
/// The root of most application state. Only [`Mutable::update`] (and
/// [`Mutable::modify`]) change it, and listeners hear about an update only
/// when the new value differs from the old one under the value's equality.
pub struct Mutable<T> {
    value: Value<T>,
    cell: Rc<RefCell<T>>,
}

impl<T> Clone for Mutable<T> {
    fn clone(&self) -> Self {
        Mutable {
            value: self.value.clone(),
            cell: self.cell.clone(),
        }
    }
}

impl<T: Clone + 'static> Mutable<T> {
    /// A mutable compared structurally
    pub fn local(initial: T) -> Self
    where
        T: PartialEq,
    {
        Mutable::local_eq(initial, data_equals())
    }

    /// A mutable compared with `eq`
    pub fn local_eq(initial: T, eq: EqFn<T>) -> Self {
        let cell = Rc::new(RefCell::new(initial));
        let read = cell.clone();
        let connect_cell = cell.clone();
        let value = Value::from_parts(
            eq,
            move || read.borrow().clone(),
            move |dispatcher: Dispatcher<T>| {
                let current = connect_cell.borrow().clone();
                dispatcher.dispatch(current)?;
                Ok(Remover::noop())
            },
        );
        Mutable { value, cell }
    }

    /// Replace the value
    ///
    /// Does nothing when `value` equals the current value. Otherwise stores
    /// it, then notifies change listeners with `(value, old)` in
    /// registration order. Listener failures are returned after every
    /// listener has run.
    pub fn update(&self, value: T) -> ListenResult {
        let eq = self.value.eq();
        let unchanged = eq(&*self.cell.borrow(), &value);
        if unchanged {
            return Ok(());
        }
        *self.cell.borrow_mut() = value.clone();
        self.value.node.dispatch(value)
    }

    /// Update through a function of the current value
    pub fn modify(&self, f: impl FnOnce(&T) -> T) -> ListenResult {
        let next = f(&*self.cell.borrow());
        self.update(next)
    }

    /// A read-only view of this mutable
    pub fn read_only(&self) -> Value<T> {
        self.value.clone()
    }
}

impl<T> Deref for Mutable<T> {
    type Target = Value<T>;

    fn deref(&self) -> &Value<T> {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::react::eq::never_equals;
    use std::cell::Cell;

    #[test]
    fn test_update_dormant_changes_current() {
        let name = Mutable::local("a".to_string());
        name.update("b".to_string()).unwrap();
        assert_eq!(name.current(), "b");
        assert!(!name.is_awake());
    }

    #[test]
    fn test_modify() {
        let count = Mutable::local(1);
        count.modify(|v| v + 1).unwrap();
        assert_eq!(count.current(), 2);
    }

    #[test]
    fn test_never_equals_dispatches_every_update() {
        let count = Mutable::local_eq(1, never_equals());
        let changes = Rc::new(Cell::new(0));
        let counter = changes.clone();
        let remover = count
            .on_change(move |_, _| {
                counter.set(counter.get() + 1);
                Ok(())
            })
            .unwrap();
        count.update(1).unwrap();
        count.update(1).unwrap();
        assert_eq!(changes.get(), 2);
        remover.remove();
    }

    #[test]
    fn test_listener_sees_stored_value() {
        let count = Mutable::local(0);
        let observed = Rc::new(Cell::new(-1));
        let (reader, seen) = (count.clone(), observed.clone());
        let remover = count
            .on_change(move |_, _| {
                seen.set(reader.current());
                Ok(())
            })
            .unwrap();
        count.update(7).unwrap();
        assert_eq!(observed.get(), 7);
        remover.remove();
    }
}
