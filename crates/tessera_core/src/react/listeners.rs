//! Ordered listener registry
//!
//! Listeners are dispatched in registration order and removed by the
//! [`ListenerId`] handed out when they were added. Dispatch always walks a
//! snapshot taken before the first call, so a listener that adds or removes
//! listeners (itself included) never disturbs the walk in progress.

use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use super::error::{aggregate, ListenResult};

new_key_type! {
    /// Identifies one registered listener
    pub struct ListenerId;
}

/// Snapshot of a listener list taken for one dispatch
pub type Snapshot<F> = SmallVec<[Rc<F>; 4]>;

/// Ordered list of callbacks sharing one signature
pub struct Listeners<F: ?Sized> {
    slots: SlotMap<ListenerId, Rc<F>>,
    order: SmallVec<[ListenerId; 4]>,
}

impl<F: ?Sized> Listeners<F> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: SmallVec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Append a listener; it runs after every listener already registered
    pub fn add(&mut self, listener: Rc<F>) -> ListenerId {
        let id = self.slots.insert(listener);
        self.order.push(id);
        id
    }

    /// Remove a listener, returning whether it was still registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        if self.slots.remove(id).is_none() {
            return false;
        }
        self.order.retain(|other| *other != id);
        true
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.slots.contains_key(id)
    }

    /// Copy the current listeners in dispatch order
    pub fn snapshot(&self) -> Snapshot<F> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(*id).cloned())
            .collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Call every listener in `snapshot`, collecting failures
///
/// All listeners run even when some fail. One failure is returned as-is,
/// two or more are returned as a multi-error.
pub fn dispatch<F: ?Sized>(
    snapshot: &[Rc<F>],
    mut call: impl FnMut(&F) -> ListenResult,
) -> ListenResult {
    let mut errors = Vec::new();
    for listener in snapshot {
        if let Err(err) = call(listener) {
            errors.push(err);
        }
    }
    aggregate(errors)
}
