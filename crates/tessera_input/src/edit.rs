//! Edit numbering
//!
//! Consumers that record undoable edits compare edit numbers to decide
//! whether two edits belong together: edits made under the same number
//! (one drag, one press-and-release) merge, edits under different numbers
//! don't. The interaction manager advances the number after every
//! completed pointer gesture.

use std::cell::Cell;
use std::rc::Rc;

/// Shared edit number
///
/// Clones share the same counter. Advanced by the interaction manager when
/// a mouse-up ends an accepted session and when a touch-end (not a cancel)
/// ends one, and by anyone calling [`EditCounter::increment`].
#[derive(Clone, Debug, Default)]
pub struct EditCounter {
    current: Rc<Cell<u64>>,
}

impl EditCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current edit number
    pub fn current(&self) -> u64 {
        self.current.get()
    }

    /// Start a new edit, returning the new number
    pub fn increment(&self) -> u64 {
        let next = self.current.get() + 1;
        self.current.set(next);
        next
    }
}
