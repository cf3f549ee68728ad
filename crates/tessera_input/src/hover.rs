//! Hover tracking: which providers the mouse is currently over
//!
//! Each hover update reports the providers whose bounds contain the
//! pointer, front-most first. Diffing against the previous update yields
//! the providers the pointer has left, which then get an explicit
//! end-of-hover callback.

use std::hash::Hash;

use rustc_hash::FxHashSet;

/// The set of hovered keys, kept in front-to-back order
#[derive(Clone, Debug)]
pub(crate) struct HoverState<K> {
    hovered: Vec<K>,
}

impl<K: Copy + Eq + Hash> HoverState<K> {
    pub(crate) fn new() -> Self {
        Self {
            hovered: Vec::new(),
        }
    }

    /// Replace the hovered set, returning the keys that dropped out
    pub(crate) fn update(&mut self, now: Vec<K>) -> Vec<K> {
        let current: FxHashSet<K> = now.iter().copied().collect();
        let left = self
            .hovered
            .iter()
            .copied()
            .filter(|key| !current.contains(key))
            .collect();
        self.hovered = now;
        left
    }

    /// Forget every hovered key, returning them
    pub(crate) fn clear(&mut self) -> Vec<K> {
        std::mem::take(&mut self.hovered)
    }

    /// Drop a key without reporting it (its provider went away)
    pub(crate) fn forget(&mut self, key: K) {
        self.hovered.retain(|other| *other != key);
    }

    pub(crate) fn contains(&self, key: K) -> bool {
        self.hovered.contains(&key)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.hovered.is_empty()
    }
}

impl<K: Copy + Eq + Hash> Default for HoverState<K> {
    fn default() -> Self {
        Self::new()
    }
}
