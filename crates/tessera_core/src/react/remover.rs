//! Subscription removal handles

use std::fmt;

/// Removes the listener (or group of listeners) it was returned for
///
/// Removal is explicit: dropping a `Remover` without calling
/// [`Remover::remove`] leaves the listener registered.
#[must_use = "dropping a Remover leaves the listener registered"]
pub struct Remover(Option<Box<dyn FnOnce()>>);

impl Remover {
    pub fn new(remove: impl FnOnce() + 'static) -> Self {
        Remover(Some(Box::new(remove)))
    }

    /// A remover that does nothing
    pub fn noop() -> Self {
        Remover(None)
    }

    /// Combine several removers; they run in the given order
    pub fn join(removers: impl IntoIterator<Item = Remover>) -> Self {
        let removers: Vec<Remover> = removers.into_iter().collect();
        if removers.is_empty() {
            return Remover::noop();
        }
        Remover::new(move || {
            for remover in removers {
                remover.remove();
            }
        })
    }

    /// Chain another remover after this one
    pub fn and(self, other: Remover) -> Self {
        Remover::join([self, other])
    }

    pub fn remove(mut self) {
        if let Some(remove) = self.0.take() {
            remove();
        }
    }
}

impl Default for Remover {
    fn default() -> Self {
        Remover::noop()
    }
}

impl fmt::Debug for Remover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Remover")
            .field(&if self.0.is_some() { "armed" } else { "noop" })
            .finish()
    }
}
