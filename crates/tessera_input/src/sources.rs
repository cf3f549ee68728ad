//! Host event sources feeding the interaction manager

use tessera_core::react::{Emitter, Stream};

use crate::input::{MouseEvent, TouchEvent};

/// The event streams an [`InteractionManager`](crate::InteractionManager) listens to
#[derive(Clone)]
pub struct InputSources {
    pub mouse: Stream<MouseEvent>,
    pub touch: Stream<TouchEvent>,
}

/// Emitters for hosts that push input events by hand
///
/// The host's native event callbacks call [`Emitter::emit`]; the manager
/// sees the events through [`InputEmitters::sources`].
#[derive(Clone, Default)]
pub struct InputEmitters {
    pub mouse: Emitter<MouseEvent>,
    pub touch: Emitter<TouchEvent>,
}

impl InputEmitters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Streams over these emitters
    pub fn sources(&self) -> InputSources {
        InputSources {
            mouse: self.mouse.stream(),
            touch: self.touch.stream(),
        }
    }
}
