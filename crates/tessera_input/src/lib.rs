//! Tessera pointer input
//!
//! Arbitrates mouse and touch gestures between UI components sharing one
//! window.
//!
//! # Architecture
//!
//! - [`InteractionProvider`] - A component taking part in input routing
//! - [`PointerInteraction`] - One candidate gesture started on pointer down
//! - [`InteractionManager`] - Hit tests providers in z-order and decides
//!   which interaction owns each gesture
//!
//! The host either calls [`InteractionManager::handle_mouse`] and
//! [`InteractionManager::handle_touch`] directly, or hands the manager a pair
//! of event streams with [`InteractionManager::attach`].
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use tessera_input::prelude::*;
//!
//! let manager = InteractionManager::new(InteractionConfig::default());
//! let remover = manager.add_provider(Rc::new(MyCanvas::new()));
//!
//! let emitters = InputEmitters::new();
//! manager.attach(&emitters.sources())?;
//! emitters.mouse.emit(MouseEvent::pressed(MouseButton::Left, 10.0, 10.0))?;
//! ```

mod config;
mod edit;
mod error;
mod geom;
mod hover;
mod input;
mod interaction;
mod manager;
mod sources;

pub use config::InteractionConfig;
pub use edit::EditCounter;
pub use error::{InputError, Result};
pub use geom::{Point, Rect, Size};
pub use input::{Modifiers, MouseButton, MouseEvent, PointerEvent, TouchEvent};
pub use interaction::{InteractionKind, InteractionProvider, Localized, PointerInteraction};
pub use manager::{InputChannel, InteractionManager, ProviderId};
pub use sources::{InputEmitters, InputSources};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::InteractionConfig;
    pub use crate::error::{InputError, Result};
    pub use crate::geom::{Point, Rect};
    pub use crate::input::{MouseButton, MouseEvent, PointerEvent, TouchEvent};
    pub use crate::interaction::{
        InteractionKind, InteractionProvider, Localized, PointerInteraction,
    };
    pub use crate::manager::InteractionManager;
    pub use crate::sources::{InputEmitters, InputSources};
}
