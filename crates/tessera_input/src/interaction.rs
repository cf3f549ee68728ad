//! The provider / interaction protocol
//!
//! UI components implement [`InteractionProvider`] to take part in input
//! routing. On pointer down the front-most in-bounds provider may start any
//! number of [`PointerInteraction`]s; the manager then runs them against
//! each other until one claims the gesture or the pointer is released.

use std::fmt;

use crate::error::Result;
use crate::geom::Point;
use crate::input::PointerEvent;

/// What sort of gesture an interaction represents
///
/// Lets a provider recognise its own interactions among those it handed
/// out, and is included in log context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Press and release in place (buttons, toggles)
    Press,
    /// Dragging content or a handle
    Drag,
    /// Scrolling or panning a viewport
    Scroll,
    #[default]
    Other,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InteractionKind::Press => "press",
            InteractionKind::Drag => "drag",
            InteractionKind::Scroll => "scroll",
            InteractionKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// One candidate gesture for a pointer-down-to-up session
///
/// Created by a provider on pointer down and owned by the interaction
/// manager until release, cancel, or losing to another interaction.
pub trait PointerInteraction {
    /// The pointer moved; return `true` to claim the gesture exclusively
    ///
    /// Once an interaction claims, every other interaction in the session is
    /// canceled and only the claimant sees further events.
    fn pointer_move(&mut self, event: &PointerEvent, pos: Point) -> Result<bool>;

    /// The pointer was released
    fn release(&mut self, event: &PointerEvent, pos: Point) -> Result<()>;

    /// The interaction lost out or the gesture was aborted
    fn cancel(&mut self) -> Result<()>;

    /// Exclusive group tag; among interactions sharing a tag only the
    /// highest priority survives pointer down
    fn exclusive(&self) -> Option<&str> {
        None
    }

    fn priority(&self) -> i32 {
        0
    }

    fn kind(&self) -> InteractionKind {
        InteractionKind::Other
    }
}

/// A provider's view of a window-space position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Localized {
    /// The position in the provider's own coordinates
    pub pos: Point,
    /// Whether the position lies within the provider's bounds
    pub inside: bool,
}

impl Localized {
    pub fn inside(pos: Point) -> Self {
        Localized { pos, inside: true }
    }

    pub fn outside(pos: Point) -> Self {
        Localized { pos, inside: false }
    }
}

/// A component registered with the interaction manager
///
/// Providers are visited highest [`z_index`](Self::z_index) first. Methods
/// take `&self`; providers keep their own state behind interior
/// mutability.
pub trait InteractionProvider {
    /// Stacking order, read once when the provider is registered
    fn z_index(&self) -> i32;

    /// Convert window coordinates into local coordinates
    fn to_local(&self, x: f32, y: f32) -> Localized;

    /// A pointer went down inside this provider; push any interactions it starts into `into`
    fn handle_pointer_down(
        &self,
        event: &PointerEvent,
        pos: Point,
        into: &mut Vec<Box<dyn PointerInteraction>>,
    ) -> Result<()>;

    /// The mouse moved with no active session
    ///
    /// Called on every provider, inside or not. `top_hit` is true only for
    /// the front-most provider containing the pointer.
    fn update_mouse_hover(&self, _event: &PointerEvent, _pos: Point, _top_hit: bool) {}

    /// The pointer is no longer over this provider
    fn end_mouse_hover(&self) {}

    /// A double click landed inside this provider; return whether it was used
    fn handle_double_click(&self, _event: &PointerEvent, _pos: Point) -> Result<bool> {
        Ok(false)
    }

    /// Name used in log context
    fn label(&self) -> &str {
        "provider"
    }
}
