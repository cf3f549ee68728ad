//! Pointer event types for mouse and touch input

use crate::geom::Point;

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Right mouse button
    Right,
    /// Back button (side button)
    Back,
    /// Forward button (side button)
    Forward,
    /// Other button with index
    Other(u16),
}

impl MouseButton {
    /// Button index as reported by browsers (`MouseEvent.button`)
    pub fn index(&self) -> u16 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(index) => *index,
        }
    }

    pub fn from_index(index: u16) -> Self {
        match index {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            3 => MouseButton::Back,
            4 => MouseButton::Forward,
            other => MouseButton::Other(other),
        }
    }
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub ctrl: bool,
    /// Alt key is held (Option on macOS)
    pub alt: bool,
    /// Meta key is held (Command on macOS, Windows key on Windows)
    pub meta: bool,
}

impl Modifiers {
    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }
}

// ============================================================================
// Mouse Events
// ============================================================================

/// Mouse events, in window coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum MouseEvent {
    /// Mouse moved to position
    Moved { x: f32, y: f32, modifiers: Modifiers },
    /// Mouse button pressed
    ButtonPressed {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    /// Mouse button released
    ButtonReleased {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    /// Mouse button double-clicked
    DoubleClicked {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    /// Mouse entered the window
    Entered,
    /// Mouse left the window
    Left,
}

impl MouseEvent {
    pub fn moved(x: f32, y: f32) -> Self {
        MouseEvent::Moved {
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    pub fn pressed(button: MouseButton, x: f32, y: f32) -> Self {
        MouseEvent::ButtonPressed {
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    pub fn released(button: MouseButton, x: f32, y: f32) -> Self {
        MouseEvent::ButtonReleased {
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    pub fn double_clicked(button: MouseButton, x: f32, y: f32) -> Self {
        MouseEvent::DoubleClicked {
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Get the position (returns None for Entered/Left)
    pub fn position(&self) -> Option<Point> {
        match self {
            MouseEvent::Moved { x, y, .. }
            | MouseEvent::ButtonPressed { x, y, .. }
            | MouseEvent::ButtonReleased { x, y, .. }
            | MouseEvent::DoubleClicked { x, y, .. } => Some(Point::new(*x, *y)),
            MouseEvent::Entered | MouseEvent::Left => None,
        }
    }
}

// ============================================================================
// Touch Events
// ============================================================================

/// Touch events for touchscreens
#[derive(Clone, Debug, PartialEq)]
pub enum TouchEvent {
    /// A touch started
    Started {
        /// Unique identifier for this touch
        id: u64,
        x: f32,
        y: f32,
        /// Touch pressure (0.0 - 1.0)
        pressure: f32,
    },
    /// A touch moved
    Moved {
        id: u64,
        x: f32,
        y: f32,
        pressure: f32,
    },
    /// A touch ended
    Ended { id: u64, x: f32, y: f32 },
    /// A touch was cancelled (e.g., by system gesture)
    Cancelled { id: u64 },
}

impl TouchEvent {
    /// Get the touch ID
    pub fn id(&self) -> u64 {
        match self {
            TouchEvent::Started { id, .. } => *id,
            TouchEvent::Moved { id, .. } => *id,
            TouchEvent::Ended { id, .. } => *id,
            TouchEvent::Cancelled { id } => *id,
        }
    }

    /// Get the position (returns None for Cancelled)
    pub fn position(&self) -> Option<Point> {
        match self {
            TouchEvent::Started { x, y, .. } => Some(Point::new(*x, *y)),
            TouchEvent::Moved { x, y, .. } => Some(Point::new(*x, *y)),
            TouchEvent::Ended { x, y, .. } => Some(Point::new(*x, *y)),
            TouchEvent::Cancelled { .. } => None,
        }
    }
}

/// The event handed to providers and interactions
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    Mouse(MouseEvent),
    Touch(TouchEvent),
}

impl PointerEvent {
    /// Short event name used in log context
    pub fn name(&self) -> &'static str {
        match self {
            PointerEvent::Mouse(MouseEvent::Moved { .. }) => "mouse-move",
            PointerEvent::Mouse(MouseEvent::ButtonPressed { .. }) => "mouse-down",
            PointerEvent::Mouse(MouseEvent::ButtonReleased { .. }) => "mouse-up",
            PointerEvent::Mouse(MouseEvent::DoubleClicked { .. }) => "double-click",
            PointerEvent::Mouse(MouseEvent::Entered) => "mouse-enter",
            PointerEvent::Mouse(MouseEvent::Left) => "mouse-leave",
            PointerEvent::Touch(TouchEvent::Started { .. }) => "touch-start",
            PointerEvent::Touch(TouchEvent::Moved { .. }) => "touch-move",
            PointerEvent::Touch(TouchEvent::Ended { .. }) => "touch-end",
            PointerEvent::Touch(TouchEvent::Cancelled { .. }) => "touch-cancel",
        }
    }

    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Mouse(event) => event.position(),
            PointerEvent::Touch(event) => event.position(),
        }
    }
}
