//! Interaction manager configuration

/// Interaction manager configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionConfig {
    /// Resolve exclusive interaction groups as soon as a pointer goes down
    pub resolve_exclusive_on_down: bool,
    /// Deliver hover updates for mouse moves outside an active session
    pub track_hover: bool,
    /// Accept touch input
    pub track_touch: bool,
    /// Cancel every live session when the manager shuts down
    pub cancel_on_shutdown: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            resolve_exclusive_on_down: true,
            track_hover: true,
            track_touch: true,
            cancel_on_shutdown: true,
        }
    }
}

impl InteractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether exclusive groups are resolved on pointer down
    pub fn resolve_exclusive_on_down(mut self, resolve: bool) -> Self {
        self.resolve_exclusive_on_down = resolve;
        self
    }

    /// Set whether hover is tracked
    pub fn track_hover(mut self, track: bool) -> Self {
        self.track_hover = track;
        self
    }

    /// Set whether touch input is accepted
    pub fn track_touch(mut self, track: bool) -> Self {
        self.track_touch = track;
        self
    }

    /// Set whether shutdown cancels live sessions
    pub fn cancel_on_shutdown(mut self, cancel: bool) -> Self {
        self.cancel_on_shutdown = cancel;
        self
    }
}
