//! Pointer interaction arbitration
//!
//! Routes mouse and touch input to registered [`InteractionProvider`]s and
//! decides which of the [`PointerInteraction`]s they start gets to own each
//! gesture.
//!
//! # Architecture
//!
//! ```text
//! Host input (mouse / touch streams, or direct calls)
//!     ↓
//! InteractionManager (overlay check, z-ordered hit testing)
//!     ↓ pointer down: front-most in-bounds provider only
//! Session per channel (one per mouse button, one for the tracked touch)
//!     ↓ pointer move: first interaction returning `true` claims, the rest are canceled
//! release / cancel → session ends
//! ```
//!
//! Each channel moves Idle → Active (candidate interactions live) →
//! Claimed (one survivor) → Idle. A pointer down on a channel that is
//! still active means an up or cancel was missed; the stale session is
//! canceled before the new one starts.
//!
//! Handler failures are logged and never interrupt a dispatch.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tessera_core::react::{ReactError, Remover};

use crate::config::InteractionConfig;
use crate::edit::EditCounter;
use crate::geom::{Point, Rect};
use crate::hover::HoverState;
use crate::input::{MouseButton, MouseEvent, PointerEvent, TouchEvent};
use crate::interaction::{InteractionProvider, PointerInteraction};
use crate::sources::InputSources;

new_key_type! {
    /// Identifies a registered provider
    pub struct ProviderId;
}

/// An input channel holding at most one session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputChannel {
    Mouse(MouseButton),
    /// The single tracked touch
    Touch,
}

/// Live interactions for one channel, plus the provider that started them
struct Session {
    provider: Rc<dyn InteractionProvider>,
    interactions: Vec<Box<dyn PointerInteraction>>,
}

struct TouchSession {
    id: u64,
    session: Session,
}

struct ProviderEntry {
    provider: Rc<dyn InteractionProvider>,
    z_index: i32,
}

/// Provider list changes requested while a dispatch was running
enum PendingChange {
    Add(ProviderId),
    Remove(ProviderId),
}

type ProviderSnapshot = SmallVec<[(ProviderId, Rc<dyn InteractionProvider>); 8]>;

struct ManagerState {
    config: InteractionConfig,
    edits: EditCounter,
    providers: RefCell<SlotMap<ProviderId, ProviderEntry>>,
    /// Registered providers, highest z-index first, ties in registration order
    order: RefCell<Vec<ProviderId>>,
    pending: RefCell<Vec<PendingChange>>,
    dispatch_depth: Cell<u32>,
    mouse: RefCell<FxHashMap<MouseButton, Session>>,
    touch: RefCell<Option<TouchSession>>,
    overlay: Cell<Option<Rect>>,
    hover: RefCell<HoverState<ProviderId>>,
    attached: RefCell<Vec<Remover>>,
}

/// Closes a dispatch even when a handler unwinds
struct DispatchGuard<'a> {
    state: &'a ManagerState,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        let depth = self.state.dispatch_depth.get().saturating_sub(1);
        self.state.dispatch_depth.set(depth);
        // While unwinding, queued changes wait for the next completed dispatch
        if depth == 0 && !std::thread::panicking() {
            self.state.apply_pending();
        }
    }
}

impl ManagerState {
    /// Run `f` as a dispatch; provider list changes made meanwhile apply afterwards
    fn dispatching<R>(&self, f: impl FnOnce() -> R) -> R {
        self.dispatch_depth.set(self.dispatch_depth.get() + 1);
        let _guard = DispatchGuard { state: self };
        f()
    }

    fn apply_pending(&self) {
        loop {
            let pending = std::mem::take(&mut *self.pending.borrow_mut());
            if pending.is_empty() {
                break;
            }
            for change in pending {
                match change {
                    PendingChange::Add(id) => self.insert_ordered(id),
                    PendingChange::Remove(id) => self.remove_now(id),
                }
            }
        }
    }

    fn insert_ordered(&self, id: ProviderId) {
        let providers = self.providers.borrow();
        let Some(z_index) = providers.get(id).map(|entry| entry.z_index) else {
            return;
        };
        let mut order = self.order.borrow_mut();
        let index = order
            .iter()
            .position(|other| providers.get(*other).is_some_and(|entry| entry.z_index < z_index))
            .unwrap_or(order.len());
        order.insert(index, id);
    }

    fn remove_provider(&self, id: ProviderId) {
        if self.dispatch_depth.get() > 0 {
            self.pending.borrow_mut().push(PendingChange::Remove(id));
        } else {
            self.remove_now(id);
        }
    }

    fn remove_now(&self, id: ProviderId) {
        self.order.borrow_mut().retain(|other| *other != id);
        let removed = self.providers.borrow_mut().remove(id);
        let was_hovered = {
            let mut hover = self.hover.borrow_mut();
            let hovered = hover.contains(id);
            hover.forget(id);
            hovered
        };
        if let (Some(entry), true) = (removed, was_hovered) {
            entry.provider.end_mouse_hover();
        }
    }

    fn snapshot(&self) -> ProviderSnapshot {
        let providers = self.providers.borrow();
        self.order
            .borrow()
            .iter()
            .filter_map(|id| providers.get(*id).map(|entry| (*id, entry.provider.clone())))
            .collect()
    }

    fn provider(&self, id: ProviderId) -> Option<Rc<dyn InteractionProvider>> {
        self.providers
            .borrow()
            .get(id)
            .map(|entry| entry.provider.clone())
    }

    fn overlay_contains(&self, x: f32, y: f32) -> bool {
        self.overlay
            .get()
            .is_some_and(|rect| rect.contains(Point::new(x, y)))
    }
}

/// Arbitrates pointer gestures between registered providers
///
/// Cheap to clone; clones share the same state. Everything runs on the
/// thread that delivers input.
#[derive(Clone)]
pub struct InteractionManager {
    state: Rc<ManagerState>,
}

impl Default for InteractionManager {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl InteractionManager {
    pub fn new(config: InteractionConfig) -> Self {
        Self::with_edits(config, EditCounter::new())
    }

    /// Create a manager advancing a shared edit counter
    pub fn with_edits(config: InteractionConfig, edits: EditCounter) -> Self {
        Self {
            state: Rc::new(ManagerState {
                config,
                edits,
                providers: RefCell::new(SlotMap::with_key()),
                order: RefCell::new(Vec::new()),
                pending: RefCell::new(Vec::new()),
                dispatch_depth: Cell::new(0),
                mouse: RefCell::new(FxHashMap::default()),
                touch: RefCell::new(None),
                overlay: Cell::new(None),
                hover: RefCell::new(HoverState::new()),
                attached: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.state.config
    }

    /// The edit counter this manager advances
    pub fn edits(&self) -> EditCounter {
        self.state.edits.clone()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Register a provider
    ///
    /// Providers are visited highest z-index first; equal z-indices keep
    /// registration order. Registering or removing during a dispatch takes
    /// effect once the dispatch completes.
    pub fn add_provider(&self, provider: Rc<dyn InteractionProvider>) -> Remover {
        let z_index = provider.z_index();
        let id = self
            .state
            .providers
            .borrow_mut()
            .insert(ProviderEntry { provider, z_index });
        if self.state.dispatch_depth.get() > 0 {
            self.state.pending.borrow_mut().push(PendingChange::Add(id));
        } else {
            self.state.insert_ordered(id);
        }

        let state = Rc::downgrade(&self.state);
        Remover::new(move || {
            if let Some(state) = state.upgrade() {
                state.remove_provider(id);
            }
        })
    }

    /// Number of providers currently visited by dispatch
    pub fn provider_count(&self) -> usize {
        self.state.order.borrow().len()
    }

    /// Leave input inside `rect` to the host's native UI
    pub fn set_overlay_rect(&self, rect: Rect) {
        self.state.overlay.set(Some(rect));
    }

    pub fn clear_overlay_rect(&self) {
        self.state.overlay.set(None);
    }

    pub fn overlay_rect(&self) -> Option<Rect> {
        self.state.overlay.get()
    }

    /// Listen to the host's input streams until [`shutdown`](Self::shutdown)
    ///
    /// Attaching again replaces the previous subscriptions.
    pub fn attach(&self, sources: &InputSources) -> Result<(), ReactError> {
        self.detach();

        let state = Rc::downgrade(&self.state);
        let mouse = sources.mouse.on_emit(move |event| {
            if let Some(state) = state.upgrade() {
                InteractionManager { state }.handle_mouse(event);
            }
            Ok(())
        })?;

        let state = Rc::downgrade(&self.state);
        let touch = sources.touch.on_emit(move |event| {
            if let Some(state) = state.upgrade() {
                InteractionManager { state }.handle_touch(event);
            }
            Ok(())
        });
        let touch = match touch {
            Ok(touch) => touch,
            Err(err) => {
                mouse.remove();
                return Err(err);
            }
        };

        self.state.attached.borrow_mut().extend([mouse, touch]);
        Ok(())
    }

    /// Stop listening to input sources, ending hover and (if configured) live sessions
    pub fn shutdown(&self) {
        self.detach();

        if self.state.config.cancel_on_shutdown {
            let sessions: Vec<Session> = self
                .state
                .mouse
                .borrow_mut()
                .drain()
                .map(|(_, session)| session)
                .collect();
            for session in sessions {
                self.cancel_session(session, "shutdown");
            }
            let touch = self.state.touch.borrow_mut().take();
            if let Some(touch) = touch {
                self.cancel_session(touch.session, "shutdown");
            }
        }

        self.end_all_hover();
        tracing::debug!("interaction manager shut down");
    }

    fn detach(&self) {
        let attached = std::mem::take(&mut *self.state.attached.borrow_mut());
        if !attached.is_empty() {
            tracing::debug!("detaching from input sources");
            Remover::join(attached).remove();
        }
    }

    /// Number of live interactions on `channel`, or `None` when it is idle
    pub fn session_len(&self, channel: InputChannel) -> Option<usize> {
        match channel {
            InputChannel::Mouse(button) => self
                .state
                .mouse
                .borrow()
                .get(&button)
                .map(|session| session.interactions.len()),
            InputChannel::Touch => self
                .state
                .touch
                .borrow()
                .as_ref()
                .map(|touch| touch.session.interactions.len()),
        }
    }

    // =========================================================================
    // Event entry points
    // =========================================================================

    /// Handle a mouse event, returning whether it was consumed
    ///
    /// An unconsumed event should get the host's default handling.
    pub fn handle_mouse(&self, event: &MouseEvent) -> bool {
        let pointer = PointerEvent::Mouse(event.clone());
        self.state.dispatching(|| match *event {
            MouseEvent::ButtonPressed { button, x, y, .. } => {
                self.mouse_down(button, &pointer, x, y)
            }
            MouseEvent::Moved { x, y, .. } => self.mouse_move(&pointer, x, y),
            MouseEvent::ButtonReleased { button, x, y, .. } => {
                self.mouse_up(button, &pointer, x, y)
            }
            MouseEvent::DoubleClicked { x, y, .. } => self.double_click(&pointer, x, y),
            MouseEvent::Left => {
                self.end_all_hover();
                false
            }
            MouseEvent::Entered => false,
        })
    }

    /// Handle a touch event, returning whether it was consumed
    ///
    /// Only one touch is tracked at a time; events for other touch ids are
    /// ignored.
    pub fn handle_touch(&self, event: &TouchEvent) -> bool {
        if !self.state.config.track_touch {
            return false;
        }
        let pointer = PointerEvent::Touch(event.clone());
        self.state.dispatching(|| match *event {
            TouchEvent::Started { id, x, y, .. } => self.touch_start(id, &pointer, x, y),
            TouchEvent::Moved { id, x, y, .. } => {
                let Some(mut session) = self.take_touch(id) else {
                    return false;
                };
                self.move_session(&mut session, &pointer, x, y);
                self.restore_touch(id, session);
                true
            }
            TouchEvent::Ended { id, x, y } => {
                let Some(session) = self.take_touch(id) else {
                    return false;
                };
                self.release_session(session, &pointer, x, y);
                let edit = self.state.edits.increment();
                tracing::debug!(touch = id, edit, "touch gesture ended");
                true
            }
            TouchEvent::Cancelled { id } => {
                let Some(session) = self.take_touch(id) else {
                    return false;
                };
                self.cancel_session(session, pointer.name());
                true
            }
        })
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    fn mouse_down(&self, button: MouseButton, event: &PointerEvent, x: f32, y: f32) -> bool {
        let stale = self.state.mouse.borrow_mut().remove(&button);
        if let Some(stale) = stale {
            tracing::warn!(
                ?button,
                x,
                y,
                "mouse down while a session is live for the button, canceling it"
            );
            self.cancel_session(stale, "missed mouse up");
        }

        let Some(session) = self.start_session(event, x, y) else {
            return false;
        };
        let displaced = self.state.mouse.borrow_mut().insert(button, session);
        if let Some(displaced) = displaced {
            self.cancel_session(displaced, "displaced");
        }
        true
    }

    fn mouse_move(&self, event: &PointerEvent, x: f32, y: f32) -> bool {
        let mut buttons: SmallVec<[MouseButton; 4]> =
            self.state.mouse.borrow().keys().copied().collect();
        if buttons.is_empty() {
            if self.state.config.track_hover {
                self.update_hover(event, x, y);
            }
            return false;
        }

        buttons.sort_by_key(MouseButton::index);
        for button in buttons {
            let session = self.state.mouse.borrow_mut().remove(&button);
            if let Some(mut session) = session {
                self.move_session(&mut session, event, x, y);
                self.restore_mouse(button, session);
            }
        }
        true
    }

    fn mouse_up(&self, button: MouseButton, event: &PointerEvent, x: f32, y: f32) -> bool {
        let session = self.state.mouse.borrow_mut().remove(&button);
        let Some(session) = session else {
            return false;
        };
        self.release_session(session, event, x, y);
        let edit = self.state.edits.increment();
        tracing::debug!(?button, edit, "mouse gesture ended");
        true
    }

    fn restore_mouse(&self, button: MouseButton, session: Session) {
        let occupied = self.state.mouse.borrow().contains_key(&button);
        if occupied {
            // A newer session started while this one was dispatching
            self.cancel_session(session, "superseded");
        } else {
            self.state.mouse.borrow_mut().insert(button, session);
        }
    }

    fn double_click(&self, event: &PointerEvent, x: f32, y: f32) -> bool {
        if self.state.overlay_contains(x, y) {
            return false;
        }
        for (_, provider) in self.state.snapshot() {
            let local = provider.to_local(x, y);
            if !local.inside {
                continue;
            }
            return match provider.handle_double_click(event, local.pos) {
                Ok(handled) => handled,
                Err(err) => {
                    tracing::error!(
                        event = event.name(),
                        x,
                        y,
                        provider = provider.label(),
                        error = %err,
                        "double click handler failed"
                    );
                    false
                }
            };
        }
        false
    }

    // =========================================================================
    // Touch
    // =========================================================================

    fn touch_start(&self, id: u64, event: &PointerEvent, x: f32, y: f32) -> bool {
        let stale = self.state.touch.borrow_mut().take();
        if let Some(stale) = stale {
            tracing::warn!(
                stale = stale.id,
                touch = id,
                "touch start while another touch is tracked, canceling it"
            );
            self.cancel_session(stale.session, "missed touch end");
        }

        let Some(session) = self.start_session(event, x, y) else {
            return false;
        };
        self.restore_touch(id, session);
        true
    }

    fn take_touch(&self, id: u64) -> Option<Session> {
        let mut touch = self.state.touch.borrow_mut();
        if touch.as_ref().is_some_and(|touch| touch.id == id) {
            touch.take().map(|touch| touch.session)
        } else {
            None
        }
    }

    fn restore_touch(&self, id: u64, session: Session) {
        let occupied = self.state.touch.borrow().is_some();
        if occupied {
            self.cancel_session(session, "superseded");
        } else {
            *self.state.touch.borrow_mut() = Some(TouchSession { id, session });
        }
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Offer a pointer down to the front-most in-bounds provider
    fn start_session(&self, event: &PointerEvent, x: f32, y: f32) -> Option<Session> {
        if self.state.overlay_contains(x, y) {
            tracing::trace!(x, y, "pointer down inside overlay rect, leaving it to the host");
            return None;
        }

        for (_, provider) in self.state.snapshot() {
            let local = provider.to_local(x, y);
            if !local.inside {
                continue;
            }

            let mut interactions = Vec::new();
            if let Err(err) = provider.handle_pointer_down(event, local.pos, &mut interactions) {
                tracing::error!(
                    event = event.name(),
                    x,
                    y,
                    provider = provider.label(),
                    error = %err,
                    "pointer down handler failed"
                );
            }
            if interactions.is_empty() {
                return None;
            }
            if self.state.config.resolve_exclusive_on_down {
                interactions = self.resolve_exclusive(provider.label(), interactions);
            }
            tracing::debug!(
                event = event.name(),
                provider = provider.label(),
                interactions = interactions.len(),
                "session started"
            );
            return Some(Session {
                provider,
                interactions,
            });
        }
        None
    }

    /// Within each exclusive group keep only the highest-priority interactions
    fn resolve_exclusive(
        &self,
        provider: &str,
        interactions: Vec<Box<dyn PointerInteraction>>,
    ) -> Vec<Box<dyn PointerInteraction>> {
        let mut best: FxHashMap<String, i32> = FxHashMap::default();
        for interaction in &interactions {
            if let Some(tag) = interaction.exclusive() {
                let priority = interaction.priority();
                best.entry(tag.to_owned())
                    .and_modify(|max| *max = (*max).max(priority))
                    .or_insert(priority);
            }
        }
        if best.is_empty() {
            return interactions;
        }

        let (keep, losers): (Vec<_>, Vec<_>) =
            interactions
                .into_iter()
                .partition(|interaction| match interaction.exclusive() {
                    Some(tag) => best
                        .get(tag)
                        .map_or(true, |max| interaction.priority() >= *max),
                    None => true,
                });
        for loser in losers {
            self.cancel_interaction(loser, provider, "outranked");
        }
        keep
    }

    fn move_session(&self, session: &mut Session, event: &PointerEvent, x: f32, y: f32) {
        let local = session.provider.to_local(x, y);
        let mut claimant = None;
        for (index, interaction) in session.interactions.iter_mut().enumerate() {
            match interaction.pointer_move(event, local.pos) {
                Ok(true) => {
                    claimant = Some(index);
                    break;
                }
                Ok(false) => {}
                Err(err) => tracing::error!(
                    event = event.name(),
                    x,
                    y,
                    provider = session.provider.label(),
                    kind = %interaction.kind(),
                    error = %err,
                    "interaction move failed"
                ),
            }
        }

        let Some(index) = claimant else {
            return;
        };
        if session.interactions.len() > 1 {
            let winner = session.interactions.remove(index);
            let losers: Vec<_> = session.interactions.drain(..).collect();
            for loser in losers {
                self.cancel_interaction(
                    loser,
                    session.provider.label(),
                    "claimed by another interaction",
                );
            }
            tracing::debug!(
                provider = session.provider.label(),
                kind = %winner.kind(),
                "interaction claimed the gesture"
            );
            session.interactions.push(winner);
        }
    }

    fn release_session(&self, mut session: Session, event: &PointerEvent, x: f32, y: f32) {
        let local = session.provider.to_local(x, y);
        for interaction in session.interactions.iter_mut() {
            if let Err(err) = interaction.release(event, local.pos) {
                tracing::error!(
                    event = event.name(),
                    x,
                    y,
                    provider = session.provider.label(),
                    kind = %interaction.kind(),
                    error = %err,
                    "interaction release failed"
                );
            }
        }
    }

    fn cancel_session(&self, session: Session, reason: &str) {
        tracing::debug!(
            provider = session.provider.label(),
            interactions = session.interactions.len(),
            reason,
            "session canceled"
        );
        let Session {
            provider,
            interactions,
        } = session;
        for interaction in interactions {
            self.cancel_interaction(interaction, provider.label(), reason);
        }
    }

    fn cancel_interaction(
        &self,
        mut interaction: Box<dyn PointerInteraction>,
        provider: &str,
        reason: &str,
    ) {
        if let Err(err) = interaction.cancel() {
            tracing::error!(
                provider,
                kind = %interaction.kind(),
                reason,
                error = %err,
                "interaction cancel failed"
            );
        }
    }

    // =========================================================================
    // Hover
    // =========================================================================

    fn update_hover(&self, event: &PointerEvent, x: f32, y: f32) {
        let mut inside = Vec::new();
        for (id, provider) in self.state.snapshot() {
            let local = provider.to_local(x, y);
            let top_hit = local.inside && inside.is_empty();
            if local.inside {
                inside.push(id);
            }
            provider.update_mouse_hover(event, local.pos, top_hit);
        }
        let left = self.state.hover.borrow_mut().update(inside);
        self.end_hover(left);
    }

    fn end_all_hover(&self) {
        if self.state.hover.borrow().is_empty() {
            return;
        }
        let left = self.state.hover.borrow_mut().clear();
        self.end_hover(left);
    }

    fn end_hover(&self, left: Vec<ProviderId>) {
        for id in left {
            if let Some(provider) = self.state.provider(id) {
                tracing::trace!(provider = provider.label(), "hover ended");
                provider.end_mouse_hover();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::interaction::Localized;

    /// Full-window provider that records the order it was asked about pointer downs
    struct Marker {
        name: &'static str,
        z: i32,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl InteractionProvider for Marker {
        fn z_index(&self) -> i32 {
            self.z
        }

        fn to_local(&self, x: f32, y: f32) -> Localized {
            Localized::outside(Point::new(x, y))
        }

        fn handle_pointer_down(
            &self,
            _event: &PointerEvent,
            _pos: Point,
            _into: &mut Vec<Box<dyn PointerInteraction>>,
        ) -> Result<()> {
            Ok(())
        }

        fn update_mouse_hover(&self, _event: &PointerEvent, _pos: Point, _top_hit: bool) {
            self.log.borrow_mut().push(self.name);
        }
    }

    fn marker(name: &'static str, z: i32, log: &Rc<RefCell<Vec<&'static str>>>) -> Rc<Marker> {
        Rc::new(Marker {
            name,
            z,
            log: log.clone(),
        })
    }

    #[test]
    fn test_providers_visited_by_z_then_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let manager = InteractionManager::default();
        let _a = manager.add_provider(marker("a", 1, &log));
        let _b = manager.add_provider(marker("b", 5, &log));
        let _c = manager.add_provider(marker("c", 1, &log));
        let _d = manager.add_provider(marker("d", 5, &log));

        manager.handle_mouse(&MouseEvent::moved(1.0, 1.0));
        assert_eq!(*log.borrow(), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_registration_during_dispatch_is_deferred() {
        let manager = InteractionManager::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let _a = manager.add_provider(marker("a", 0, &log));

        manager.state.dispatching(|| {
            let _late = manager.add_provider(marker("late", 9, &log));
            assert_eq!(manager.provider_count(), 1);
        });
        assert_eq!(manager.provider_count(), 2);
    }

    #[test]
    fn test_removal_during_dispatch_is_deferred() {
        let manager = InteractionManager::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = manager.add_provider(marker("a", 0, &log));

        manager.state.dispatching(|| {
            a.remove();
            assert_eq!(manager.provider_count(), 1);
        });
        assert_eq!(manager.provider_count(), 0);
    }

    #[test]
    fn test_unwinding_handler_closes_dispatch() {
        let manager = InteractionManager::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            manager.state.dispatching(|| {
                let _late = manager.add_provider(marker("late", 0, &log));
                panic!("handler bug");
            })
        }));
        assert!(unwound.is_err());
        assert_eq!(manager.state.dispatch_depth.get(), 0);

        // The change queued before the unwind lands with the next dispatch
        assert_eq!(manager.provider_count(), 0);
        manager.handle_mouse(&MouseEvent::Entered);
        assert_eq!(manager.provider_count(), 1);

        let _next = manager.add_provider(marker("next", 0, &log));
        assert_eq!(manager.provider_count(), 2);
    }
}
