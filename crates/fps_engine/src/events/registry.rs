//! Filtered callback registry
//!
//! One [`SubscriptionList`] per event kind, each backed by a
//! [`DynamicArray`]. Dispatch walks the whole list in registration order and
//! runs every subscription whose filter matches; there is no "consumed"
//! signal, so global listeners and narrowly filtered ones never interfere.
//!
//! The registry is generic over the context `C` handed to callbacks. The
//! engine uses its `Scene`; tests use whatever is convenient.

use super::filter::{
    CursorEnterFilter, CursorMoveFilter, EventFilter, Filter, FramebufferResizeFilter, KeyFilter,
    MouseButtonFilter, ScrollFilter,
};
use super::types::HostEvent;
use crate::foundation::collections::{ArrayResult, DynamicArray};
use crate::input::{Action, KeyCode, Modifiers, MouseButton};
use crate::platform::WindowId;

/// Boxed callback for events of type `E`, receiving the dispatch context
pub type EventCallback<C, E> = Box<dyn FnMut(&mut C, &E)>;

/// A filter paired with the callback it guards
pub struct Subscription<F: EventFilter, C> {
    /// Filter every incoming event is tested against
    pub filter: F,
    callback: Option<EventCallback<C, F::Event>>,
}

impl<F: EventFilter, C> Subscription<F, C> {
    /// Subscription with a callback
    pub fn new(filter: F, callback: EventCallback<C, F::Event>) -> Self {
        Self {
            filter,
            callback: Some(callback),
        }
    }

    /// Subscription that matches but never runs anything
    pub const fn without_callback(filter: F) -> Self {
        Self { filter, callback: None }
    }

    /// Run the callback if the filter matches; returns whether it ran
    fn fire(&mut self, ctx: &mut C, event: &F::Event) -> bool {
        if !self.filter.matches(event) {
            return false;
        }
        match self.callback.as_mut() {
            Some(callback) => {
                callback(ctx, event);
                true
            }
            None => false,
        }
    }
}

impl<F: EventFilter + std::fmt::Debug, C> std::fmt::Debug for Subscription<F, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("filter", &self.filter)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Ordered subscriptions for one event kind
pub struct SubscriptionList<F: EventFilter, C> {
    name: &'static str,
    subscriptions: DynamicArray<Subscription<F, C>>,
}

impl<F: EventFilter + std::fmt::Debug, C> SubscriptionList<F, C> {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            subscriptions: DynamicArray::new(),
        }
    }

    fn init(&mut self) -> ArrayResult<()> {
        self.subscriptions.init().map_err(|e| {
            log::error!("failed to allocate memory for {} callback array", self.name);
            e
        })
    }

    /// Number of registered subscriptions
    pub const fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether nothing is registered
    pub const fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Append a subscription
    pub fn register(&mut self, subscription: Subscription<F, C>) -> ArrayResult<()> {
        let filter = format!("{:?}", subscription.filter);
        self.subscriptions.push(subscription).map_err(|e| {
            log::error!("failed to push {} callback onto array: {e}", self.name);
            e
        })?;
        log::debug!("{} callback #{} registered: {filter}", self.name, self.subscriptions.len());
        Ok(())
    }

    /// Run every matching subscription in registration order
    ///
    /// Returns how many callbacks ran.
    pub fn dispatch(&mut self, ctx: &mut C, event: &F::Event) -> usize {
        let mut fired = 0;
        for idx in 0..self.subscriptions.len() {
            match self.subscriptions.get_mut(idx) {
                Ok(Some(subscription)) => {
                    if subscription.fire(ctx, event) {
                        fired += 1;
                    }
                }
                Ok(None) => log::error!("{} callback #{idx} is empty", self.name),
                Err(e) => {
                    log::error!("{} callback array is unusable: {e}", self.name);
                    break;
                }
            }
        }
        fired
    }

    fn destroy(&mut self) -> usize {
        self.subscriptions.destroy_deep()
    }
}

/// Every event kind's subscriptions
pub struct EventRegistry<C> {
    key: SubscriptionList<KeyFilter, C>,
    cursor_move: SubscriptionList<CursorMoveFilter, C>,
    cursor_enter: SubscriptionList<CursorEnterFilter, C>,
    mouse_button: SubscriptionList<MouseButtonFilter, C>,
    scroll: SubscriptionList<ScrollFilter, C>,
    framebuffer_resize: SubscriptionList<FramebufferResizeFilter, C>,
}

impl<C> EventRegistry<C> {
    /// Create a registry whose lists are not yet allocated
    pub const fn new() -> Self {
        Self {
            key: SubscriptionList::new("key"),
            cursor_move: SubscriptionList::new("cursor move"),
            cursor_enter: SubscriptionList::new("cursor enter"),
            mouse_button: SubscriptionList::new("mouse button"),
            scroll: SubscriptionList::new("scroll"),
            framebuffer_resize: SubscriptionList::new("framebuffer resize"),
        }
    }

    /// Allocate every list
    ///
    /// Stops at the first failure; lists allocated so far stay allocated until
    /// [`EventRegistry::destroy`].
    pub fn init(&mut self) -> ArrayResult<()> {
        self.key.init()?;
        self.cursor_move.init()?;
        self.cursor_enter.init()?;
        self.mouse_button.init()?;
        self.scroll.init()?;
        self.framebuffer_resize.init()?;
        log::debug!("initialized callback arrays");
        Ok(())
    }

    /// Whether [`EventRegistry::init`] has allocated the lists
    pub const fn is_initialized(&self) -> bool {
        self.framebuffer_resize.subscriptions.is_initialized()
    }

    /// Release every subscription; safe to call repeatedly or before `init`
    pub fn destroy(&mut self) -> usize {
        let released = self.key.destroy()
            + self.cursor_move.destroy()
            + self.cursor_enter.destroy()
            + self.mouse_button.destroy()
            + self.scroll.destroy()
            + self.framebuffer_resize.destroy();
        log::debug!("callback arrays destroyed ({released} subscriptions released)");
        released
    }

    /// Total subscriptions across all kinds
    pub const fn len(&self) -> usize {
        self.key.len()
            + self.cursor_move.len()
            + self.cursor_enter.len()
            + self.mouse_button.len()
            + self.scroll.len()
            + self.framebuffer_resize.len()
    }

    /// Whether no subscriptions are registered
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to key events
    pub fn register_key(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        key: impl Into<Filter<KeyCode>>,
        scancode: impl Into<Filter<i32>>,
        action: impl Into<Filter<Action>>,
        mods: impl Into<Filter<Modifiers>>,
        callback: EventCallback<C, super::KeyEvent>,
    ) -> ArrayResult<()> {
        let filter = KeyFilter {
            window: window.into(),
            key: key.into(),
            scancode: scancode.into(),
            action: action.into(),
            mods: mods.into(),
        };
        self.key.register(Subscription::new(filter, callback))
    }

    /// Subscribe to cursor movement
    pub fn register_cursor_move(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        callback: EventCallback<C, super::CursorMoveEvent>,
    ) -> ArrayResult<()> {
        let filter = CursorMoveFilter { window: window.into() };
        self.cursor_move.register(Subscription::new(filter, callback))
    }

    /// Subscribe to cursor enter/leave
    pub fn register_cursor_enter(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        entered: impl Into<Filter<bool>>,
        callback: EventCallback<C, super::CursorEnterEvent>,
    ) -> ArrayResult<()> {
        let filter = CursorEnterFilter {
            window: window.into(),
            entered: entered.into(),
        };
        self.cursor_enter.register(Subscription::new(filter, callback))
    }

    /// Subscribe to mouse buttons
    pub fn register_mouse_button(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        button: impl Into<Filter<MouseButton>>,
        action: impl Into<Filter<Action>>,
        mods: impl Into<Filter<Modifiers>>,
        callback: EventCallback<C, super::MouseButtonEvent>,
    ) -> ArrayResult<()> {
        let filter = MouseButtonFilter {
            window: window.into(),
            button: button.into(),
            action: action.into(),
            mods: mods.into(),
        };
        self.mouse_button.register(Subscription::new(filter, callback))
    }

    /// Subscribe to scrolling
    pub fn register_scroll(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        callback: EventCallback<C, super::ScrollEvent>,
    ) -> ArrayResult<()> {
        let filter = ScrollFilter { window: window.into() };
        self.scroll.register(Subscription::new(filter, callback))
    }

    /// Subscribe to framebuffer resizes
    pub fn register_framebuffer_resize(
        &mut self,
        window: impl Into<Filter<WindowId>>,
        callback: EventCallback<C, super::FramebufferResizeEvent>,
    ) -> ArrayResult<()> {
        let filter = FramebufferResizeFilter { window: window.into() };
        self.framebuffer_resize.register(Subscription::new(filter, callback))
    }

    /// Key subscriptions, for inspection or registering pre-built entries
    pub fn key_subscriptions(&mut self) -> &mut SubscriptionList<KeyFilter, C> {
        &mut self.key
    }

    /// Route a host event to its kind's subscriptions
    ///
    /// Returns how many callbacks ran.
    pub fn dispatch(&mut self, ctx: &mut C, event: &HostEvent) -> usize {
        log::trace!("dispatching {event:?}");
        match event {
            HostEvent::Key(e) => self.key.dispatch(ctx, e),
            HostEvent::CursorMove(e) => self.cursor_move.dispatch(ctx, e),
            HostEvent::CursorEnter(e) => self.cursor_enter.dispatch(ctx, e),
            HostEvent::MouseButton(e) => self.mouse_button.dispatch(ctx, e),
            HostEvent::Scroll(e) => self.scroll.dispatch(ctx, e),
            HostEvent::FramebufferResize(e) => self.framebuffer_resize.dispatch(ctx, e),
        }
    }
}

impl<C> Default for EventRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
