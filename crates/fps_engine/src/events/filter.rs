//! Subscription filters
//!
//! Each event kind has a filter struct whose fields are either a wildcard
//! ([`Filter::Any`]) or an exact value. A subscription fires only when every
//! field of its filter passes. Matching is a pure function of filter and
//! event, so it is tested here without any registry or window.

use super::types::{
    CursorEnterEvent, CursorMoveEvent, FramebufferResizeEvent, KeyEvent, MouseButtonEvent,
    ScrollEvent,
};
use crate::input::{Action, KeyCode, Modifiers, MouseButton};
use crate::platform::WindowId;

/// One filter field: a wildcard or a required value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter<T> {
    /// Matches every value
    Any,
    /// Matches only this value
    Exactly(T),
}

impl<T: PartialEq> Filter<T> {
    /// Whether `value` passes this field
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(expected) => expected == value,
        }
    }
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self::Any
    }
}

impl<T> From<T> for Filter<T> {
    fn from(value: T) -> Self {
        Self::Exactly(value)
    }
}

/// Filter for one event kind
pub trait EventFilter {
    /// The event this filter inspects
    type Event;

    /// Whether every field of the filter passes for `event`
    fn matches(&self, event: &Self::Event) -> bool;
}

/// Key subscription filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyFilter {
    /// Window scope
    pub window: Filter<WindowId>,
    /// Key
    pub key: Filter<KeyCode>,
    /// Scancode
    pub scancode: Filter<i32>,
    /// Action
    pub action: Filter<Action>,
    /// Exact modifier set
    pub mods: Filter<Modifiers>,
}

impl EventFilter for KeyFilter {
    type Event = KeyEvent;

    fn matches(&self, event: &KeyEvent) -> bool {
        self.window.matches(&event.window)
            && self.key.matches(&event.key)
            && self.scancode.matches(&event.scancode)
            && self.action.matches(&event.action)
            && self.mods.matches(&event.mods)
    }
}

/// Cursor movement subscription filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorMoveFilter {
    /// Window scope
    pub window: Filter<WindowId>,
}

impl EventFilter for CursorMoveFilter {
    type Event = CursorMoveEvent;

    fn matches(&self, event: &CursorMoveEvent) -> bool {
        self.window.matches(&event.window)
    }
}

/// Cursor enter/leave subscription filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorEnterFilter {
    /// Window scope
    pub window: Filter<WindowId>,
    /// Enter (`true`) or leave (`false`)
    pub entered: Filter<bool>,
}

impl EventFilter for CursorEnterFilter {
    type Event = CursorEnterEvent;

    fn matches(&self, event: &CursorEnterEvent) -> bool {
        self.window.matches(&event.window) && self.entered.matches(&event.entered)
    }
}

/// Mouse button subscription filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseButtonFilter {
    /// Window scope
    pub window: Filter<WindowId>,
    /// Button
    pub button: Filter<MouseButton>,
    /// Action
    pub action: Filter<Action>,
    /// Exact modifier set
    pub mods: Filter<Modifiers>,
}

impl EventFilter for MouseButtonFilter {
    type Event = MouseButtonEvent;

    fn matches(&self, event: &MouseButtonEvent) -> bool {
        self.window.matches(&event.window)
            && self.button.matches(&event.button)
            && self.action.matches(&event.action)
            && self.mods.matches(&event.mods)
    }
}

/// Scroll subscription filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollFilter {
    /// Window scope
    pub window: Filter<WindowId>,
}

impl EventFilter for ScrollFilter {
    type Event = ScrollEvent;

    fn matches(&self, event: &ScrollEvent) -> bool {
        self.window.matches(&event.window)
    }
}

/// Framebuffer resize subscription filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramebufferResizeFilter {
    /// Window scope
    pub window: Filter<WindowId>,
}

impl EventFilter for FramebufferResizeFilter {
    type Event = FramebufferResizeEvent;

    fn matches(&self, event: &FramebufferResizeEvent) -> bool {
        self.window.matches(&event.window)
    }
}
