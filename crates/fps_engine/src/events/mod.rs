//! Filtered event callbacks
//!
//! Key principles:
//! - Every event kind has its own ordered subscription list
//! - Filters are per-field: wildcard or exact value
//! - Every matching subscription runs; nothing consumes an event
//! - Dispatch is synchronous, on the thread that polls the platform

mod filter;
mod registry;
mod types;

pub use filter::{
    CursorEnterFilter, CursorMoveFilter, EventFilter, Filter, FramebufferResizeFilter, KeyFilter,
    MouseButtonFilter, ScrollFilter,
};
pub use registry::{EventCallback, EventRegistry, Subscription, SubscriptionList};
pub use types::{
    CursorEnterEvent, CursorMoveEvent, FramebufferResizeEvent, HostEvent, KeyEvent,
    MouseButtonEvent, ScrollEvent,
};
