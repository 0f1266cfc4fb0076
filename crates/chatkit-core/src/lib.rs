//! Core systems for Chatkit.
//!
//! This crate provides the foundation the Chatkit components are built on:
//!
//! - **Object Tree**: Parent/child composition of components by ID
//! - **Signal/Slot System**: Type-safe in-component notification
//! - **Property System**: Change-detecting and reflected properties
//! - **Event Routing**: Typed, bubbling events delivered along the tree
//!
//! # Routed Event Example
//!
//! ```
//! use chatkit_core::{EventInit, EventRouter, RoutedEvent};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Kind { Toggled }
//!
//! struct Toggled(bool);
//!
//! impl RoutedEvent for Toggled {
//!     type Kind = Kind;
//!     fn kind(&self) -> Kind { Kind::Toggled }
//!     fn init(&self) -> EventInit { EventInit::BUBBLES_COMPOSED }
//! }
//!
//! let router = EventRouter::<Toggled>::new();
//! let parent = router.tree().insert("shell", None).unwrap();
//! let child = router.tree().insert("header", Some(parent)).unwrap();
//!
//! let _guard = router.add_listener_scoped(parent, Kind::Toggled, |event, _| {
//!     println!("open = {}", event.0);
//! });
//! router.dispatch(child, &Toggled(true)).unwrap();
//! ```

mod error;
pub mod event;
pub mod logging;
pub mod object;
pub mod property;
pub mod signal;

pub use error::SignalError;
pub use event::{
    DispatchResult, EventContext, EventInit, EventRouter, ListenerGuard, ListenerId, RoutedEvent,
};
pub use logging::{ObjectTreeDebug, TreeStyle};
pub use object::{ObjectError, ObjectId, ObjectResult, ObjectTree};
pub use property::{Property, ReflectedProperty};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
