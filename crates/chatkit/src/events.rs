//! Events emitted by Chatkit components.
//!
//! Every component event is a variant of [`ChatEvent`] and is routed through a
//! [`ChatRouter`]. Listeners subscribe by [`ChatEventKind`]; the string name of
//! an event only matters to hosts that bridge into a string-keyed event system.

use std::sync::{Arc, Weak};

use chatkit_core::{DispatchResult, EventInit, EventRouter, ObjectId, RoutedEvent};
use serde::Serialize;

use crate::carousel::CarouselResponse;
use crate::logging::targets;

/// The router type shared by all Chatkit components.
pub type ChatRouter = EventRouter<ChatEvent>;

/// Name of the header toggle event.
pub const HEADER_TOGGLE_EVENT: &str = "workspace-header-toggle";

/// Suffix of the carousel change event, appended to the component namespace.
pub const CAROUSEL_CHANGE_SUFFIX: &str = "carousel-onchange";

/// Detail of a header toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderToggle {
    /// Whether the header disclosure is now open.
    pub open: bool,
}

/// A component event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A carousel finished a transition.
    CarouselChange(CarouselResponse),
    /// A workspace shell header was expanded or collapsed.
    HeaderToggle(HeaderToggle),
}

/// Tag of a [`ChatEvent`], used to subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatEventKind {
    /// [`ChatEvent::CarouselChange`].
    CarouselChange,
    /// [`ChatEvent::HeaderToggle`].
    HeaderToggle,
}

impl ChatEvent {
    /// The event's external name under the given component namespace.
    pub fn name(&self, prefix: &str) -> String {
        match self {
            Self::CarouselChange(_) => format!("{prefix}-{CAROUSEL_CHANGE_SUFFIX}"),
            Self::HeaderToggle(_) => HEADER_TOGGLE_EVENT.to_string(),
        }
    }

    /// The event detail serialized as JSON.
    pub fn detail_json(&self) -> serde_json::Result<String> {
        match self {
            Self::CarouselChange(response) => serde_json::to_string(response),
            Self::HeaderToggle(toggle) => serde_json::to_string(toggle),
        }
    }
}

impl RoutedEvent for ChatEvent {
    type Kind = ChatEventKind;

    fn kind(&self) -> ChatEventKind {
        match self {
            Self::CarouselChange(_) => ChatEventKind::CarouselChange,
            Self::HeaderToggle(_) => ChatEventKind::HeaderToggle,
        }
    }

    fn init(&self) -> EventInit {
        EventInit::BUBBLES_COMPOSED
    }
}

/// Dispatches events at one component's node.
///
/// Holds the router weakly so that callbacks stored inside components never
/// keep the tree alive.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    router: Weak<ChatRouter>,
    node: ObjectId,
}

impl EventEmitter {
    pub(crate) fn new(router: &Arc<ChatRouter>, node: ObjectId) -> Self {
        Self {
            router: Arc::downgrade(router),
            node,
        }
    }

    /// The node events are dispatched at.
    pub fn node(&self) -> ObjectId {
        self.node
    }

    /// Dispatch `event`. Returns `None` when the router or node is gone.
    pub fn emit(&self, event: &ChatEvent) -> Option<DispatchResult> {
        let Some(router) = self.router.upgrade() else {
            tracing::trace!(target: targets::COMPONENT, node = %self.node, "router dropped, event discarded");
            return None;
        };
        match router.dispatch(self.node, event) {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::trace!(target: targets::COMPONENT, node = %self.node, %err, "event target gone");
                None
            }
        }
    }
}
