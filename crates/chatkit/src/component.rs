//! Component lifecycle.
//!
//! Components follow a small, explicit lifecycle:
//!
//! 1. **Connect** - [`Component::connected_callback`] places the component's
//!    node in a [`ChatRouter`]'s tree under an optional parent.
//! 2. **Update** - [`Component::perform_update`] renders when an update is
//!    pending. After the first render, [`Component::first_updated`] runs once;
//!    this is where components look up rendered parts and start listening.
//! 3. **Disconnect** - [`Component::disconnected_callback`] releases every
//!    listener the component registered and removes its node.
//!
//! State changes request an update through an [`UpdateHandle`]; there is no
//! implicit dependency tracking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chatkit_core::ObjectId;

use crate::error::{Error, Result};
use crate::events::{ChatRouter, EventEmitter};
use crate::logging::targets;
use crate::render::RenderNode;

/// Shared "render needed" flag.
///
/// Cloned into callbacks so that state changes made outside `&mut self`
/// (engine callbacks, routed listeners) can still schedule a render.
#[derive(Debug, Clone)]
pub struct UpdateHandle(Arc<AtomicBool>);

impl UpdateHandle {
    fn new(pending: bool) -> Self {
        Self(Arc::new(AtomicBool::new(pending)))
    }

    /// Mark the component as needing a render.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a render is pending.
    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// State common to every component.
#[derive(Debug)]
pub struct ComponentBase {
    tag: String,
    router: Option<Arc<ChatRouter>>,
    id: Option<ObjectId>,
    update: UpdateHandle,
    has_updated: bool,
}

impl ComponentBase {
    /// Create an unconnected base for a component with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            router: None,
            id: None,
            update: UpdateHandle::new(true),
            has_updated: false,
        }
    }

    /// The component's tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The component's node, while connected.
    pub fn object_id(&self) -> Option<ObjectId> {
        self.id
    }

    /// Whether the component is attached to a tree.
    pub fn is_connected(&self) -> bool {
        self.id.is_some()
    }

    /// The router this component is attached to.
    pub fn router(&self) -> Option<&Arc<ChatRouter>> {
        self.router.as_ref()
    }

    /// An emitter for this component's node, while connected.
    pub fn emitter(&self) -> Option<EventEmitter> {
        match (&self.router, self.id) {
            (Some(router), Some(id)) => Some(EventEmitter::new(router, id)),
            _ => None,
        }
    }

    /// The component's update flag.
    pub fn update_handle(&self) -> UpdateHandle {
        self.update.clone()
    }

    /// Request a render.
    pub fn update(&self) {
        self.update.request();
    }

    /// Whether the first render has happened.
    pub fn has_updated(&self) -> bool {
        self.has_updated
    }

    /// Insert this component's node into `router`'s tree.
    pub fn connect(&mut self, router: &Arc<ChatRouter>, parent: Option<ObjectId>) -> Result<ObjectId> {
        if self.id.is_some() {
            return Err(Error::AlreadyConnected {
                tag: self.tag.clone(),
            });
        }
        let id = router.tree().insert(self.tag.clone(), parent)?;
        self.router = Some(router.clone());
        self.id = Some(id);
        tracing::debug!(target: targets::COMPONENT, tag = %self.tag, %id, "connected");
        Ok(id)
    }

    /// Remove this component's node (and subtree) from its tree.
    ///
    /// Safe to call when not connected, or when an ancestor already removed
    /// the node.
    pub fn disconnect(&mut self) {
        let (Some(router), Some(id)) = (self.router.take(), self.id.take()) else {
            return;
        };
        if let Err(err) = router.remove_node(id) {
            tracing::trace!(target: targets::COMPONENT, tag = %self.tag, %id, %err, "node already removed");
        }
        tracing::debug!(target: targets::COMPONENT, tag = %self.tag, %id, "disconnected");
    }

    fn begin_update(&mut self) -> Option<bool> {
        if !self.update.take() {
            return None;
        }
        let first = !self.has_updated;
        self.has_updated = true;
        Some(first)
    }
}

/// The component lifecycle.
pub trait Component: Send + Sync {
    /// Access the shared component state.
    fn base(&self) -> &ComponentBase;

    /// Mutable access to the shared component state.
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Render the current state. Must not mutate anything.
    fn render(&self) -> RenderNode;

    /// Called once, after the first render.
    fn first_updated(&mut self) {}

    /// Attach to `router`'s tree under `parent`.
    fn connected_callback(&mut self, router: &Arc<ChatRouter>, parent: Option<ObjectId>) -> Result<ObjectId> {
        self.base_mut().connect(router, parent)
    }

    /// Detach from the tree, releasing listeners.
    fn disconnected_callback(&mut self) {
        self.base_mut().disconnect();
    }

    /// Render if an update is pending, running `first_updated` after the
    /// first render.
    fn perform_update(&mut self) -> Option<RenderNode> {
        let first = self.base_mut().begin_update()?;
        let tree = self.render();
        if first {
            tracing::debug!(target: targets::COMPONENT, tag = %self.base().tag(), "first update");
            self.first_updated();
        }
        Some(tree)
    }

    /// The component's node, while connected.
    fn object_id(&self) -> Option<ObjectId> {
        self.base().object_id()
    }
}
