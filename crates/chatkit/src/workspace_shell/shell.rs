//! Workspace shell layout.

use std::fmt;
use std::sync::Arc;

use chatkit_core::{ListenerGuard, ObjectId, ReflectedProperty};

use crate::component::{Component, ComponentBase};
use crate::config::{DEFAULT_PREFIX, ShellConfig};
use crate::error::Result;
use crate::events::{ChatEvent, ChatEventKind, ChatRouter};
use crate::logging::targets;
use crate::render::RenderNode;

/// Named regions of the shell, in render order.
pub const SHELL_SLOTS: [&str; 5] = ["toolbar", "notification", "header", "body", "footer"];

/// Layout frame with five named regions.
///
/// While connected, the shell listens for [`ChatEvent::HeaderToggle`] from any
/// descendant and mirrors the latest `open` value in its reflected
/// `header-open` attribute.
pub struct WorkspaceShell {
    base: ComponentBase,
    header_open: Arc<ReflectedProperty<bool>>,
    header_listener: Option<ListenerGuard<ChatEvent>>,
}

impl WorkspaceShell {
    /// Create a shell in the default namespace.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Create a shell in the given component namespace.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            base: ComponentBase::new(format!("{prefix}-workspace-shell")),
            header_open: Arc::new(ReflectedProperty::new("header-open", false)),
            header_listener: None,
        }
    }

    /// Create a shell from configuration.
    pub fn from_config(prefix: &str, config: &ShellConfig) -> Self {
        Self::with_prefix(prefix).with_header_open(config.header_open)
    }

    /// Whether the header is expanded, as last reported.
    pub fn header_open(&self) -> bool {
        self.header_open.get()
    }

    /// Set the header state.
    pub fn set_header_open(&mut self, open: bool) {
        if self.header_open.set(open) {
            self.base.update();
        }
    }

    /// Set the header state using builder pattern.
    pub fn with_header_open(mut self, open: bool) -> Self {
        self.set_header_open(open);
        self
    }

    /// Attributes reflected onto the shell's host element.
    pub fn reflected_attributes(&self) -> Vec<(&'static str, String)> {
        self.header_open.reflect().into_iter().collect()
    }

    /// Whether the header toggle listener is attached.
    pub fn is_listening(&self) -> bool {
        self.header_listener.is_some()
    }
}

impl Default for WorkspaceShell {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WorkspaceShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceShell")
            .field("base", &self.base)
            .field("header_open", &self.header_open())
            .field("listening", &self.is_listening())
            .finish()
    }
}

impl Component for WorkspaceShell {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&self) -> RenderNode {
        RenderNode::Fragment(SHELL_SLOTS.iter().map(|slot| RenderNode::named_slot(*slot)).collect())
    }

    fn connected_callback(&mut self, router: &Arc<ChatRouter>, parent: Option<ObjectId>) -> Result<ObjectId> {
        let id = self.base.connect(router, parent)?;

        let header_open = self.header_open.clone();
        let update = self.base.update_handle();
        let guard = router.add_listener_scoped(id, ChatEventKind::HeaderToggle, move |event, _| {
            if let ChatEvent::HeaderToggle(toggle) = event {
                header_open.set(toggle.open);
                update.request();
                tracing::trace!(target: targets::WORKSPACE_SHELL, open = toggle.open, "header state mirrored");
            }
        });
        self.header_listener = Some(guard);
        tracing::debug!(target: targets::WORKSPACE_SHELL, node = %id, "header toggle listener attached");
        Ok(id)
    }

    fn disconnected_callback(&mut self) {
        if self.header_listener.take().is_some() {
            tracing::debug!(target: targets::WORKSPACE_SHELL, "header toggle listener detached");
        }
        self.base.disconnect();
    }
}

static_assertions::assert_impl_all!(WorkspaceShell: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventEmitter, HeaderToggle};

    #[test]
    fn test_render_slots_in_order() {
        let tree = WorkspaceShell::new().render();
        assert_eq!(
            tree.slot_names(),
            vec![Some("toolbar"), Some("notification"), Some("header"), Some("body"), Some("footer")]
        );
        assert!(tree.children().iter().all(|node| matches!(node, RenderNode::Slot(_))));
        assert_eq!(tree.elements().count(), 0);
    }

    #[test]
    fn test_mirrors_toggle_from_self() {
        let router = ChatRouter::new();
        let mut shell = WorkspaceShell::new();
        let id = shell.connected_callback(&router, None).unwrap();
        assert!(!shell.header_open());

        let emitter = EventEmitter::new(&router, id);
        emitter.emit(&ChatEvent::HeaderToggle(HeaderToggle { open: true }));
        assert!(shell.header_open());
        assert_eq!(shell.reflected_attributes(), vec![("header-open", String::new())]);

        emitter.emit(&ChatEvent::HeaderToggle(HeaderToggle { open: false }));
        assert!(!shell.header_open());
        assert!(shell.reflected_attributes().is_empty());
    }

    #[test]
    fn test_disconnect_releases_listener() {
        let router = ChatRouter::new();
        let mut shell = WorkspaceShell::new();
        shell.connected_callback(&router, None).unwrap();
        assert_eq!(router.listener_count(), 1);

        shell.disconnected_callback();
        assert!(!shell.is_listening());
        assert_eq!(router.listener_count(), 0);
    }

    #[test]
    fn test_connect_twice_keeps_one_listener() {
        let router = ChatRouter::new();
        let mut shell = WorkspaceShell::new();
        shell.connected_callback(&router, None).unwrap();
        assert!(shell.connected_callback(&router, None).is_err());
        assert_eq!(router.listener_count(), 1);
    }
}
