//! Workspace shell header.

use std::fmt;
use std::sync::{Arc, Weak};

use chatkit_core::{ConnectionGuard, ReflectedProperty};

use super::disclosure::Disclosure;
use crate::component::{Component, ComponentBase};
use crate::config::{DEFAULT_PREFIX, HeaderConfig};
use crate::events::{ChatEvent, HeaderToggle};
use crate::icon::Icon;
use crate::logging::targets;
use crate::render::{Element, RenderNode};

/// Default value of the reflected `slot` attribute.
pub const DEFAULT_HEADER_SLOT: &str = "header";

/// The collapsible header of a workspace shell.
///
/// Renders a disclosure with an optional title and subtitle. Each time the
/// disclosure is expanded or collapsed the header dispatches
/// [`ChatEvent::HeaderToggle`] carrying the disclosure's live open state; the
/// event bubbles to the enclosing [`WorkspaceShell`](super::WorkspaceShell).
///
/// An empty title or subtitle is treated as absent.
pub struct WorkspaceShellHeader {
    base: ComponentBase,
    prefix: String,
    title_text: Option<String>,
    sub_title_text: Option<String>,
    slot: ReflectedProperty<String>,
    disclosure: Option<Arc<Disclosure>>,
    toggle_connection: Option<ConnectionGuard<()>>,
}

impl WorkspaceShellHeader {
    /// Create a header in the default namespace.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Create a header in the given component namespace.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            base: ComponentBase::new(format!("{prefix}-workspace-shell-header")),
            prefix,
            title_text: None,
            sub_title_text: None,
            slot: ReflectedProperty::new("slot", DEFAULT_HEADER_SLOT.to_string()),
            disclosure: None,
            toggle_connection: None,
        }
    }

    /// Create a header from configuration.
    pub fn from_config(prefix: &str, config: &HeaderConfig) -> Self {
        let mut header = Self::with_prefix(prefix);
        header.title_text = non_empty(config.title_text.clone());
        header.sub_title_text = non_empty(config.sub_title_text.clone());
        header.slot.set(config.slot.clone());
        header
    }

    /// The title, if set.
    pub fn title_text(&self) -> Option<&str> {
        self.title_text.as_deref()
    }

    /// Set the title. An empty string clears it.
    pub fn set_title_text(&mut self, text: impl Into<String>) {
        self.title_text = non_empty(Some(text.into()));
        self.base.update();
    }

    /// Set the title using builder pattern.
    pub fn with_title_text(mut self, text: impl Into<String>) -> Self {
        self.set_title_text(text);
        self
    }

    /// The subtitle, if set.
    pub fn sub_title_text(&self) -> Option<&str> {
        self.sub_title_text.as_deref()
    }

    /// Set the subtitle. An empty string clears it.
    pub fn set_sub_title_text(&mut self, text: impl Into<String>) {
        self.sub_title_text = non_empty(Some(text.into()));
        self.base.update();
    }

    /// Set the subtitle using builder pattern.
    pub fn with_sub_title_text(mut self, text: impl Into<String>) -> Self {
        self.set_sub_title_text(text);
        self
    }

    /// The slot the header projects into.
    pub fn slot(&self) -> String {
        self.slot.get()
    }

    /// Set the slot.
    pub fn set_slot(&mut self, slot: impl Into<String>) {
        if self.slot.set(slot.into()) {
            self.base.update();
        }
    }

    /// Set the slot using builder pattern.
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.set_slot(slot);
        self
    }

    /// Attributes reflected onto the header's host element.
    pub fn reflected_attributes(&self) -> Vec<(&'static str, String)> {
        self.slot.reflect().into_iter().collect()
    }

    /// The rendered disclosure, available after the first update while
    /// connected.
    pub fn disclosure(&self) -> Option<&Arc<Disclosure>> {
        self.disclosure.as_ref()
    }

    /// Whether the toggle listener is attached.
    pub fn is_listening(&self) -> bool {
        self.toggle_connection.is_some()
    }

    fn attach_toggle_listener(&mut self) {
        let Some(disclosure) = &self.disclosure else {
            tracing::debug!(target: targets::WORKSPACE_SHELL, "no disclosure, toggle listener not attached");
            return;
        };

        let weak: Weak<Disclosure> = Arc::downgrade(disclosure);
        let emitter = self.base.emitter();
        let update = self.base.update_handle();
        let guard = disclosure.toggle_signal().connect_scoped(move |_| {
            let open = weak.upgrade().is_some_and(|d| d.is_open());
            update.request();
            tracing::debug!(target: targets::WORKSPACE_SHELL, open, "header toggled");
            if let Some(emitter) = &emitter {
                emitter.emit(&ChatEvent::HeaderToggle(HeaderToggle { open }));
            }
        });
        self.toggle_connection = Some(guard);
        tracing::debug!(target: targets::WORKSPACE_SHELL, "toggle listener attached");
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}

impl Default for WorkspaceShellHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WorkspaceShellHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceShellHeader")
            .field("base", &self.base)
            .field("title_text", &self.title_text)
            .field("sub_title_text", &self.sub_title_text)
            .field("slot", &self.slot.get())
            .field("listening", &self.is_listening())
            .finish()
    }
}

impl Component for WorkspaceShellHeader {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&self) -> RenderNode {
        let block = format!("{}-workspace-shell__header", self.prefix);
        let open = self.disclosure.as_ref().is_some_and(|d| d.is_open());

        let summary = self.title_text.as_deref().map(|title| {
            Element::new("summary")
                .class(format!("{block}-summary"))
                .child(
                    Element::new("h1")
                        .class(format!("{block}-title"))
                        .child(RenderNode::text(title)),
                )
                .child(
                    Element::new("span")
                        .class(format!("{block}-chevron"))
                        .child(Icon::ChevronDown16.render(None)),
                )
        });

        let sub_title = self.sub_title_text.as_deref().map(|sub_title| {
            Element::new("h3")
                .class(format!("{block}-sub-title"))
                .child(RenderNode::text(sub_title))
        });

        Element::new("details")
            .class(format!("{block}-content"))
            .bool_attr("open", open)
            .optional_child(summary)
            .optional_child(sub_title)
            .child(RenderNode::named_slot("header-description"))
            .child(RenderNode::named_slot("header-action"))
            .into()
    }

    fn first_updated(&mut self) {
        if self.base.is_connected() {
            self.disclosure = Some(Arc::new(Disclosure::default()));
        }
        self.attach_toggle_listener();
    }

    fn disconnected_callback(&mut self) {
        if let Some(guard) = self.toggle_connection.take() {
            if let Err(err) = guard.disconnect() {
                tracing::trace!(target: targets::WORKSPACE_SHELL, %err, "toggle listener already gone");
            }
            tracing::debug!(target: targets::WORKSPACE_SHELL, "toggle listener detached");
        }
        self.base.disconnect();
    }
}

static_assertions::assert_impl_all!(WorkspaceShellHeader: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ChatEventKind, ChatRouter};
    use parking_lot::Mutex;

    fn connected_header() -> (Arc<ChatRouter>, WorkspaceShellHeader) {
        let router = ChatRouter::new();
        let mut header = WorkspaceShellHeader::new().with_title_text("Workspace");
        header.connected_callback(&router, None).unwrap();
        header.perform_update();
        (router, header)
    }

    #[test]
    fn test_toggle_dispatches_live_state() {
        let (router, header) = connected_header();
        let id = header.object_id().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        router.add_listener(id, ChatEventKind::HeaderToggle, move |event, _| {
            if let ChatEvent::HeaderToggle(toggle) = event {
                seen_clone.lock().push(toggle.open);
            }
        });

        let disclosure = header.disclosure().unwrap().clone();
        disclosure.toggle();
        disclosure.toggle();
        assert_eq!(*seen.lock(), vec![true, false]);
    }

    #[test]
    fn test_unconnected_header_has_no_listener() {
        let mut header = WorkspaceShellHeader::new();
        header.perform_update();
        assert!(header.disclosure().is_none());
        assert!(!header.is_listening());
        // Tearing down without a listener is fine.
        header.disconnected_callback();
    }

    #[test]
    fn test_disconnect_detaches_listener() {
        let (_router, mut header) = connected_header();
        let disclosure = header.disclosure().unwrap().clone();
        assert_eq!(disclosure.toggle_signal().connection_count(), 1);

        header.disconnected_callback();
        assert!(!header.is_listening());
        assert_eq!(disclosure.toggle_signal().connection_count(), 0);
    }

    #[test]
    fn test_render_optional_parts() {
        let bare = WorkspaceShellHeader::new().render();
        assert!(bare.find_by_tag("details").is_some());
        assert!(bare.find_by_tag("summary").is_none());
        assert!(bare.find_by_tag("h3").is_none());
        assert_eq!(bare.slot_names(), vec![Some("header-description"), Some("header-action")]);

        let full = WorkspaceShellHeader::new()
            .with_title_text("Workspace")
            .with_sub_title_text("Draft")
            .render();
        let summary = full.find_by_tag("summary").unwrap();
        assert_eq!(summary.text_content(), "Workspace");
        assert!(full.find_by_tag("svg").is_some());
        assert_eq!(full.find_by_tag("h3").unwrap().text_content(), "Draft");
    }

    #[test]
    fn test_render_class_names() {
        let tree = WorkspaceShellHeader::new()
            .with_title_text("Workspace")
            .with_sub_title_text("Draft")
            .render();
        let RenderNode::Element(details) = &tree else {
            panic!("header should render a details element");
        };
        assert_eq!(details.tag, "details");
        assert!(details.has_class("cds-aichat-workspace-shell__header-content"));
        assert!(tree.find_by_tag("div").is_none());

        let chevron = tree.find_by_class("cds-aichat-workspace-shell__header-chevron").unwrap();
        assert_eq!(chevron.tag, "span");
        assert_eq!(
            tree.find_by_class("cds-aichat-workspace-shell__header-sub-title").unwrap().tag,
            "h3"
        );
        assert!(tree.find_by_class("cds-aichat-workspace-shell__header-subtitle").is_none());
    }

    #[test]
    fn test_empty_title_is_absent() {
        let header = WorkspaceShellHeader::new().with_title_text("");
        assert_eq!(header.title_text(), None);
        assert!(header.render().find_by_tag("summary").is_none());
    }

    #[test]
    fn test_slot_reflection() {
        let header = WorkspaceShellHeader::new();
        assert_eq!(header.reflected_attributes(), vec![("slot", "header".to_string())]);
        let header = header.with_slot("aside");
        assert_eq!(header.slot(), "aside");
    }

    #[test]
    fn test_open_state_renders() {
        let (_router, mut header) = connected_header();
        header.disclosure().unwrap().set_open(true);
        let tree = header.perform_update().unwrap();
        assert_eq!(tree.find_by_tag("details").unwrap().attribute("open"), Some(""));
    }
}
