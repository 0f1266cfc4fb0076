//! Carousel component.
//!
//! [`Carousel`] pages through its child views one at a time. It owns a single
//! [`ViewRotation`] engine, created the first time the component updates, and
//! turns each transition the engine completes into exactly one
//! [`ChatEvent::CarouselChange`] event.
//!
//! The position label shows `current + 1 / last + 1`: positions are 0-based
//! internally and 1-based on screen.
//!
//! # Example
//!
//! ```
//! use chatkit::carousel::Carousel;
//! use chatkit::component::Component;
//! use chatkit::events::{ChatEvent, ChatEventKind, ChatRouter};
//!
//! let router = ChatRouter::new();
//! let mut carousel = Carousel::new()
//!     .with_next_btn_text("Next")
//!     .with_previous_btn_text("Previous");
//! let id = carousel.connected_callback(&router, None).unwrap();
//! for i in 0..3 {
//!     carousel.add_view(format!("card-{i}")).unwrap();
//! }
//! carousel.perform_update();
//!
//! router.add_listener(id, ChatEventKind::CarouselChange, |event, _| {
//!     if let ChatEvent::CarouselChange(response) = event {
//!         println!("now showing {}", response.current_index);
//!     }
//! });
//!
//! carousel.request_next();
//! assert_eq!(carousel.current_index(), 1);
//! assert_eq!(carousel.position_label(), "2 / 3");
//! ```

mod view_rotation;

pub use view_rotation::{
    CarouselResponse, ClampedRotation, EdgeBehavior, TransitionMode, ViewChangeEnd, ViewRotation,
    ViewRotationConfig,
};

use std::fmt;
use std::sync::Arc;

use chatkit_core::{ObjectId, Property};

use crate::component::{Component, ComponentBase};
use crate::config::{CarouselConfig, DEFAULT_PREFIX};
use crate::error::{Error, Result};
use crate::events::{ChatEvent, CAROUSEL_CHANGE_SUFFIX};
use crate::icon::Icon;
use crate::logging::targets;
use crate::render::{Element, RenderNode};

/// Builds the engine for a carousel's views.
pub type EngineFactory =
    Arc<dyn Fn(Vec<ObjectId>, ViewRotationConfig) -> Box<dyn ViewRotation> + Send + Sync>;

/// Engine factory producing a [`ClampedRotation`] with the given policies.
pub fn clamped_engine_factory(edge_behavior: EdgeBehavior, transition_mode: TransitionMode) -> EngineFactory {
    Arc::new(move |views, config| {
        let engine = ClampedRotation::new(views, config)
            .with_edge_behavior(edge_behavior)
            .with_transition_mode(transition_mode);
        Box::new(engine) as Box<dyn ViewRotation>
    })
}

/// Tag name of the icon button used for the controls.
const ICON_BUTTON_TAG: &str = "cds-icon-button";

/// A control the user can activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarouselAction {
    /// Go to the previous view.
    Previous,
    /// Go to the next view.
    Next,
}

impl CarouselAction {
    /// The value of the rendered `data-action` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Previous => "previous",
            Self::Next => "next",
        }
    }
}

/// Pagination position.
///
/// `current_index` is written only by the engine's transition-end callback.
#[derive(Debug, Default)]
pub struct CarouselState {
    current_index: Property<usize>,
    last_index: Property<usize>,
}

impl CarouselState {
    /// Index of the visible view.
    pub fn current_index(&self) -> usize {
        self.current_index.get()
    }

    /// Index of the last view.
    pub fn last_index(&self) -> usize {
        self.last_index.get()
    }
}

/// A paginated container for child views.
///
/// # Events
///
/// - [`ChatEvent::CarouselChange`]: one per completed transition, dispatched
///   at the carousel's node, bubbling and composed.
pub struct Carousel {
    base: ComponentBase,
    prefix: String,
    next_btn_text: Option<String>,
    previous_btn_text: Option<String>,
    state: Arc<CarouselState>,
    engine: Option<Box<dyn ViewRotation>>,
    engine_factory: EngineFactory,
    initialized: bool,
}

impl Carousel {
    /// Create a carousel in the default namespace with the clamping engine.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Create a carousel in the given component namespace.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            base: ComponentBase::new(format!("{prefix}-carousel")),
            prefix,
            next_btn_text: None,
            previous_btn_text: None,
            state: Arc::new(CarouselState::default()),
            engine: None,
            engine_factory: clamped_engine_factory(EdgeBehavior::Clamp, TransitionMode::Immediate),
            initialized: false,
        }
    }

    /// Create a carousel from configuration.
    pub fn from_config(prefix: &str, config: &CarouselConfig) -> Self {
        let mut carousel = Self::with_prefix(prefix)
            .with_engine_factory(clamped_engine_factory(config.edge_behavior, config.transition_mode));
        carousel.next_btn_text = config.next_btn_text.clone();
        carousel.previous_btn_text = config.previous_btn_text.clone();
        carousel
    }

    /// Set the engine factory using builder pattern.
    ///
    /// Only affects engines created after this call.
    pub fn with_engine_factory(mut self, factory: EngineFactory) -> Self {
        self.engine_factory = factory;
        self
    }

    // =========================================================================
    // Labels
    // =========================================================================

    /// Tooltip text of the next button.
    pub fn next_btn_text(&self) -> Option<&str> {
        self.next_btn_text.as_deref()
    }

    /// Set the next button text.
    pub fn set_next_btn_text(&mut self, text: impl Into<String>) {
        self.next_btn_text = Some(text.into());
        self.base.update();
    }

    /// Set the next button text using builder pattern.
    pub fn with_next_btn_text(mut self, text: impl Into<String>) -> Self {
        self.set_next_btn_text(text);
        self
    }

    /// Tooltip text of the previous button.
    pub fn previous_btn_text(&self) -> Option<&str> {
        self.previous_btn_text.as_deref()
    }

    /// Set the previous button text.
    pub fn set_previous_btn_text(&mut self, text: impl Into<String>) {
        self.previous_btn_text = Some(text.into());
        self.base.update();
    }

    /// Set the previous button text using builder pattern.
    pub fn with_previous_btn_text(mut self, text: impl Into<String>) -> Self {
        self.set_previous_btn_text(text);
        self
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Append a child view node under the carousel.
    ///
    /// Views must be added before the first update; the engine is built once
    /// from the views present at that point.
    pub fn add_view(&self, tag: impl Into<String>) -> Result<ObjectId> {
        let (Some(router), Some(id)) = (self.base.router(), self.base.object_id()) else {
            return Err(Error::NotConnected {
                tag: self.base.tag().to_string(),
            });
        };
        Ok(router.tree().insert(tag, Some(id))?)
    }

    /// The carousel's child views, in authored order.
    pub fn views(&self) -> Vec<ObjectId> {
        match (self.base.router(), self.base.object_id()) {
            (Some(router), Some(id)) => router.tree().children(id).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// The engine, once created.
    pub fn engine(&self) -> Option<&dyn ViewRotation> {
        self.engine.as_deref()
    }

    // =========================================================================
    // Position
    // =========================================================================

    /// Index of the visible view.
    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    /// Index of the last view (0 when there are no views).
    pub fn last_index(&self) -> usize {
        self.state.last_index()
    }

    /// Shared position state.
    pub fn state(&self) -> &Arc<CarouselState> {
        &self.state
    }

    /// The 1-based position label, e.g. `"3 / 8"`.
    pub fn position_label(&self) -> String {
        format_position(self.current_index(), self.last_index())
    }

    /// Name of the change event in this carousel's namespace.
    pub fn event_on_change(&self) -> String {
        format!("{}-{CAROUSEL_CHANGE_SUFFIX}", self.prefix)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Ask the engine for the previous view. No-op without an engine.
    pub fn request_prev(&self) {
        match &self.engine {
            Some(engine) => engine.prev(),
            None => tracing::trace!(target: targets::CAROUSEL, "no engine, previous ignored"),
        }
    }

    /// Ask the engine for the next view. No-op without an engine.
    pub fn request_next(&self) {
        match &self.engine {
            Some(engine) => engine.next(),
            None => tracing::trace!(target: targets::CAROUSEL, "no engine, next ignored"),
        }
    }

    /// Handle activation of one of the rendered controls.
    pub fn handle_action(&self, action: CarouselAction) {
        match action {
            CarouselAction::Previous => self.request_prev(),
            CarouselAction::Next => self.request_next(),
        }
    }

    fn init_engine(&mut self) {
        if std::mem::replace(&mut self.initialized, true) {
            return;
        }
        let views = self.views();
        if views.is_empty() {
            tracing::debug!(target: targets::CAROUSEL, tag = %self.base.tag(), "no views, carousel stays empty");
            return;
        }

        let state = self.state.clone();
        let update = self.base.update_handle();
        let emitter = self.base.emitter();
        let config = ViewRotationConfig::new(move |response: CarouselResponse| {
            if state.current_index.set(response.current_index) {
                update.request();
            }
            tracing::debug!(
                target: targets::CAROUSEL,
                current_index = response.current_index,
                total_views = response.total_views,
                "view changed"
            );
            if let Some(emitter) = &emitter {
                emitter.emit(&ChatEvent::CarouselChange(response));
            }
        });

        let engine = (self.engine_factory)(views, config);
        let last_index = engine.view_count().saturating_sub(1);
        if self.state.last_index.set(last_index) {
            self.base.update();
        }
        tracing::debug!(target: targets::CAROUSEL, last_index, "engine initialized");
        self.engine = Some(engine);
    }

    fn control(&self, action: CarouselAction, icon: Icon, tooltip: Option<&str>) -> Element {
        Element::new(ICON_BUTTON_TAG)
            .attr("data-action", action.as_str())
            .attr("kind", "ghost")
            .attr("size", "sm")
            .attr("align", "bottom-start")
            .attr("enter-delay-ms", "0")
            .attr("leave-delay-ms", "0")
            .child(icon.render(Some("icon")))
            .child(
                Element::new("span")
                    .attr("slot", "tooltip-content")
                    .optional_child(tooltip.map(RenderNode::text)),
            )
    }
}

/// Format a 0-based position as the 1-based `"current / total"` label.
pub fn format_position(current_index: usize, last_index: usize) -> String {
    format!("{} / {}", current_index + 1, last_index + 1)
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("base", &self.base)
            .field("current_index", &self.current_index())
            .field("last_index", &self.last_index())
            .field("has_engine", &self.engine.is_some())
            .finish()
    }
}

impl Component for Carousel {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&self) -> RenderNode {
        let block = format!("{}-carousel", self.prefix);
        Element::new("div")
            .class(block.clone())
            .child(RenderNode::default_slot())
            .child(
                Element::new("div")
                    .class(format!("{block}__controls"))
                    .child(self.control(
                        CarouselAction::Previous,
                        Icon::ChevronLeft16,
                        self.previous_btn_text(),
                    ))
                    .child(Element::new("span").child(RenderNode::text(self.position_label())))
                    .child(self.control(CarouselAction::Next, Icon::ChevronRight16, self.next_btn_text())),
            )
            .into()
    }

    fn first_updated(&mut self) {
        self.init_engine();
    }

    fn disconnected_callback(&mut self) {
        if self.engine.take().is_some() {
            tracing::debug!(target: targets::CAROUSEL, "engine destroyed");
        }
        self.base.disconnect();
    }
}

static_assertions::assert_impl_all!(Carousel: Send, Sync);
