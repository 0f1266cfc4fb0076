//! View-rotation engines.
//!
//! A view-rotation engine owns a set of views and moves between them. The
//! [`Carousel`](super::Carousel) never changes its position on its own; it asks
//! the engine to move and learns the outcome from the engine's
//! `on_view_change_end` callback.
//!
//! [`ClampedRotation`] is the engine used by default. It stops at the first and
//! last view ([`EdgeBehavior::Clamp`]) unless configured to wrap, and either
//! completes transitions immediately or queues them until the host reports
//! that the transition finished ([`TransitionMode::Deferred`]).

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use chatkit_core::ObjectId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize, Serializer};

use crate::logging::targets;

/// Result of a completed transition, passed to `on_view_change_end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselResponse {
    /// Index of the view now showing.
    pub current_index: usize,
    /// Index of the view showing before the transition.
    pub previous_index: usize,
    /// Index of the last view.
    pub last_index: usize,
    /// Number of views.
    pub total_views: usize,
    /// The view now showing.
    #[serde(serialize_with = "serialize_object_id")]
    pub current_view: ObjectId,
}

fn serialize_object_id<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(id.as_raw())
}

/// Callback invoked once per completed transition.
pub type ViewChangeEnd = Box<dyn Fn(CarouselResponse) + Send + Sync>;

/// Configuration handed to an engine when it is constructed.
pub struct ViewRotationConfig {
    /// Invoked once per completed transition with the resulting position.
    pub on_view_change_end: ViewChangeEnd,
}

impl ViewRotationConfig {
    /// Create a configuration with the given transition-end callback.
    pub fn new<F>(on_view_change_end: F) -> Self
    where
        F: Fn(CarouselResponse) + Send + Sync + 'static,
    {
        Self {
            on_view_change_end: Box::new(on_view_change_end),
        }
    }
}

impl fmt::Debug for ViewRotationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRotationConfig").finish_non_exhaustive()
    }
}

/// Contract between the carousel and the engine that moves its views.
///
/// Engines decide whether a request results in a transition. A declined
/// request must not invoke `on_view_change_end`.
pub trait ViewRotation: Send + Sync {
    /// Request a move to the previous view.
    fn prev(&self);

    /// Request a move to the next view.
    fn next(&self);

    /// All views, keyed by identity, mapped to their position.
    fn all_views(&self) -> &HashMap<ObjectId, usize>;

    /// Number of views.
    fn view_count(&self) -> usize {
        self.all_views().len()
    }
}

impl<T: ViewRotation + ?Sized> ViewRotation for Arc<T> {
    fn prev(&self) {
        (**self).prev();
    }

    fn next(&self) {
        (**self).next();
    }

    fn all_views(&self) -> &HashMap<ObjectId, usize> {
        (**self).all_views()
    }

    fn view_count(&self) -> usize {
        (**self).view_count()
    }
}

/// What the engine does at the first and last view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeBehavior {
    /// Refuse to move past either end.
    #[default]
    Clamp,
    /// Continue from the opposite end.
    Wrap,
}

/// When a requested transition is reported as complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Complete inside `prev()`/`next()`.
    #[default]
    Immediate,
    /// Queue until [`ClampedRotation::finish_transition`] is called.
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Default)]
struct RotationState {
    current: usize,
    pending: VecDeque<usize>,
}

/// The default engine: index-based navigation over an ordered set of views.
pub struct ClampedRotation {
    views: Vec<ObjectId>,
    positions: HashMap<ObjectId, usize>,
    edge_behavior: EdgeBehavior,
    transition_mode: TransitionMode,
    state: Mutex<RotationState>,
    on_view_change_end: ViewChangeEnd,
}

impl ClampedRotation {
    /// Create an engine over `views` (in display order), starting at index 0.
    pub fn new(views: Vec<ObjectId>, config: ViewRotationConfig) -> Self {
        let positions = views
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect();
        tracing::debug!(target: targets::VIEW_ROTATION, views = views.len(), "engine created");
        Self {
            views,
            positions,
            edge_behavior: EdgeBehavior::default(),
            transition_mode: TransitionMode::default(),
            state: Mutex::new(RotationState::default()),
            on_view_change_end: config.on_view_change_end,
        }
    }

    /// Set the edge behavior using builder pattern.
    pub fn with_edge_behavior(mut self, edge_behavior: EdgeBehavior) -> Self {
        self.edge_behavior = edge_behavior;
        self
    }

    /// Set the transition mode using builder pattern.
    pub fn with_transition_mode(mut self, transition_mode: TransitionMode) -> Self {
        self.transition_mode = transition_mode;
        self
    }

    /// The edge behavior.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.edge_behavior
    }

    /// The transition mode.
    pub fn transition_mode(&self) -> TransitionMode {
        self.transition_mode
    }

    /// Index of the view currently showing.
    pub fn current_index(&self) -> usize {
        self.state.lock().current
    }

    /// Number of transitions waiting for completion.
    pub fn pending_transitions(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Complete the oldest pending transition.
    ///
    /// Returns `false` when nothing was pending.
    pub fn finish_transition(&self) -> bool {
        let (from, to) = {
            let mut state = self.state.lock();
            let Some(to) = state.pending.pop_front() else {
                return false;
            };
            let from = std::mem::replace(&mut state.current, to);
            (from, to)
        };
        self.report(from, to);
        true
    }

    fn request(&self, direction: Direction) {
        let mut state = self.state.lock();
        let from = state.pending.back().copied().unwrap_or(state.current);
        let Some(to) = self.step(from, direction) else {
            tracing::trace!(target: targets::VIEW_ROTATION, ?direction, from, "transition declined at edge");
            return;
        };

        match self.transition_mode {
            TransitionMode::Immediate => {
                state.current = to;
                drop(state);
                self.report(from, to);
            }
            TransitionMode::Deferred => {
                state.pending.push_back(to);
                tracing::trace!(target: targets::VIEW_ROTATION, from, to, "transition queued");
            }
        }
    }

    fn step(&self, from: usize, direction: Direction) -> Option<usize> {
        let count = self.views.len();
        if count < 2 {
            return None;
        }
        match (self.edge_behavior, direction) {
            (EdgeBehavior::Clamp, Direction::Next) => (from + 1 < count).then_some(from + 1),
            (EdgeBehavior::Clamp, Direction::Previous) => from.checked_sub(1),
            (EdgeBehavior::Wrap, Direction::Next) => Some((from + 1) % count),
            (EdgeBehavior::Wrap, Direction::Previous) => Some((from + count - 1) % count),
        }
    }

    /// Invoke the callback. Never called with the state lock held, so the
    /// callback may query or drive the engine.
    fn report(&self, from: usize, to: usize) {
        let response = CarouselResponse {
            current_index: to,
            previous_index: from,
            last_index: self.views.len() - 1,
            total_views: self.views.len(),
            current_view: self.views[to],
        };
        tracing::trace!(target: targets::VIEW_ROTATION, from, to, "transition finished");
        (self.on_view_change_end)(response);
    }
}

impl ViewRotation for ClampedRotation {
    fn prev(&self) {
        self.request(Direction::Previous);
    }

    fn next(&self) {
        self.request(Direction::Next);
    }

    fn all_views(&self) -> &HashMap<ObjectId, usize> {
        &self.positions
    }
}

impl fmt::Debug for ClampedRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClampedRotation")
            .field("views", &self.views.len())
            .field("edge_behavior", &self.edge_behavior)
            .field("transition_mode", &self.transition_mode)
            .field("current", &self.current_index())
            .finish()
    }
}

static_assertions::assert_impl_all!(ClampedRotation: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use chatkit_core::ObjectTree;

    fn views(count: usize) -> Vec<ObjectId> {
        let tree = ObjectTree::new();
        (0..count)
            .map(|i| tree.insert(format!("view-{i}"), None).unwrap())
            .collect()
    }

    fn recording() -> (Arc<Mutex<Vec<usize>>>, ViewRotationConfig) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let config = ViewRotationConfig::new(move |response| {
            seen_clone.lock().push(response.current_index);
        });
        (seen, config)
    }

    #[test]
    fn test_clamps_at_both_edges() {
        let (seen, config) = recording();
        let engine = ClampedRotation::new(views(3), config);

        engine.prev();
        engine.next();
        engine.next();
        engine.next();
        engine.prev();

        assert_eq!(*seen.lock(), vec![1, 2, 1]);
        assert_eq!(engine.current_index(), 1);
    }

    #[test]
    fn test_wraps_when_configured() {
        let (seen, config) = recording();
        let engine = ClampedRotation::new(views(3), config).with_edge_behavior(EdgeBehavior::Wrap);

        engine.prev();
        engine.next();

        assert_eq!(*seen.lock(), vec![2, 0]);
    }

    #[test]
    fn test_single_view_never_moves() {
        let (seen, config) = recording();
        let engine = ClampedRotation::new(views(1), config).with_edge_behavior(EdgeBehavior::Wrap);

        engine.next();
        engine.prev();

        assert!(seen.lock().is_empty());
        assert_eq!(engine.view_count(), 1);
    }

    #[test]
    fn test_deferred_transitions_complete_in_order() {
        let (seen, config) = recording();
        let engine =
            ClampedRotation::new(views(3), config).with_transition_mode(TransitionMode::Deferred);

        engine.next();
        engine.next();
        engine.next();
        assert!(seen.lock().is_empty());
        assert_eq!(engine.pending_transitions(), 2);

        assert!(engine.finish_transition());
        assert_eq!(engine.current_index(), 1);
        assert!(engine.finish_transition());
        assert!(!engine.finish_transition());

        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_response_payload() {
        let ids = views(4);
        let last = Arc::new(Mutex::new(None));
        let last_clone = last.clone();
        let engine = ClampedRotation::new(
            ids.clone(),
            ViewRotationConfig::new(move |response| {
                *last_clone.lock() = Some(response);
            }),
        );

        engine.next();

        let response = last.lock().clone().unwrap();
        assert_eq!(response.current_index, 1);
        assert_eq!(response.previous_index, 0);
        assert_eq!(response.last_index, 3);
        assert_eq!(response.total_views, 4);
        assert_eq!(response.current_view, ids[1]);
        assert_eq!(engine.all_views()[&ids[2]], 2);

        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["currentIndex"], 1);
        assert_eq!(json["totalViews"], 4);
    }

    #[test]
    fn test_callback_may_drive_engine() {
        let engine_slot: Arc<Mutex<Option<Arc<ClampedRotation>>>> = Arc::new(Mutex::new(None));
        let slot_clone = engine_slot.clone();
        let engine = Arc::new(ClampedRotation::new(
            views(3),
            ViewRotationConfig::new(move |response| {
                let engine = slot_clone.lock().clone();
                if let Some(engine) = engine {
                    if response.current_index == 1 {
                        engine.next();
                    }
                }
            }),
        ));
        *engine_slot.lock() = Some(engine.clone());

        engine.next();
        assert_eq!(engine.current_index(), 2);

        // Break the reference cycle.
        engine_slot.lock().take();
    }
}
